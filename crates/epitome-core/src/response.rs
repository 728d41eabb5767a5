//! Response types for summarization operations.

use serde::{Deserialize, Serialize};

use crate::types::{ModelId, RequestId};

/// Response from a summarization invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Request identifier.
    pub request_id: RequestId,

    /// Model that produced the summary.
    pub model: ModelId,

    /// Generated candidates. Callers that want a single summary take the
    /// first one.
    pub candidates: Vec<Candidate>,

    /// Number of input tokens, if the backend reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u32>,

    /// Number of generated tokens, if the backend reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u32>,
}

/// A single generated summary candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Index of this candidate.
    pub index: u32,

    /// Summary text.
    pub text: String,
}

impl SummaryResponse {
    /// Returns the first candidate's text, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.candidates.first().map(|c| c.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_candidate_wins() {
        let response = SummaryResponse {
            request_id: RequestId::new(),
            model: ModelId::new("bart"),
            candidates: vec![
                Candidate {
                    index: 0,
                    text: "first".to_string(),
                },
                Candidate {
                    index: 1,
                    text: "second".to_string(),
                },
            ],
            input_tokens: None,
            output_tokens: None,
        };

        assert_eq!(response.text(), Some("first"));
    }

    #[test]
    fn test_empty_candidates() {
        let response = SummaryResponse {
            request_id: RequestId::new(),
            model: ModelId::new("bart"),
            candidates: vec![],
            input_tokens: None,
            output_tokens: None,
        };

        assert_eq!(response.text(), None);
    }
}
