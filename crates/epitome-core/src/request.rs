//! Request types for summarization operations.

use serde::{Deserialize, Serialize};

use crate::params::SummaryParams;
use crate::types::{ModelId, RequestId};

/// Request for text summarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeRequest {
    /// Unique request identifier.
    #[serde(default)]
    pub request_id: RequestId,

    /// Model to use. `None` selects the caller's default pipeline.
    #[serde(default)]
    pub model: Option<ModelId>,

    /// The text to summarize.
    pub text: String,

    /// Generation parameters.
    #[serde(default)]
    pub params: SummaryParams,
}

impl SummarizeRequest {
    /// Creates a new summarization request for the given text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            model: None,
            text: text.into(),
            params: SummaryParams::default(),
        }
    }

    /// Sets the model to use.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<ModelId>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the generation parameters.
    #[must_use]
    pub fn with_params(mut self, params: SummaryParams) -> Self {
        self.params = params;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = SummarizeRequest::new("a long document")
            .with_model("t5")
            .with_params(SummaryParams::greedy(60, 20));

        assert_eq!(request.text, "a long document");
        assert_eq!(request.model, Some(ModelId::new("t5")));
        assert_eq!(request.params.max_length, 60);
    }
}
