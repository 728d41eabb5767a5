//! HTTP client for the upstream inference service.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct InferPayload<'a> {
    prompt: &'a str,
    task: &'a str,
}

/// The v1 inference wire format: either `output` or an in-band `error`,
/// both under a 200.
#[derive(Debug, Deserialize)]
struct InferReply {
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the inference service's `/infer` endpoint.
pub struct InferenceClient {
    http: reqwest::Client,
    base_url: String,
}

impl InferenceClient {
    /// Creates a client for the service at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Forwards a prompt to the inference service and returns the summary.
    pub async fn infer(&self, prompt: &str, task: &str) -> Result<String> {
        let url = format!("{}/infer", self.base_url);
        let payload = InferPayload { prompt, task };

        let reply: InferReply = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = reply.error {
            return Err(RelayError::Upstream(error));
        }

        reply
            .output
            .ok_or_else(|| RelayError::Upstream("response missing output".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let client = InferenceClient::new("http://localhost:9000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_reply_parses_both_shapes() {
        let ok: InferReply = serde_json::from_str(r#"{"output": "short"}"#).unwrap();
        assert_eq!(ok.output.as_deref(), Some("short"));
        assert!(ok.error.is_none());

        let err: InferReply =
            serde_json::from_str(r#"{"error": "Unsupported task: x"}"#).unwrap();
        assert!(err.output.is_none());
        assert_eq!(err.error.as_deref(), Some("Unsupported task: x"));
    }
}
