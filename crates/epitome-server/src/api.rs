//! Inference API wire types.
//!
//! Hand-rolled serde structs matching the JSON wire format of both
//! generations of the `/infer` endpoint.

use serde::{Deserialize, Serialize};

use epitome_core::Task;

// === v1 ===

/// `POST /v1/infer` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct InferV1Request {
    /// The text to summarize.
    pub prompt: String,
    /// Requested task; only `"summarize"` is supported.
    pub task: Task,
}

/// `POST /v1/infer` success body.
#[derive(Debug, Clone, Serialize)]
pub struct InferOutput {
    /// The generated summary.
    pub output: String,
}

/// `POST /v1/infer` in-band error body.
#[derive(Debug, Clone, Serialize)]
pub struct InferError {
    /// Human-readable error message.
    pub error: String,
}

// === v2 ===

/// `POST /v2/infer` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct InferV2Request {
    /// The text to summarize.
    pub prompt: String,
    /// Task name carried over from the v1 schema. Accepted but never
    /// consulted; see the handler.
    #[serde(default)]
    pub task: Option<Task>,
    /// Registry key of the pipeline to invoke.
    pub model_id: String,
}

/// `POST /v2/infer` success body.
#[derive(Debug, Clone, Serialize)]
pub struct InferV2Response {
    /// The generated summary.
    pub output: String,
    /// Wall-clock duration of the model invocation, in seconds.
    pub latency: f64,
    /// The registry key that served the request.
    pub model_used: String,
}

// === Operational endpoints ===

/// `GET /models` response.
#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
    /// Registered pipelines.
    pub models: Vec<ModelEntry>,
}

/// A single registry entry.
#[derive(Debug, Clone, Serialize)]
pub struct ModelEntry {
    /// Registry key.
    pub id: String,
    /// Model architecture name.
    pub architecture: String,
    /// Whether this pipeline serves v1 requests.
    pub default: bool,
}

/// `GET /status` response.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// Always `"running"`.
    pub status: String,
    /// Seconds since the server started.
    pub uptime_seconds: u64,
    /// Number of registered pipelines.
    pub models_loaded: usize,
    /// Registry key of the default pipeline, if any.
    pub default_model: Option<String>,
}

/// `GET /stats` response.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Per-pipeline latency aggregates.
    pub models: Vec<ModelStats>,
}

/// Latency aggregates for one pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct ModelStats {
    /// Registry key.
    pub id: String,
    /// Requests served by this pipeline.
    pub requests: u64,
    /// Mean invocation latency in milliseconds.
    pub average_latency_ms: f64,
    /// Median invocation latency in milliseconds.
    pub p50_latency_ms: f64,
    /// 99th-percentile invocation latency in milliseconds.
    pub p99_latency_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_request_deserializes() {
        let req: InferV1Request =
            serde_json::from_str(r#"{"prompt": "text", "task": "summarize"}"#).unwrap();
        assert_eq!(req.prompt, "text");
        assert!(req.task.is_supported());
    }

    #[test]
    fn test_v2_request_task_is_optional() {
        let req: InferV2Request =
            serde_json::from_str(r#"{"prompt": "text", "model_id": "bart"}"#).unwrap();
        assert_eq!(req.model_id, "bart");
        assert!(req.task.is_none());

        let req: InferV2Request = serde_json::from_str(
            r#"{"prompt": "text", "task": "summarize", "model_id": "t5"}"#,
        )
        .unwrap();
        assert!(req.task.is_some());
    }

    #[test]
    fn test_v2_response_shape() {
        let body = serde_json::to_value(InferV2Response {
            output: "short".to_string(),
            latency: 0.25,
            model_used: "t5".to_string(),
        })
        .unwrap();

        assert_eq!(body["output"], "short");
        assert_eq!(body["model_used"], "t5");
        assert!(body["latency"].as_f64().unwrap() >= 0.0);
    }
}
