//! Integration tests for the inference HTTP API.
//!
//! Uses mock pipelines so the endpoints are exercised without model
//! downloads or weights on disk.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use alembic::PipelineRegistry;
use athanor::Summarizer;
use epitome_core::{
    Candidate, Error, ModelArchitecture, ModelMetadata, ModelSource, Result, SummarizeRequest,
    SummaryResponse,
};
use epitome_server::{ApiVersion, Server, ServerConfig};

// ---------------------------------------------------------------------------
// MockPipeline — deterministic, no model files needed
// ---------------------------------------------------------------------------

struct MockPipeline {
    metadata: ModelMetadata,
    fail: bool,
}

impl MockPipeline {
    fn new(id: &str) -> Arc<dyn Summarizer> {
        Arc::new(Self {
            metadata: ModelMetadata::new(
                id,
                ModelArchitecture::T5,
                ModelSource::huggingface("mock/checkpoint"),
            ),
            fail: false,
        })
    }

    fn failing(id: &str) -> Arc<dyn Summarizer> {
        Arc::new(Self {
            metadata: ModelMetadata::new(
                id,
                ModelArchitecture::T5,
                ModelSource::huggingface("mock/checkpoint"),
            ),
            fail: true,
        })
    }
}

#[async_trait]
impl Summarizer for MockPipeline {
    async fn summarize(&self, request: SummarizeRequest) -> Result<SummaryResponse> {
        if self.fail {
            return Err(Error::backend("cpu", "mock inference failure"));
        }

        let text = format!(
            "summary[{}]: {}",
            self.metadata.id,
            request.text.chars().take(16).collect::<String>()
        );

        Ok(SummaryResponse {
            request_id: request.request_id,
            model: self.metadata.id.clone(),
            candidates: vec![Candidate { index: 0, text }],
            input_tokens: None,
            output_tokens: None,
        })
    }

    fn model_info(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn is_ready(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_router(api: ApiVersion) -> axum::Router {
    let registry = PipelineRegistry::builder()
        .register("bart", MockPipeline::new("bart"))
        .register("t5", MockPipeline::new("t5"))
        .default_model("bart")
        .build()
        .unwrap();

    let config = ServerConfig::builder().api(api).build();
    Server::new(config, Arc::new(registry)).router()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// v1 contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn v1_unsupported_task_reports_error_in_band() {
    let router = test_router(ApiVersion::V1);
    let request = post_json("/infer", serde_json::json!({"prompt": "text", "task": "translate"}));

    let response = router.oneshot(request).await.unwrap();
    // Legacy behavior: the error travels in the body, not the status.
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body.get("output").is_none());
    assert_eq!(body["error"], "Unsupported task: translate");
}

#[tokio::test]
async fn v1_summarize_returns_output() {
    let router = test_router(ApiVersion::V1);
    let request = post_json(
        "/infer",
        serde_json::json!({"prompt": "The quick brown fox...", "task": "summarize"}),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body.get("error").is_none());
    let output = body["output"].as_str().unwrap();
    assert!(!output.is_empty());
}

#[tokio::test]
async fn v1_explicit_route_works_under_v2_default() {
    let router = test_router(ApiVersion::V2);
    let request = post_json(
        "/v1/infer",
        serde_json::json!({"prompt": "some document", "task": "summarize"}),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["output"].as_str().is_some());
}

// ---------------------------------------------------------------------------
// v2 contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn v2_unknown_model_id_is_a_client_error_naming_the_id() {
    let router = test_router(ApiVersion::V2);
    let request = post_json(
        "/infer",
        serde_json::json!({"prompt": "text", "task": "x", "model_id": "gpt"}),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("gpt"));
}

#[tokio::test]
async fn v2_known_models_return_output_latency_and_model_used() {
    for model_id in ["bart", "t5"] {
        let router = test_router(ApiVersion::V2);
        let request = post_json(
            "/infer",
            serde_json::json!({"prompt": "a long article", "task": "summarize", "model_id": model_id}),
        );

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["output"].as_str().is_some());
        assert!(body["latency"].as_f64().unwrap() >= 0.0);
        assert_eq!(body["model_used"], model_id);
    }
}

#[tokio::test]
async fn v2_accepts_missing_task_field() {
    let router = test_router(ApiVersion::V2);
    let request = post_json(
        "/infer",
        serde_json::json!({"prompt": "a long article", "model_id": "t5"}),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn v2_model_failure_surfaces_as_server_error() {
    let registry = PipelineRegistry::builder()
        .register("bart", MockPipeline::failing("bart"))
        .default_model("bart")
        .build()
        .unwrap();
    let router = Server::new(ServerConfig::default(), Arc::new(registry)).router();

    let request = post_json(
        "/infer",
        serde_json::json!({"prompt": "text", "task": "summarize", "model_id": "bart"}),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "summarization_error");
}

// ---------------------------------------------------------------------------
// Operational endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ready_reports_unavailable_with_empty_registry() {
    let registry = PipelineRegistry::builder().build().unwrap();
    let router = Server::new(ServerConfig::default(), Arc::new(registry)).router();

    let request = Request::builder()
        .uri("/ready")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn models_lists_registry_entries() {
    let router = test_router(ApiVersion::V2);
    let request = Request::builder()
        .uri("/models")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let models = body["models"].as_array().unwrap();
    let ids: Vec<&str> = models.iter().map(|m| m["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["bart", "t5"]);

    let bart = &models[0];
    assert_eq!(bart["default"], true);
}

#[tokio::test]
async fn stats_tracks_served_requests() {
    let registry = Arc::new(
        PipelineRegistry::builder()
            .register("t5", MockPipeline::new("t5"))
            .build()
            .unwrap(),
    );
    let server = Server::new(ServerConfig::default(), registry);

    let infer = post_json(
        "/v2/infer",
        serde_json::json!({"prompt": "text", "model_id": "t5"}),
    );
    let response = server.router().oneshot(infer).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stats_req = Request::builder()
        .uri("/stats")
        .body(Body::empty())
        .unwrap();
    let response = server.router().oneshot(stats_req).await.unwrap();
    let body = body_json(response).await;

    let t5 = &body["models"].as_array().unwrap()[0];
    assert_eq!(t5["id"], "t5");
    assert_eq!(t5["requests"], 1);
    assert!(t5["average_latency_ms"].as_f64().unwrap() >= 0.0);
}
