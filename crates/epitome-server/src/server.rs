//! HTTP server implementation for the summarization inference API.
//!
//! Mounts both generations of the `/infer` contract against a registry of
//! preloaded pipelines. Handlers live alongside the routing configuration.

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use alembic::PipelineRegistry;
use athanor::Summarizer;
use epitome_core::{Result, SummarizeRequest, SummaryParams};
use pelican::ServiceMetrics;

use crate::api::{
    InferError, InferOutput, InferV1Request, InferV2Request, InferV2Response, ModelEntry,
    ModelStats, ModelsResponse, StatsResponse, StatusResponse,
};

/// v1 generation parameters: fixed at max 100 / min 10, greedy.
const V1_MAX_LENGTH: u32 = 100;
/// See [`V1_MAX_LENGTH`].
const V1_MIN_LENGTH: u32 = 10;
/// v2 generation parameters: fixed at max 60 / min 20, greedy.
const V2_MAX_LENGTH: u32 = 60;
/// See [`V2_MAX_LENGTH`].
const V2_MIN_LENGTH: u32 = 20;

/// Which generation of the wire contract bare `/infer` serves.
///
/// The two versions shipped as mutually exclusive services; a deployment
/// picks one for `/infer` while `/v1/infer` and `/v2/infer` stay routable
/// for explicit callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    /// Single-model contract: `{prompt, task}`.
    V1,
    /// Registry contract: `{prompt, task, model_id}` with latency
    /// reporting.
    V2,
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::V2
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "v1" | "1" => Ok(Self::V1),
            "v2" | "2" => Ok(Self::V2),
            other => Err(format!("unknown API version: {other}")),
        }
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V2 => write!(f, "v2"),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Enable CORS.
    pub cors: bool,
    /// Contract served at bare `/infer`.
    pub api: ApiVersion,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".parse().unwrap(),
            cors: true,
            api: ApiVersion::default(),
        }
    }
}

impl ServerConfig {
    /// Creates a new server config builder.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    addr: Option<SocketAddr>,
    cors: Option<bool>,
    api: Option<ApiVersion>,
}

impl ServerConfigBuilder {
    /// Sets the listen address.
    #[must_use]
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    /// Sets whether CORS is enabled.
    #[must_use]
    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors = Some(enabled);
        self
    }

    /// Sets the contract served at bare `/infer`.
    #[must_use]
    pub fn api(mut self, api: ApiVersion) -> Self {
        self.api = Some(api);
        self
    }

    /// Builds the server config.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            addr: self.addr.unwrap_or_else(|| "0.0.0.0:8080".parse().unwrap()),
            cors: self.cors.unwrap_or(true),
            api: self.api.unwrap_or_default(),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Registry of preloaded pipelines, immutable after startup.
    pub registry: Arc<PipelineRegistry>,
    /// Server configuration.
    pub config: ServerConfig,
    /// Server start time.
    pub start_time: Instant,
    /// Request counters.
    pub metrics: ServiceMetrics,
}

impl AppState {
    /// Creates new app state over a sealed registry.
    #[must_use]
    pub fn new(config: ServerConfig, registry: Arc<PipelineRegistry>) -> Self {
        Self {
            registry,
            config,
            start_time: Instant::now(),
            metrics: ServiceMetrics::default(),
        }
    }
}

/// The HTTP server.
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Creates a new server over a sealed pipeline registry.
    #[must_use]
    pub fn new(config: ServerConfig, registry: Arc<PipelineRegistry>) -> Self {
        let state = Arc::new(AppState::new(config.clone(), registry));
        Self { config, state }
    }

    /// Creates the router. Public so tests and embedders can drive the
    /// API without binding a socket.
    #[must_use]
    pub fn router(&self) -> Router {
        let bare_infer = match self.config.api {
            ApiVersion::V1 => post(infer_v1),
            ApiVersion::V2 => post(infer_v2),
        };

        let mut router = Router::new()
            .route("/infer", bare_infer)
            .route("/v1/infer", post(infer_v1))
            .route("/v2/infer", post(infer_v2))
            .route("/health", get(health))
            .route("/ready", get(ready))
            .route("/models", get(list_models))
            .route("/status", get(server_status))
            .route("/stats", get(server_stats))
            .with_state(self.state.clone());

        router = router.layer(TraceLayer::new_for_http());

        if self.config.cors {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }

    /// Runs the server until SIGINT/SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot start.
    pub async fn run(self) -> Result<()> {
        if self.state.registry.is_empty() {
            tracing::warn!("Server starting with an empty registry; all inference requests will fail until restarted with models configured");
        }

        let router = self.router();

        tracing::info!(addr = %self.config.addr, api = %self.config.api, "Starting Epitome server");

        let listener = tokio::net::TcpListener::bind(self.config.addr)
            .await
            .map_err(epitome_core::Error::Io)?;

        let shutdown_signal = async {
            let ctrl_c = async {
                tokio::signal::ctrl_c()
                    .await
                    .expect("Failed to install Ctrl+C handler");
            };

            #[cfg(unix)]
            let terminate = async {
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("Failed to install signal handler")
                    .recv()
                    .await;
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                () = ctrl_c => {
                    tracing::info!("Received Ctrl+C, shutting down gracefully");
                },
                () = terminate => {
                    tracing::info!("Received SIGTERM, shutting down gracefully");
                },
            }
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| epitome_core::Error::Internal {
                message: e.to_string(),
            })?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

// === Error Response ===

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: String,
}

impl ErrorResponse {
    fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                error_type: error_type.into(),
            },
        }
    }
}

fn error_response(status: StatusCode, message: &str, error_type: &str) -> Response {
    let body = Json(ErrorResponse::new(message, error_type));
    (status, body).into_response()
}

// === Health Endpoints ===

async fn health() -> &'static str {
    "OK"
}

async fn ready(State(state): State<Arc<AppState>>) -> Response {
    if state.registry.is_empty() {
        (StatusCode::SERVICE_UNAVAILABLE, "No models loaded").into_response()
    } else {
        (StatusCode::OK, "Ready").into_response()
    }
}

async fn server_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running".to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        models_loaded: state.registry.len(),
        default_model: state.registry.default_id().map(String::from),
    })
}

async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    let default_id = state.registry.default_id().map(String::from);
    let models = state
        .registry
        .all()
        .iter()
        .map(|p| ModelEntry {
            id: p.id.to_string(),
            architecture: p.summarizer.model_info().architecture.to_string(),
            default: default_id.as_deref() == Some(p.id.as_str()),
        })
        .collect();

    Json(ModelsResponse { models })
}

async fn server_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let models = state
        .registry
        .all()
        .iter()
        .map(|p| ModelStats {
            id: p.id.to_string(),
            requests: p.stats.request_count(),
            average_latency_ms: p.stats.average_latency_ms(),
            p50_latency_ms: p.stats.p50_latency_ms(),
            p99_latency_ms: p.stats.p99_latency_ms(),
        })
        .collect();

    Json(StatsResponse { models })
}

// === Inference Endpoints ===

async fn infer_v1(State(state): State<Arc<AppState>>, Json(req): Json<InferV1Request>) -> Response {
    if !req.task.is_supported() {
        state.metrics.record_rejection();
        tracing::debug!(task = %req.task, "Rejected unsupported task");

        // The v1 contract reports unsupported tasks in-band with a 200;
        // clients match on the `error` key, not the status code. v2 moved
        // this class of failure to a 400.
        let body = InferError {
            error: format!("Unsupported task: {}", req.task),
        };
        return (StatusCode::OK, Json(body)).into_response();
    }

    let Some(pipeline) = state.registry.default_pipeline() else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "No model loaded",
            "model_not_loaded",
        );
    };

    let request = SummarizeRequest::new(req.prompt)
        .with_params(SummaryParams::greedy(V1_MAX_LENGTH, V1_MIN_LENGTH));
    let request_id = request.request_id.clone();

    tracing::debug!(request_id = %request_id, model = %pipeline.id, "v1 inference request");

    match pipeline.summarizer.summarize(request).await {
        Ok(response) => {
            state.metrics.record_request();
            let output = response.text().unwrap_or_default().to_string();
            Json(InferOutput { output }).into_response()
        }
        Err(e) => {
            state.metrics.record_error();
            tracing::error!(request_id = %request_id, error = %e, "Summarization failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.to_string(),
                "summarization_error",
            )
        }
    }
}

async fn infer_v2(State(state): State<Arc<AppState>>, Json(req): Json<InferV2Request>) -> Response {
    // `req.task` is accepted but never consulted: a leftover of the v1
    // schema that existing clients still send.
    let pipeline = match state.registry.lookup(&req.model_id) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            state.metrics.record_rejection();
            tracing::debug!(model = %req.model_id, "Rejected unknown model id");
            return error_response(StatusCode::BAD_REQUEST, &e.to_string(), "model_not_supported");
        }
    };

    let request = SummarizeRequest::new(req.prompt)
        .with_model(req.model_id.clone())
        .with_params(SummaryParams::greedy(V2_MAX_LENGTH, V2_MIN_LENGTH));
    let request_id = request.request_id.clone();

    tracing::debug!(request_id = %request_id, model = %req.model_id, "v2 inference request");

    let start = Instant::now();
    match pipeline.summarizer.summarize(request).await {
        Ok(response) => {
            let elapsed = start.elapsed();
            pipeline.record_latency(elapsed);
            state.metrics.record_request();

            tracing::debug!(
                request_id = %request_id,
                model = %req.model_id,
                latency_ms = elapsed.as_millis() as u64,
                "v2 inference finished"
            );

            Json(InferV2Response {
                output: response.text().unwrap_or_default().to_string(),
                latency: elapsed.as_secs_f64(),
                model_used: req.model_id,
            })
            .into_response()
        }
        Err(e) => {
            state.metrics.record_error();
            tracing::error!(request_id = %request_id, error = %e, "Summarization failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.to_string(),
                "summarization_error",
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_builder() {
        let config = ServerConfig::builder()
            .addr("127.0.0.1:3000".parse().unwrap())
            .cors(false)
            .api(ApiVersion::V1)
            .build();

        assert_eq!(config.addr, "127.0.0.1:3000".parse().unwrap());
        assert!(!config.cors);
        assert_eq!(config.api, ApiVersion::V1);
    }

    #[test]
    fn test_api_version_parse() {
        assert_eq!("v1".parse::<ApiVersion>().unwrap(), ApiVersion::V1);
        assert_eq!("2".parse::<ApiVersion>().unwrap(), ApiVersion::V2);
        assert!("v3".parse::<ApiVersion>().is_err());
    }

    #[test]
    fn test_error_response_shape() {
        let err = ErrorResponse::new("Model not supported: gpt", "model_not_supported");
        assert_eq!(err.error.message, "Model not supported: gpt");
        assert_eq!(err.error.error_type, "model_not_supported");
    }
}
