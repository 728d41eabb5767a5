//! Relay HTTP surface.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::client::InferenceClient;
use crate::error::RelayError;
use crate::store::{Job, JobStore};

struct AppState {
    store: JobStore,
    client: InferenceClient,
}

#[derive(Debug, Deserialize)]
struct SubmitRequest {
    prompt: String,
    task: String,
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    message: String,
    prompt: String,
    task: String,
    output: String,
}

#[derive(Debug, Serialize)]
struct JobsResponse {
    jobs: Vec<Job>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Builds the relay router over the given store and client.
fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/submit", post(submit))
        .route("/jobs", get(jobs))
        .route("/health", get(health))
        .with_state(state)
}

/// Runs the relay until the process is stopped.
pub async fn run(addr: SocketAddr, store: JobStore, client: InferenceClient) -> std::io::Result<()> {
    let state = Arc::new(AppState { store, client });

    tracing::info!(%addr, "Starting relay");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await
}

async fn health() -> &'static str {
    "OK"
}

async fn submit(State(state): State<Arc<AppState>>, Json(req): Json<SubmitRequest>) -> Response {
    let output = match state.client.infer(&req.prompt, &req.task).await {
        Ok(output) => output,
        Err(e @ RelayError::Http(_)) => {
            tracing::error!(error = %e, "Failed to call inference service");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Inference service error");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to decode inference response");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Invalid inference response");
        }
    };

    if let Err(e) = state.store.insert(&req.prompt, &req.task).await {
        tracing::error!(error = %e, "Failed to insert job");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Could not store job");
    }

    Json(SubmitResponse {
        message: "Job stored and inference completed".to_string(),
        prompt: req.prompt,
        task: req.task,
        output,
    })
    .into_response()
}

async fn jobs(State(state): State<Arc<AppState>>) -> Response {
    match state.store.recent(50).await {
        Ok(jobs) => Json(JobsResponse { jobs }).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list jobs");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Could not list jobs")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_shape() {
        let req: SubmitRequest =
            serde_json::from_str(r#"{"prompt": "text", "task": "summarize"}"#).unwrap();
        assert_eq!(req.prompt, "text");
        assert_eq!(req.task, "summarize");
    }

    #[test]
    fn test_submit_response_serializes() {
        let body = serde_json::to_value(SubmitResponse {
            message: "Job stored and inference completed".to_string(),
            prompt: "text".to_string(),
            task: "summarize".to_string(),
            output: "short".to_string(),
        })
        .unwrap();

        assert_eq!(body["message"], "Job stored and inference completed");
        assert_eq!(body["output"], "short");
    }
}
