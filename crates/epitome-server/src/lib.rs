//! # Epitome Server
//!
//! HTTP inference API for the Epitome summarization stack.
//!
//! Serves both generations of the `/infer` contract: the v1 single-model
//! endpoint and the v2 registry-backed endpoint with latency reporting.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod server;

pub use server::{ApiVersion, AppState, Server, ServerConfig};
