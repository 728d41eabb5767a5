//! # Alembic
//!
//! *"The vessel that separates"*
//!
//! Alembic holds the model registry for the Epitome stack: a mapping from
//! short model identifiers to preloaded summarization pipelines.
//!
//! The registry is deliberately not a mutable singleton. It is assembled
//! once at process start through [`RegistryBuilder`], sealed into an
//! immutable map, and shared read-only across all concurrent requests.
//! There is no write path at request time, so lookups need no
//! synchronization.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod registry;
pub mod stats;

pub use registry::{PipelineRegistry, RegisteredPipeline, RegistryBuilder};
pub use stats::LatencyStats;
