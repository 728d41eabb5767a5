//! # Epitome Core
//!
//! Core types and traits for the Epitome summarization stack.
//!
//! This crate provides the foundational abstractions used across all Epitome
//! components:
//! - Common error types
//! - Request/response structures for summarization
//! - Model metadata and source descriptions
//! - Generation parameter types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod model;
pub mod params;
pub mod request;
pub mod response;
pub mod types;

pub use error::{Error, Result};
pub use model::{ModelArchitecture, ModelMetadata, ModelSource};
pub use params::SummaryParams;
pub use request::SummarizeRequest;
pub use response::{Candidate, SummaryResponse};
pub use types::*;
