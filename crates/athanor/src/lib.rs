//! # Athanor
//!
//! *"The furnace that draws the essence"*
//!
//! Athanor is the summarization engine for the Epitome stack. It loads
//! pre-trained sequence-to-sequence checkpoints from the HuggingFace Hub
//! and exposes them as preloaded pipelines behind the [`Summarizer`] trait.
//!
//! The model mathematics live entirely in `candle-transformers`; this crate
//! only wires file resolution, tokenization, and the decode loop together.
//!
//! ## Example
//!
//! ```ignore
//! use athanor::{Engine, EngineConfig, Summarizer};
//! use epitome_core::{SummarizeRequest, SummaryParams};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = EngineConfig::builder().model("t5-small").build()?;
//!     let engine = Engine::new(config).await?;
//!
//!     let request = SummarizeRequest::new("A very long document...")
//!         .with_params(SummaryParams::greedy(100, 10));
//!
//!     let response = engine.summarize(request).await?;
//!     println!("{}", response.text().unwrap_or_default());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod engine;
pub mod loader;
pub mod tokenizer;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use engine::{Engine, Summarizer};
pub use loader::{ModelFiles, ModelLoader};
pub use tokenizer::Tokenizer;
