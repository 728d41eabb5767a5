//! Model metadata and architecture types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::ModelId;

/// Source location for a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelSource {
    /// HuggingFace Hub model.
    HuggingFace {
        /// Repository ID (e.g., "t5-small" or "facebook/bart-large-cnn").
        repo_id: String,
        /// Optional revision (branch, tag, or commit).
        revision: Option<String>,
    },
    /// Local filesystem path.
    LocalPath {
        /// Path to the model directory.
        path: PathBuf,
    },
}

impl ModelSource {
    /// Creates a HuggingFace source.
    #[must_use]
    pub fn huggingface(repo_id: impl Into<String>) -> Self {
        Self::HuggingFace {
            repo_id: repo_id.into(),
            revision: None,
        }
    }

    /// Creates a HuggingFace source with a specific revision.
    #[must_use]
    pub fn huggingface_rev(repo_id: impl Into<String>, revision: impl Into<String>) -> Self {
        Self::HuggingFace {
            repo_id: repo_id.into(),
            revision: Some(revision.into()),
        }
    }

    /// Creates a local path source.
    #[must_use]
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::LocalPath { path: path.into() }
    }
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HuggingFace { repo_id, .. } => write!(f, "{repo_id}"),
            Self::LocalPath { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Supported summarization model architectures.
///
/// Both families are sequence-to-sequence; metadata distinguishes them so
/// the engine can pick the right loading path (or refuse one it does not
/// implement yet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelArchitecture {
    /// BART family (e.g., facebook/bart-large-cnn).
    Bart,
    /// T5 family (e.g., t5-small, flan-t5-base).
    T5,
}

impl ModelArchitecture {
    /// Detects the architecture from a HuggingFace `config.json`
    /// `model_type` value.
    #[must_use]
    pub fn from_model_type(model_type: &str) -> Option<Self> {
        match model_type {
            "bart" => Some(Self::Bart),
            "t5" => Some(Self::T5),
            _ => None,
        }
    }

    /// Returns the task prefix the architecture expects prepended to the
    /// input text, if any. T5 checkpoints are trained with an explicit
    /// "summarize: " prefix; BART takes the raw document.
    #[must_use]
    pub fn task_prefix(&self) -> Option<&'static str> {
        match self {
            Self::T5 => Some("summarize: "),
            Self::Bart => None,
        }
    }
}

impl std::fmt::Display for ModelArchitecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bart => write!(f, "bart"),
            Self::T5 => write!(f, "t5"),
        }
    }
}

/// Model metadata and capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Unique model identifier.
    pub id: ModelId,
    /// Model architecture.
    pub architecture: ModelArchitecture,
    /// Model source location.
    pub source: ModelSource,
    /// Vocabulary size, if known.
    pub vocab_size: Option<u32>,
    /// Human-readable description.
    pub description: Option<String>,
}

impl ModelMetadata {
    /// Creates metadata for a model.
    #[must_use]
    pub fn new(id: impl Into<ModelId>, architecture: ModelArchitecture, source: ModelSource) -> Self {
        Self {
            id: id.into(),
            architecture,
            source,
            vocab_size: None,
            description: None,
        }
    }

    /// Sets the vocabulary size.
    #[must_use]
    pub fn with_vocab_size(mut self, vocab_size: u32) -> Self {
        self.vocab_size = Some(vocab_size);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_architecture_detection() {
        assert_eq!(
            ModelArchitecture::from_model_type("t5"),
            Some(ModelArchitecture::T5)
        );
        assert_eq!(
            ModelArchitecture::from_model_type("bart"),
            Some(ModelArchitecture::Bart)
        );
        assert_eq!(ModelArchitecture::from_model_type("llama"), None);
    }

    #[test]
    fn test_task_prefix() {
        assert_eq!(ModelArchitecture::T5.task_prefix(), Some("summarize: "));
        assert_eq!(ModelArchitecture::Bart.task_prefix(), None);
    }
}
