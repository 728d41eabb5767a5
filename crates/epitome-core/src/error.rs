//! Error types for the Epitome stack.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the Epitome stack.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested task is not supported by the service.
    #[error("Unsupported task: {task}")]
    UnsupportedTask {
        /// The task name from the request.
        task: String,
    },

    /// Model was not found in the registry.
    #[error("Model not supported: {model_id}")]
    ModelNotFound {
        /// The requested model identifier.
        model_id: String,
    },

    /// Model architecture is not supported by the engine.
    #[error("Unsupported model architecture: {architecture}")]
    UnsupportedArchitecture {
        /// The unsupported architecture name.
        architecture: String,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// Tokenization error.
    #[error("Tokenization error: {message}")]
    Tokenization {
        /// Error message.
        message: String,
    },

    /// Model loading error.
    #[error("Failed to load model: {message}")]
    ModelLoad {
        /// Error message.
        message: String,
    },

    /// Backend-specific error from the compute layer.
    #[error("Backend error: {message}")]
    Backend {
        /// Backend name (cpu, cuda, metal).
        backend: String,
        /// Error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Returns `true` if this error was caused by the client's request
    /// rather than a server-side failure.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedTask { .. } | Self::ModelNotFound { .. } | Self::InvalidConfig { .. }
        )
    }

    /// Creates an unsupported-task error.
    #[must_use]
    pub fn unsupported_task(task: impl Into<String>) -> Self {
        Self::UnsupportedTask { task: task.into() }
    }

    /// Creates a model-not-found error.
    #[must_use]
    pub fn model_not_found(model_id: impl Into<String>) -> Self {
        Self::ModelNotFound {
            model_id: model_id.into(),
        }
    }

    /// Creates an internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates a backend error with the given backend name and message.
    #[must_use]
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Creates a model load error.
    #[must_use]
    pub fn model_load(message: impl Into<String>) -> Self {
        Self::ModelLoad {
            message: message.into(),
        }
    }

    /// Creates a tokenization error.
    #[must_use]
    pub fn tokenization(message: impl Into<String>) -> Self {
        Self::Tokenization {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_not_found_names_the_id() {
        let err = Error::model_not_found("gpt");
        assert_eq!(err.to_string(), "Model not supported: gpt");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_unsupported_task_display() {
        let err = Error::unsupported_task("translate");
        assert_eq!(err.to_string(), "Unsupported task: translate");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_backend_errors_are_not_client_errors() {
        let err = Error::backend("cpu", "matmul shape mismatch");
        assert!(!err.is_client_error());
    }
}
