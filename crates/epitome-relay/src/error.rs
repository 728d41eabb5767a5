//! Relay error types.

use thiserror::Error;

/// Result type alias using [`RelayError`].
pub type Result<T> = std::result::Result<T, RelayError>;

/// Errors the relay can hit while forwarding and recording a job.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The inference service could not be reached or answered abnormally.
    #[error("Inference service error: {0}")]
    Http(#[from] reqwest::Error),

    /// The inference service answered, but with an error or an unusable
    /// body.
    #[error("Invalid inference response: {0}")]
    Upstream(String),

    /// Checking a connection out of the pool failed.
    #[error("Database pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// A query failed.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// The relay was misconfigured.
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display() {
        let err = RelayError::Upstream("missing output".to_string());
        assert_eq!(err.to_string(), "Invalid inference response: missing output");
    }
}
