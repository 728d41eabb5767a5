//! Common types used across the Epitome stack.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a model.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ModelId(pub String);

impl ModelId {
    /// Creates a new `ModelId` from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ModelId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for a request.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    /// Creates a new random `RequestId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task requested by a client.
///
/// The wire format carries an arbitrary string; only summarization is
/// implemented. Unknown task names round-trip unchanged so error messages
/// can echo them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Task {
    /// Text summarization.
    Summarize,
    /// Any other task name, preserved verbatim.
    Other(String),
}

impl Task {
    /// Returns `true` if the task is implemented by the service.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Summarize)
    }
}

impl From<String> for Task {
    fn from(s: String) -> Self {
        if s == "summarize" {
            Self::Summarize
        } else {
            Self::Other(s)
        }
    }
}

impl From<Task> for String {
    fn from(task: Task) -> Self {
        task.to_string()
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summarize => write!(f, "summarize"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Device type for computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceType {
    /// CPU computation.
    Cpu,
    /// CUDA GPU computation.
    Cuda {
        /// GPU device index.
        device_id: usize,
    },
    /// Apple Metal GPU computation.
    Metal {
        /// GPU device index.
        device_id: usize,
    },
}

impl Default for DeviceType {
    fn default() -> Self {
        Self::Cpu
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_round_trip() {
        let task: Task = serde_json::from_str("\"summarize\"").unwrap();
        assert_eq!(task, Task::Summarize);
        assert!(task.is_supported());

        let task: Task = serde_json::from_str("\"translate\"").unwrap();
        assert_eq!(task, Task::Other("translate".to_string()));
        assert!(!task.is_supported());
        assert_eq!(serde_json::to_string(&task).unwrap(), "\"translate\"");
    }

    #[test]
    fn test_model_id_display() {
        assert_eq!(ModelId::new("bart").to_string(), "bart");
    }
}
