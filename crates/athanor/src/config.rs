//! Configuration types for the Athanor summarization engine.

use std::path::PathBuf;

use epitome_core::{DeviceType, Error, ModelArchitecture, ModelId, ModelSource, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the summarization engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Identifier reported in metadata. Defaults to the model source name.
    pub id: Option<ModelId>,

    /// Model source.
    pub model: ModelSource,

    /// Expected architecture. `None` detects it from the checkpoint's
    /// `config.json`.
    pub architecture: Option<ModelArchitecture>,

    /// Device to run inference on.
    pub device: DeviceType,

    /// Path to store downloaded models. `None` uses the platform cache
    /// directory.
    pub cache_dir: Option<PathBuf>,
}

impl EngineConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Returns the identifier to report for this engine.
    #[must_use]
    pub fn model_id(&self) -> ModelId {
        self.id
            .clone()
            .unwrap_or_else(|| ModelId::new(self.model.to_string()))
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    id: Option<ModelId>,
    model: Option<ModelSource>,
    architecture: Option<ModelArchitecture>,
    device: Option<DeviceType>,
    cache_dir: Option<PathBuf>,
}

impl EngineConfigBuilder {
    /// Sets the model from a HuggingFace repository ID.
    #[must_use]
    pub fn model(mut self, repo_id: impl Into<String>) -> Self {
        self.model = Some(ModelSource::huggingface(repo_id));
        self
    }

    /// Sets the model source directly.
    #[must_use]
    pub fn model_source(mut self, source: ModelSource) -> Self {
        self.model = Some(source);
        self
    }

    /// Sets the identifier reported in metadata.
    #[must_use]
    pub fn id(mut self, id: impl Into<ModelId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the expected architecture.
    #[must_use]
    pub fn architecture(mut self, architecture: ModelArchitecture) -> Self {
        self.architecture = Some(architecture);
        self
    }

    /// Sets the compute device.
    #[must_use]
    pub fn device(mut self, device: DeviceType) -> Self {
        self.device = Some(device);
        self
    }

    /// Sets the model cache directory.
    #[must_use]
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Builds the engine config.
    ///
    /// # Errors
    ///
    /// Returns an error if no model source was provided or the source names
    /// an empty repository.
    pub fn build(self) -> Result<EngineConfig> {
        let model = self.model.ok_or_else(|| Error::InvalidConfig {
            message: "no model source provided".to_string(),
        })?;

        if let ModelSource::HuggingFace { repo_id, .. } = &model {
            if repo_id.is_empty() {
                return Err(Error::InvalidConfig {
                    message: "empty HuggingFace repository id".to_string(),
                });
            }
        }

        Ok(EngineConfig {
            id: self.id,
            model,
            architecture: self.architecture,
            device: self.device.unwrap_or_default(),
            cache_dir: self.cache_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_model() {
        let err = EngineConfig::builder().build().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_builder_rejects_empty_repo() {
        let err = EngineConfig::builder().model("").build().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_model_id_defaults_to_source() {
        let config = EngineConfig::builder().model("t5-small").build().unwrap();
        assert_eq!(config.model_id(), ModelId::new("t5-small"));

        let config = EngineConfig::builder()
            .model("t5-small")
            .id("t5")
            .build()
            .unwrap();
        assert_eq!(config.model_id(), ModelId::new("t5"));
    }
}
