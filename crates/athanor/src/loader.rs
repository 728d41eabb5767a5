//! Model file resolution with HuggingFace Hub integration.

use std::path::{Path, PathBuf};

use hf_hub::api::sync::{Api, ApiBuilder, ApiRepo};
use hf_hub::{Repo, RepoType};
use tracing::{debug, info};

use epitome_core::{Error, ModelSource, Result};

/// Resolved local paths for a model's files.
#[derive(Debug, Clone)]
pub struct ModelFiles {
    /// Path to `config.json`.
    pub config: PathBuf,
    /// Path to `tokenizer.json`, if present.
    pub tokenizer: Option<PathBuf>,
    /// Safetensors weight files, single or sharded.
    pub weights: Vec<PathBuf>,
}

/// Resolves model sources to local files, downloading from the Hub when
/// necessary.
pub struct ModelLoader {
    api: Api,
}

impl ModelLoader {
    /// Creates a new model loader.
    ///
    /// # Errors
    ///
    /// Returns an error if the HuggingFace API cannot be initialized.
    pub fn new() -> Result<Self> {
        let api = Api::new().map_err(|e| Error::ModelLoad {
            message: format!("Failed to initialize HuggingFace API: {e}"),
        })?;
        Ok(Self { api })
    }

    /// Creates a model loader that caches downloads under the given
    /// directory instead of the default HuggingFace cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the HuggingFace API cannot be initialized.
    pub fn with_cache_dir(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let api = ApiBuilder::new()
            .with_cache_dir(cache_dir.into())
            .build()
            .map_err(|e| Error::ModelLoad {
                message: format!("Failed to initialize HuggingFace API: {e}"),
            })?;
        Ok(Self { api })
    }

    /// Resolves a model source to local paths for all required files.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be resolved or downloaded.
    pub fn resolve(&self, source: &ModelSource) -> Result<ModelFiles> {
        match source {
            ModelSource::HuggingFace { repo_id, revision } => {
                self.resolve_huggingface(repo_id, revision.as_deref())
            }
            ModelSource::LocalPath { path } => Self::resolve_local(path),
        }
    }

    /// Resolves a HuggingFace model, downloading if necessary.
    fn resolve_huggingface(&self, repo_id: &str, revision: Option<&str>) -> Result<ModelFiles> {
        info!(repo_id, revision, "Resolving HuggingFace model");

        let repo = self.api.repo(Repo::with_revision(
            repo_id.to_string(),
            RepoType::Model,
            revision.unwrap_or("main").to_string(),
        ));

        let config = repo.get("config.json").map_err(|e| Error::ModelLoad {
            message: format!("Failed to download config.json from {repo_id}: {e}"),
        })?;
        debug!(?config, "Downloaded config.json");

        let tokenizer = repo.get("tokenizer.json").ok();
        let weights = Self::resolve_weights(&repo, repo_id)?;

        Ok(ModelFiles {
            config,
            tokenizer,
            weights,
        })
    }

    /// Resolves safetensors weight files, single-file or sharded.
    fn resolve_weights(repo: &ApiRepo, repo_id: &str) -> Result<Vec<PathBuf>> {
        if let Ok(path) = repo.get("model.safetensors") {
            debug!("Found single safetensors file");
            return Ok(vec![path]);
        }

        if let Ok(index_path) = repo.get("model.safetensors.index.json") {
            let shard_names = Self::shard_names(&index_path)?;
            info!(num_shards = shard_names.len(), "Downloading model shards");

            let mut shards = Vec::with_capacity(shard_names.len());
            for name in &shard_names {
                let path = repo.get(name).map_err(|e| Error::ModelLoad {
                    message: format!("Failed to download shard {name}: {e}"),
                })?;
                shards.push(path);
            }
            return Ok(shards);
        }

        Err(Error::ModelLoad {
            message: format!("No safetensors weights found in {repo_id}"),
        })
    }

    /// Extracts the unique shard filenames from a safetensors index.
    fn shard_names(index_path: &Path) -> Result<Vec<String>> {
        let index: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(index_path)?)?;

        let weight_map = index
            .get("weight_map")
            .and_then(|w| w.as_object())
            .ok_or_else(|| Error::ModelLoad {
                message: "Invalid safetensors index: missing weight_map".to_string(),
            })?;

        let mut names: Vec<String> = weight_map
            .values()
            .filter_map(|v| v.as_str())
            .map(String::from)
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Resolves a local model directory.
    fn resolve_local(path: &Path) -> Result<ModelFiles> {
        debug!(?path, "Resolving local model");

        if !path.is_dir() {
            return Err(Error::ModelNotFound {
                model_id: path.display().to_string(),
            });
        }

        let config = path.join("config.json");
        if !config.exists() {
            return Err(Error::ModelLoad {
                message: format!("config.json not found in {}", path.display()),
            });
        }

        let tokenizer = Some(path.join("tokenizer.json")).filter(|p| p.exists());

        let single = path.join("model.safetensors");
        let weights = if single.exists() {
            vec![single]
        } else {
            let index = path.join("model.safetensors.index.json");
            if index.exists() {
                Self::shard_names(&index)?
                    .into_iter()
                    .map(|name| path.join(name))
                    .collect()
            } else {
                return Err(Error::ModelLoad {
                    message: format!("No safetensors weights found in {}", path.display()),
                });
            }
        };

        Ok(ModelFiles {
            config,
            tokenizer,
            weights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_local_path() {
        let err = ModelLoader::resolve_local(Path::new("/nonexistent/model")).unwrap_err();
        assert!(matches!(err, Error::ModelNotFound { .. }));
    }

    #[test]
    fn test_local_dir_without_config() {
        let dir = std::env::temp_dir().join("athanor-loader-test-empty");
        std::fs::create_dir_all(&dir).unwrap();
        let err = ModelLoader::resolve_local(&dir).unwrap_err();
        assert!(matches!(err, Error::ModelLoad { .. }));
    }
}
