//! Pipeline registry built once at startup.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use athanor::Summarizer;
use epitome_core::{Error, ModelId, Result};

use crate::stats::LatencyStats;

/// A pipeline registered in the system.
pub struct RegisteredPipeline {
    /// Model identifier.
    pub id: ModelId,
    /// The preloaded summarization pipeline.
    pub summarizer: Arc<dyn Summarizer>,
    /// Latency statistics, updated per request.
    pub stats: LatencyStats,
}

impl std::fmt::Debug for RegisteredPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredPipeline")
            .field("id", &self.id)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl RegisteredPipeline {
    fn new(id: ModelId, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            id,
            summarizer,
            stats: LatencyStats::new(),
        }
    }

    /// Records a completed request's latency.
    pub fn record_latency(&self, duration: Duration) {
        self.stats.record(duration);
    }
}

/// Registry of preloaded pipelines.
///
/// Populated through [`RegistryBuilder`] before the server starts and
/// immutable afterwards. The latency counters inside each entry update
/// atomically, but the id-to-pipeline mapping itself never changes.
pub struct PipelineRegistry {
    pipelines: HashMap<String, Arc<RegisteredPipeline>>,
    default_id: Option<String>,
}

impl PipelineRegistry {
    /// Creates a new registry builder.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Gets a pipeline by ID.
    #[must_use]
    pub fn get(&self, model_id: &str) -> Option<Arc<RegisteredPipeline>> {
        self.pipelines.get(model_id).map(Arc::clone)
    }

    /// Looks up a pipeline by ID, failing with [`Error::ModelNotFound`]
    /// carrying the identifier when absent.
    ///
    /// # Errors
    ///
    /// Returns `Error::ModelNotFound` naming the requested id.
    pub fn lookup(&self, model_id: &str) -> Result<Arc<RegisteredPipeline>> {
        self.get(model_id)
            .ok_or_else(|| Error::model_not_found(model_id))
    }

    /// Returns the default pipeline, if one was configured.
    #[must_use]
    pub fn default_pipeline(&self) -> Option<Arc<RegisteredPipeline>> {
        self.default_id.as_deref().and_then(|id| self.get(id))
    }

    /// Returns the default pipeline's id, if one was configured.
    #[must_use]
    pub fn default_id(&self) -> Option<&str> {
        self.default_id.as_deref()
    }

    /// Lists all registered model ids, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.pipelines.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Returns all registered pipelines.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<RegisteredPipeline>> {
        let mut entries: Vec<_> = self.pipelines.values().map(Arc::clone).collect();
        entries.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        entries
    }

    /// Returns the number of registered pipelines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    /// Returns true if no pipelines are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

/// Builder assembling a [`PipelineRegistry`] at process start.
#[derive(Default)]
pub struct RegistryBuilder {
    pipelines: HashMap<String, Arc<RegisteredPipeline>>,
    default_id: Option<String>,
}

impl RegistryBuilder {
    /// Registers a pipeline under the given id. Registering the same id
    /// twice replaces the earlier entry.
    #[must_use]
    pub fn register(mut self, model_id: impl Into<String>, summarizer: Arc<dyn Summarizer>) -> Self {
        let id = model_id.into();
        tracing::info!(model = %id, "Registering pipeline");
        let entry = Arc::new(RegisteredPipeline::new(ModelId::new(&id), summarizer));
        self.pipelines.insert(id, entry);
        self
    }

    /// Marks the pipeline the bare (v1) API uses when no model is named.
    #[must_use]
    pub fn default_model(mut self, model_id: impl Into<String>) -> Self {
        self.default_id = Some(model_id.into());
        self
    }

    /// Seals the registry.
    ///
    /// When no default was named explicitly and exactly one pipeline is
    /// registered, that pipeline becomes the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured default id names an unregistered
    /// pipeline.
    pub fn build(self) -> Result<PipelineRegistry> {
        let default_id = match self.default_id {
            Some(id) => {
                if !self.pipelines.contains_key(&id) {
                    return Err(Error::InvalidConfig {
                        message: format!("default model {id} is not registered"),
                    });
                }
                Some(id)
            }
            None if self.pipelines.len() == 1 => self.pipelines.keys().next().cloned(),
            None => None,
        };

        Ok(PipelineRegistry {
            pipelines: self.pipelines,
            default_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use epitome_core::{
        Candidate, ModelArchitecture, ModelMetadata, ModelSource, SummarizeRequest,
        SummaryResponse,
    };

    struct StubSummarizer {
        metadata: ModelMetadata,
    }

    impl StubSummarizer {
        fn new(id: &str) -> Arc<dyn Summarizer> {
            Arc::new(Self {
                metadata: ModelMetadata::new(
                    id,
                    ModelArchitecture::T5,
                    ModelSource::huggingface("stub"),
                ),
            })
        }
    }

    #[async_trait]
    impl Summarizer for StubSummarizer {
        async fn summarize(&self, request: SummarizeRequest) -> epitome_core::Result<SummaryResponse> {
            Ok(SummaryResponse {
                request_id: request.request_id,
                model: self.metadata.id.clone(),
                candidates: vec![Candidate {
                    index: 0,
                    text: "stub summary".to_string(),
                }],
                input_tokens: None,
                output_tokens: None,
            })
        }

        fn model_info(&self) -> &ModelMetadata {
            &self.metadata
        }

        fn is_ready(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_lookup_hit_and_miss() {
        let registry = PipelineRegistry::builder()
            .register("bart", StubSummarizer::new("bart"))
            .register("t5", StubSummarizer::new("t5"))
            .default_model("bart")
            .build()
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.get("bart").is_some());
        assert!(registry.get("gpt").is_none());

        let err = registry.lookup("gpt").unwrap_err();
        assert!(err.to_string().contains("gpt"));
    }

    #[test]
    fn test_single_pipeline_becomes_default() {
        let registry = PipelineRegistry::builder()
            .register("t5", StubSummarizer::new("t5"))
            .build()
            .unwrap();

        assert_eq!(registry.default_id(), Some("t5"));
        assert!(registry.default_pipeline().is_some());
    }

    #[test]
    fn test_unknown_default_rejected() {
        let result = PipelineRegistry::builder()
            .register("t5", StubSummarizer::new("t5"))
            .default_model("bart")
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_list_is_sorted() {
        let registry = PipelineRegistry::builder()
            .register("t5", StubSummarizer::new("t5"))
            .register("bart", StubSummarizer::new("bart"))
            .build()
            .unwrap();

        assert_eq!(registry.list(), vec!["bart".to_string(), "t5".to_string()]);
    }

    #[tokio::test]
    async fn test_latency_recording() {
        let registry = PipelineRegistry::builder()
            .register("t5", StubSummarizer::new("t5"))
            .build()
            .unwrap();

        let pipeline = registry.lookup("t5").unwrap();
        let start = std::time::Instant::now();
        let response = pipeline
            .summarizer
            .summarize(SummarizeRequest::new("text"))
            .await
            .unwrap();
        pipeline.record_latency(start.elapsed());

        assert_eq!(response.text(), Some("stub summary"));
        assert_eq!(pipeline.stats.request_count(), 1);
    }
}
