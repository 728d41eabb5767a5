//! Core summarization engine implementation.

use std::time::Instant;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::t5;
use parking_lot::Mutex;

use epitome_core::{
    Candidate, DeviceType, Error, ModelArchitecture, ModelMetadata, Result, SummarizeRequest,
    SummaryResponse,
};

use crate::config::EngineConfig;
use crate::loader::{ModelFiles, ModelLoader};
use crate::tokenizer::Tokenizer;

/// Trait defining a preloaded summarization pipeline.
///
/// Implementations take text and return generated summary candidates; the
/// first candidate is the summary. Registered pipelines are shared
/// read-only across requests, so implementations must be `Send + Sync`.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Generates a summary for the given request.
    async fn summarize(&self, request: SummarizeRequest) -> Result<SummaryResponse>;

    /// Returns metadata about the loaded model.
    fn model_info(&self) -> &ModelMetadata;

    /// Returns true if the pipeline is ready for inference.
    fn is_ready(&self) -> bool;
}

/// Loaded model state. Forward passes take `&mut`, so the model sits
/// behind a mutex; requests serialize on it.
struct LoadedModel {
    model: Mutex<t5::T5ForConditionalGeneration>,
    tokenizer: Tokenizer,
    model_config: t5::Config,
}

/// The candle-backed summarization engine.
pub struct Engine {
    metadata: ModelMetadata,
    loaded: LoadedModel,
    device: Device,
}

impl Engine {
    /// Creates a new engine with the given configuration, downloading and
    /// loading the checkpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be resolved, is not a supported
    /// architecture, or fails to load.
    pub async fn new(config: EngineConfig) -> Result<Self> {
        tracing::info!(model = %config.model, "Initializing Athanor engine");

        let device = Self::select_device(&config)?;
        tracing::debug!(device = ?device, "Using compute device");

        let loader = match &config.cache_dir {
            Some(dir) => ModelLoader::with_cache_dir(dir.clone())?,
            None => ModelLoader::new()?,
        };
        let files = loader.resolve(&config.model)?;

        let raw_config = std::fs::read_to_string(&files.config)?;
        let architecture = Self::detect_architecture(&config, &raw_config)?;

        // Only the T5 family has a candle port wired in here. BART
        // checkpoints are recognized in metadata but refused at load time.
        if architecture != ModelArchitecture::T5 {
            return Err(Error::UnsupportedArchitecture {
                architecture: architecture.to_string(),
            });
        }

        let model_config: t5::Config = serde_json::from_str(&raw_config)?;
        let loaded = Self::load_model(&files, model_config, &device)?;

        let metadata = ModelMetadata::new(config.model_id(), architecture, config.model.clone())
            .with_vocab_size(u32::try_from(loaded.model_config.vocab_size).unwrap_or(u32::MAX));

        tracing::info!(model = %metadata.id, %architecture, "Engine initialized");

        Ok(Self {
            metadata,
            loaded,
            device,
        })
    }

    /// Selects the compute device based on configuration and availability.
    fn select_device(config: &EngineConfig) -> Result<Device> {
        match &config.device {
            DeviceType::Cpu => Ok(Device::Cpu),
            DeviceType::Cuda {
                device_id: _device_id,
            } => {
                #[cfg(feature = "cuda")]
                {
                    Device::new_cuda(*_device_id)
                        .map_err(|e| Error::backend("cuda", e.to_string()))
                }
                #[cfg(not(feature = "cuda"))]
                {
                    tracing::warn!("CUDA requested but not compiled in, falling back to CPU");
                    Ok(Device::Cpu)
                }
            }
            DeviceType::Metal {
                device_id: _device_id,
            } => {
                #[cfg(feature = "metal")]
                {
                    Device::new_metal(*_device_id)
                        .map_err(|e| Error::backend("metal", e.to_string()))
                }
                #[cfg(not(feature = "metal"))]
                {
                    tracing::warn!("Metal requested but not compiled in, falling back to CPU");
                    Ok(Device::Cpu)
                }
            }
        }
    }

    /// Determines the checkpoint architecture, preferring the configured
    /// value over `config.json` detection.
    fn detect_architecture(config: &EngineConfig, raw_config: &str) -> Result<ModelArchitecture> {
        if let Some(architecture) = config.architecture {
            return Ok(architecture);
        }

        let value: serde_json::Value = serde_json::from_str(raw_config)?;
        let model_type = value
            .get("model_type")
            .and_then(|t| t.as_str())
            .unwrap_or_default();

        ModelArchitecture::from_model_type(model_type).ok_or_else(|| {
            Error::UnsupportedArchitecture {
                architecture: model_type.to_string(),
            }
        })
    }

    /// Loads the model weights and tokenizer from resolved files.
    fn load_model(files: &ModelFiles, model_config: t5::Config, device: &Device) -> Result<LoadedModel> {
        tracing::info!("Loading model weights...");
        let start = Instant::now();

        let tokenizer_path = files.tokenizer.as_ref().ok_or_else(|| Error::ModelLoad {
            message: "No tokenizer.json found for model".to_string(),
        })?;
        let tokenizer = Tokenizer::from_file(tokenizer_path)?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&files.weights, DType::F32, device)
                .map_err(|e| Error::model_load(format!("Failed to map weights: {e}")))?
        };

        let model = t5::T5ForConditionalGeneration::load(vb, &model_config)
            .map_err(|e| Error::model_load(format!("Failed to load T5 model: {e}")))?;

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis(),
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            model: Mutex::new(model),
            tokenizer,
            model_config,
        })
    }

    fn device_name(&self) -> &'static str {
        match &self.device {
            Device::Cpu => "cpu",
            Device::Cuda(_) => "cuda",
            Device::Metal(_) => "metal",
        }
    }

    fn wrap(&self, e: candle_core::Error) -> Error {
        Error::backend(self.device_name(), e.to_string())
    }

    /// Replaces one token's logit with negative infinity so it cannot be
    /// selected.
    fn suppress_token(&self, logits: &Tensor, token: u32) -> Result<Tensor> {
        let mut values = logits.to_vec1::<f32>().map_err(|e| self.wrap(e))?;
        if let Some(v) = values.get_mut(token as usize) {
            *v = f32::NEG_INFINITY;
        }
        Tensor::new(values.as_slice(), &self.device).map_err(|e| self.wrap(e))
    }
}

#[async_trait]
impl Summarizer for Engine {
    async fn summarize(&self, request: SummarizeRequest) -> Result<SummaryResponse> {
        let params = &request.params;

        // T5 checkpoints expect the task spelled out in the input.
        let prefix = self.metadata.architecture.task_prefix().unwrap_or("");
        let input = format!("{prefix}{}", request.text);

        let input_ids = self.loaded.tokenizer.encode(&input, true)?;
        let input_tensor = Tensor::new(input_ids.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| self.wrap(e))?;

        let config = &self.loaded.model_config;
        let start_token =
            u32::try_from(config.decoder_start_token_id.unwrap_or(config.pad_token_id))
                .map_err(|_| Error::internal("decoder start token out of range"))?;
        let eos_token = u32::try_from(config.eos_token_id)
            .map_err(|_| Error::internal("eos token out of range"))?;

        let temperature = if params.do_sample {
            Some(params.temperature.unwrap_or(1.0))
        } else {
            None
        };
        let mut logits_processor = LogitsProcessor::new(params.seed, temperature, None);

        let mut model = self.loaded.model.lock();
        model.clear_kv_cache();

        let encoder_output = model.encode(&input_tensor).map_err(|e| self.wrap(e))?;

        let mut output_ids = vec![start_token];
        for step in 0..params.max_length {
            let decoder_ids = if step == 0 || !config.use_cache {
                Tensor::new(output_ids.as_slice(), &self.device)
            } else {
                Tensor::new(&[output_ids[output_ids.len() - 1]], &self.device)
            }
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| self.wrap(e))?;

            let logits = model
                .decode(&decoder_ids, &encoder_output)
                .and_then(|l| l.squeeze(0))
                .map_err(|e| self.wrap(e))?;

            // Honor the minimum length by keeping EOS unreachable until then.
            let logits = if step < params.min_length {
                self.suppress_token(&logits, eos_token)?
            } else {
                logits
            };

            let next = logits_processor.sample(&logits).map_err(|e| self.wrap(e))?;
            if next == eos_token {
                break;
            }
            output_ids.push(next);
        }

        let generated = &output_ids[1..];
        let text = self.loaded.tokenizer.decode(generated, true)?;

        tracing::debug!(
            request_id = %request.request_id,
            model = %self.metadata.id,
            input_tokens = input_ids.len(),
            output_tokens = generated.len(),
            "Summary generated"
        );

        Ok(SummaryResponse {
            request_id: request.request_id,
            model: self.metadata.id.clone(),
            candidates: vec![Candidate {
                index: 0,
                text: text.trim().to_string(),
            }],
            input_tokens: Some(u32::try_from(input_ids.len()).unwrap_or(u32::MAX)),
            output_tokens: Some(u32::try_from(generated.len()).unwrap_or(u32::MAX)),
        })
    }

    fn model_info(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn is_ready(&self) -> bool {
        true
    }
}
