//! Generation parameters for summarization.

use serde::{Deserialize, Serialize};

fn default_max_length() -> u32 {
    142
}

fn default_min_length() -> u32 {
    56
}

fn default_seed() -> u64 {
    299_792_458
}

/// Parameters controlling summary generation.
///
/// Defaults match the generation config shipped with
/// `facebook/bart-large-cnn`, the checkpoint the service was originally
/// built around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryParams {
    /// Maximum summary length in tokens.
    #[serde(default = "default_max_length")]
    pub max_length: u32,

    /// Minimum summary length in tokens. The end-of-sequence token is
    /// suppressed until this many tokens have been generated.
    #[serde(default = "default_min_length")]
    pub min_length: u32,

    /// Whether to sample. `false` selects greedy decoding.
    #[serde(default)]
    pub do_sample: bool,

    /// Sampling temperature, only used when `do_sample` is set.
    #[serde(default)]
    pub temperature: Option<f64>,

    /// Seed for the sampling RNG.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SummaryParams {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            min_length: default_min_length(),
            do_sample: false,
            temperature: None,
            seed: default_seed(),
        }
    }
}

impl SummaryParams {
    /// Creates greedy-decoding parameters with the given length bounds.
    #[must_use]
    pub fn greedy(max_length: u32, min_length: u32) -> Self {
        Self {
            max_length,
            min_length,
            ..Self::default()
        }
    }

    /// Sets the maximum summary length.
    #[must_use]
    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = max_length;
        self
    }

    /// Sets the minimum summary length.
    #[must_use]
    pub fn with_min_length(mut self, min_length: u32) -> Self {
        self.min_length = min_length;
        self
    }

    /// Enables sampling with the given temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.do_sample = true;
        self.temperature = Some(temperature);
        self
    }
}
