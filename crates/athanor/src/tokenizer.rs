//! Tokenizer wrapper for text encoding/decoding.

use std::path::Path;

use epitome_core::{Error, Result};

/// Wrapper around `tokenizers` for sequence-to-sequence checkpoints.
pub struct Tokenizer {
    inner: tokenizers::Tokenizer,
    /// End of sequence token ID.
    pub eos_token_id: Option<u32>,
    /// Padding token ID.
    pub pad_token_id: Option<u32>,
}

impl Tokenizer {
    /// Loads a tokenizer from a `tokenizer.json` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the tokenizer cannot be loaded.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let inner = tokenizers::Tokenizer::from_file(path)
            .map_err(|e| Error::tokenization(e.to_string()))?;
        Ok(Self::from_tokenizer(inner))
    }

    /// Creates a wrapper from an existing tokenizer, extracting the special
    /// token IDs T5/BART vocabularies use.
    fn from_tokenizer(inner: tokenizers::Tokenizer) -> Self {
        let eos_token_id = inner.token_to_id("</s>");
        let pad_token_id = inner.token_to_id("<pad>").or_else(|| inner.token_to_id("[PAD]"));

        Self {
            inner,
            eos_token_id,
            pad_token_id,
        }
    }

    /// Encodes text to token IDs.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn encode(&self, text: &str, add_special_tokens: bool) -> Result<Vec<u32>> {
        let encoding = self
            .inner
            .encode(text, add_special_tokens)
            .map_err(|e| Error::tokenization(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    /// Decodes token IDs to text.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails.
    pub fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String> {
        self.inner
            .decode(ids, skip_special_tokens)
            .map_err(|e| Error::tokenization(e.to_string()))
    }

    /// Returns the vocabulary size.
    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }
}

#[cfg(test)]
mod tests {
    // Tests would require actual tokenizer files; the engine is exercised
    // end-to-end through mock pipelines in the server crate.
}
