//! Markov generator configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use sd_01_markov_names::MarkovConfig;
//!
//! let config = MarkovConfig::default()
//!     .with_ngram_size(4)
//!     .with_num_names(500);
//! config.validate()?;
//! ```

use crate::error::MarkovError;
use serde::{Deserialize, Serialize};
use shared_types::MAX_DNS_LABEL_LEN;

/// Markov generator configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkovConfig {
    /// Width of the context window, in characters
    pub ngram_size: usize,
    /// Labels generated per burst
    pub num_names: usize,
    /// Longest label accepted from the generator (bytes)
    pub max_label_len: usize,
    /// Trained labels between frequency recomputations (and bursts)
    pub recompute_every: u64,
    /// Attempts at producing one acceptable label before giving up
    pub max_label_attempts: usize,
    /// Whether the service subscribes to resolved names at all
    pub alterations: bool,
}

impl Default for MarkovConfig {
    fn default() -> Self {
        Self {
            ngram_size: 3,
            num_names: 10_000,
            max_label_len: MAX_DNS_LABEL_LEN,
            recompute_every: 50,
            max_label_attempts: 100,
            alterations: true,
        }
    }
}

impl MarkovConfig {
    /// Validate ranges
    pub fn validate(&self) -> Result<(), MarkovError> {
        if self.ngram_size == 0 {
            return Err(MarkovError::InvalidNgramSize(self.ngram_size));
        }

        if self.max_label_len == 0 || self.max_label_len > MAX_DNS_LABEL_LEN {
            return Err(MarkovError::InvalidLabelLength {
                len: self.max_label_len,
                max: MAX_DNS_LABEL_LEN,
            });
        }

        if self.recompute_every == 0 {
            return Err(MarkovError::InvalidParameters(
                "recompute_every cannot be 0".to_string(),
            ));
        }

        if self.max_label_attempts == 0 {
            return Err(MarkovError::InvalidParameters(
                "max_label_attempts cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder-style method to set the context width
    pub fn with_ngram_size(mut self, size: usize) -> Self {
        self.ngram_size = size;
        self
    }

    /// Builder-style method to set the burst size
    pub fn with_num_names(mut self, num: usize) -> Self {
        self.num_names = num;
        self
    }

    /// Builder-style method to set the maximum label length
    pub fn with_max_label_len(mut self, len: usize) -> Self {
        self.max_label_len = len;
        self
    }

    /// Builder-style method to set the recomputation period
    pub fn with_recompute_every(mut self, labels: u64) -> Self {
        self.recompute_every = labels;
        self
    }

    /// Builder-style method to enable or disable training
    pub fn with_alterations(mut self, enabled: bool) -> Self {
        self.alterations = enabled;
        self
    }
}
