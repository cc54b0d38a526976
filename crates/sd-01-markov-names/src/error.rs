//! Error types for the Markov name generator

use shared_types::ServiceError;
use thiserror::Error;

/// Errors that can occur in the Markov name generator
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MarkovError {
    #[error("Invalid n-gram size: {0} (must be at least 1)")]
    InvalidNgramSize(usize),

    #[error("Invalid maximum label length: {len} (must be between 1 and {max})")]
    InvalidLabelLength { len: usize, max: usize },

    #[error("Invalid configuration: {0}")]
    InvalidParameters(String),
}

impl MarkovError {
    /// Convert into the lifecycle error reported by `start`.
    pub fn into_service_error(self, service: &str) -> ServiceError {
        ServiceError::config(service, self.to_string())
    }
}
