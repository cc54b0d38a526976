//! # Error Types
//!
//! Defines error types used across discovery services.

use thiserror::Error;

/// Errors surfaced by the service lifecycle.
///
/// Only configuration problems are fatal, and only to the service instance
/// that reported them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Missing or invalid setup detected during `start`.
    #[error("Configuration error in {service}: {message}")]
    Config { service: String, message: String },

    /// The service reached the terminal `Stopped` state.
    #[error("Service {service} has been stopped")]
    Stopped { service: String },

    /// The worker loop was already handed its queue.
    #[error("Worker for {service} is already running")]
    WorkerAlreadyStarted { service: String },
}

impl ServiceError {
    /// Create a configuration error.
    pub fn config(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            service: service.into(),
            message: message.into(),
        }
    }
}
