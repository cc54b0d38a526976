//! Service Layer - Orchestration
//!
//! - `MarkovEngine`: training and generation over the shared model
//! - `MarkovService`: lifecycle and bus wiring around the engine

pub mod engine;
pub mod markov_service;

pub use engine::{MarkovEngine, SkipReason, TrainOutcome, TRAINABLE_RECORDS};
pub use markov_service::{MarkovService, SERVICE_NAME};
