//! Ports Layer
//!
//! Defines the driven ports (outbound dependencies) of the generator.

pub mod outbound;

pub use outbound::{CandidateSink, CollectingSink};
