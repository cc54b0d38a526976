//! Adapters Layer (Driven Adapters)
//!
//! - `BusCandidateSink` - publishes candidates on the shared bus

pub mod bus_adapter;

pub use bus_adapter::BusCandidateSink;
