//! # Scout Runtime
//!
//! Builds the event bus and every discovery service, feeds resolved names
//! into the bus and surfaces what the services discover.
//!
//! ## Services
//!
//! - Markov Model (sd-01) - guesses new labels from resolved names
//! - URLScan (sd-02) - names linked from past and fresh scans

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod container;
pub mod wiring;

pub use container::{ConfigError, ContainerError, RuntimeConfig, ServiceContainer};
pub use wiring::{parse_resolved_line, ScoutRuntime};
