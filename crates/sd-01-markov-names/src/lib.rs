//! # SD-01 Markov Names
//!
//! Guesses new subdomains from a character-level Markov model trained on
//! names that have already resolved.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `NgramModel`: context → next-char counts and frequencies
//!   - `generate_label`: sentinel-seeded walk with context fallback
//!   - `SuffixRegistry`: suffixes generated labels are attached to
//!   - `MarkovConfig`: configuration with validation
//!
//! - **Ports Layer** (`ports/`): `CandidateSink` (driven port)
//!
//! - **Service Layer** (`service/`): `MarkovEngine`, `MarkovService`
//!
//! - **Adapters Layer** (`adapters/`): `BusCandidateSink`
//!
//! ## Training
//!
//! A resolved name is learned once, and only if it carries an A, AAAA,
//! CNAME or TXT record and is in scope. Its first label is windowed into
//! `(context, next char)` pairs: "www" with width 3 observes "```"→w,
//! "``w"→w, "`ww"→w and "www"→".".
//!
//! ## Generation
//!
//! Every 50 trained labels the frequencies are recomputed and a burst of
//! labels is drawn. Each label is tried under every known suffix; names
//! already resolved or already guessed, and names outside the suffix's
//! domain, are dropped.
//!
//! ## Usage Example
//!
//! ```ignore
//! use sd_01_markov_names::{MarkovConfig, MarkovService};
//! use shared_types::Service;
//!
//! let service = MarkovService::new(MarkovConfig::default(), scope, bus.clone());
//! service.start()?;
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::BusCandidateSink;
pub use domain::{MarkovConfig, NgramModel, SuffixRegistry};
pub use error::MarkovError;
pub use ports::{CandidateSink, CollectingSink};
pub use service::{MarkovEngine, MarkovService, SkipReason, TrainOutcome, SERVICE_NAME};
