//! # Subscout Test Suite
//!
//! Unified test crate for behavior that spans more than one crate.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks (model, scope, bus)
//! └── src/integration/  # Cross-service flows over the shared bus
//!     ├── flows.rs      # Resolved names in, discoveries out
//!     └── lifecycle.rs  # Pause/resume/stop across services
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p scout-tests
//!
//! # By category
//! cargo test -p scout-tests integration::flows
//! cargo test -p scout-tests integration::lifecycle
//!
//! # Benchmarks
//! cargo bench -p scout-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
