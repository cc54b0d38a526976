//! # Shared Types Crate
//!
//! This crate contains the discovery request model and the service contract
//! shared by every discovery service, together with the synchronized
//! primitives those services are built from.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Request` is the only value that crosses
//!   service boundaries.
//! - **Uniform Lifecycle**: Every service implements [`Service`] and moves
//!   through the same [`ServiceState`] machine.
//! - **Internally Synchronized Primitives**: [`RateLimiter`],
//!   [`StringFilter`] and [`DomainScope`] can be shared behind an `Arc`
//!   without external locking.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod entities;
pub mod errors;
pub mod rate_limiter;
pub mod scope;
pub mod service_trait;
pub mod string_filter;

pub use entities::*;
pub use errors::*;
pub use rate_limiter::{RateLimiter, SystemTimeSource, TimeSource};
pub use scope::DomainScope;
pub use service_trait::{DynService, Service, ServiceInfo, ServiceState};
pub use string_filter::StringFilter;

/// Maximum length of a single DNS label in octets (RFC 1035).
pub const MAX_DNS_LABEL_LEN: usize = 63;
