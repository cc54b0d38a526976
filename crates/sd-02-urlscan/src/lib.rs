//! # SD-02 URLScan
//!
//! Data source backed by the urlscan.io API.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `UrlScanConfig`, endpoint URLs, poll
//!   backoff, and the API payloads
//! - **Ports Layer** (`ports/`): `WebClient` (driven port), `MockWebClient`
//! - **Adapters Layer** (`adapters/`): `ReqwestWebClient`
//! - **Service Layer** (`service/`): `UrlScanService`
//!
//! ## Lookup Flow
//!
//! ```text
//! lookup(D) ──→ GET search/?q=domain:D
//!                 │ total > 0          │ total == 0 (and API key set)
//!                 ↓                    ↓
//!            scan ids            POST scan/ ──→ poll result while 404
//!                 └────────┬───────────┘         (2s, 4s, ... ≤ 30s, 8 polls)
//!                          ↓
//!               GET result/{id}/ → lists.linkDomains
//!                          ↓
//!               in-scope names → "new-name" (tag: api)
//! ```
//!
//! Every outbound query waits on the service's rate limiter (2s by
//! default) and is preceded by a "set-active" heartbeat.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::ReqwestWebClient;
pub use domain::UrlScanConfig;
pub use error::{FetchError, UrlScanError};
pub use ports::{MockWebClient, WebClient};
pub use service::{UrlScanService, SERVICE_NAME};
