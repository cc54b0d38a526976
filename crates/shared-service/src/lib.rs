//! # Shared Service
//!
//! The capability set every discovery service is composed from:
//!
//! - **Lifecycle**: the `Created → Running ⇄ Paused → Stopped` machine
//! - **Request queue**: unbounded, fed by `send_request` or by bus topics
//! - **Worker loop**: exactly one per service, observing quit and pause
//! - **Rate limiter**: per-service minimum interval for outbound queries
//! - **Bus helpers**: heartbeat, log lines, and new-name publication
//!
//! A concrete service embeds a [`BaseService`] and supplies only a
//! [`RequestHandler`].
//!
//! ## Usage Example
//!
//! ```ignore
//! use shared_service::{BaseService, RequestHandler};
//!
//! let base = BaseService::new("URLScan", bus.clone());
//! base.set_rate_limit(Duration::from_secs(2));
//! base.start(Arc::new(MyHandler::new(...)))?;
//! base.send_request(Request::new("example.com", "example.com"));
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod base;
pub mod worker;

pub use base::{BaseService, RequestSender};
pub use worker::RequestHandler;
