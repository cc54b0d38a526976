//! # Service Trait - Uniform Discovery Service Contract
//!
//! Defines the contract that ALL discovery services implement, whether they
//! query a third-party source or synthesize names locally.
//!
//! ## State Machine
//!
//! ```text
//!            start()            pause()
//! Created ───────────→ Running ─────────→ Paused
//!                        │  ↑   resume()    │
//!                        │  └───────────────┘
//!                 stop() │                  │ stop()
//!                        ↓                  ↓
//!                      Stopped ←────────────┘   (terminal)
//! ```
//!
//! ## Example Implementation
//!
//! ```rust,ignore
//! use shared_types::{Request, Service, ServiceError, ServiceState};
//!
//! pub struct MyService { base: BaseService }
//!
//! impl Service for MyService {
//!     fn name(&self) -> &str { self.base.name() }
//!     fn start(&self) -> Result<(), ServiceError> { self.base.start(self.handler()) }
//!     fn pause(&self) { self.base.pause() }
//!     fn resume(&self) { self.base.resume() }
//!     fn stop(&self) { self.base.stop() }
//!     fn send_request(&self, req: Request) { self.base.send_request(req) }
//!     fn state(&self) -> ServiceState { self.base.state() }
//! }
//! ```

use crate::entities::Request;
use crate::errors::ServiceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Lifecycle state of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceState {
    /// Constructed, not yet started.
    Created,
    /// Worker loop is dequeuing requests.
    Running,
    /// Worker loop is blocked until resumed; queued requests are kept.
    Paused,
    /// Terminal. The worker loop has been told to quit.
    Stopped,
}

impl ServiceState {
    /// Whether `self → next` is a legal transition.
    #[must_use]
    pub fn can_transition_to(self, next: ServiceState) -> bool {
        use ServiceState::*;
        matches!(
            (self, next),
            (Created, Running)
                | (Running, Paused)
                | (Paused, Running)
                | (Created, Stopped)
                | (Running, Stopped)
                | (Paused, Stopped)
        )
    }

    /// Whether the service has been stopped.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == ServiceState::Stopped
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Metadata about a service for wiring and monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Human-readable name, also used as the `source` of published requests.
    pub name: String,
    /// Source category (e.g. "api", "alt").
    pub source_type: String,
    /// Topics this service publishes.
    pub publishes: Vec<String>,
    /// Topics this service subscribes to.
    pub subscribes: Vec<String>,
}

impl ServiceInfo {
    /// Create a new service info with required fields.
    pub fn new(name: impl Into<String>, source_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_type: source_type.into(),
            publishes: Vec::new(),
            subscribes: Vec::new(),
        }
    }

    /// Set topics this service publishes.
    pub fn publishes_topics(mut self, topics: Vec<&str>) -> Self {
        self.publishes = topics.into_iter().map(String::from).collect();
        self
    }

    /// Set topics this service subscribes to.
    pub fn subscribes_to(mut self, topics: Vec<&str>) -> Self {
        self.subscribes = topics.into_iter().map(String::from).collect();
        self
    }
}

/// The core trait that ALL discovery services implement.
pub trait Service: Send + Sync {
    /// Get the human-readable name.
    fn name(&self) -> &str;

    /// Get detailed information about this service.
    fn info(&self) -> ServiceInfo {
        ServiceInfo::new(self.name(), "other")
    }

    /// Set up and start the worker loop.
    ///
    /// Idempotent while running or paused. Returns an error only on
    /// unrecoverable misconfiguration, or when the service was stopped.
    fn start(&self) -> Result<(), ServiceError>;

    /// Stop dequeuing requests until [`Service::resume`] is called.
    fn pause(&self);

    /// Continue dequeuing after a pause.
    fn resume(&self);

    /// Terminate the worker loop. Irreversible.
    fn stop(&self);

    /// Enqueue a unit of work. Never blocks.
    fn send_request(&self, req: Request);

    /// Current lifecycle state.
    fn state(&self) -> ServiceState;
}

/// A type-erased, shareable service handle.
pub type DynService = Arc<dyn Service>;
