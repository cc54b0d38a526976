//! # Shared Bus - Event Bus for Inter-Service Communication
//!
//! Decouples discovery producers from consumers. Services never call each
//! other; they publish `DiscoveryEvent`s on topics and subscribe handlers.
//!
//! ## Delivery Rules
//!
//! - Publishing never blocks on subscribers (unbounded per-subscriber queues)
//! - Every subscriber gets every event published on its topic after it
//!   subscribed; nothing is dropped
//! - Per subscriber, events of the same topic and priority arrive in publish
//!   order; higher priorities are dispatched first when a subscriber is
//!   backlogged
//! - A failing or panicking handler is logged and isolated
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │   Service A  │                    │   Service B  │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe(topic, handler)
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{DiscoveryEvent, EventTopic, Priority};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventHandler, HandlerError, Subscription, SubscriptionError};
