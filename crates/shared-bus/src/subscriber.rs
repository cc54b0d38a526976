//! # Event Subscriber
//!
//! Defines the subscription side of the event bus.
//!
//! Every subscription owns one dispatcher task and three unbounded queues
//! (one per priority). The dispatcher invokes the handler sequentially, so a
//! handler sees its topic's events in publish order within a priority.

use crate::events::{DiscoveryEvent, EventTopic, Priority};
use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Subscribing requires a running tokio runtime for the dispatcher.
    #[error("No async runtime available for subscription to {topic}")]
    NoRuntime { topic: EventTopic },
}

/// Error a handler may return. Logged, never propagated.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler refused the event.
    #[error("Event rejected: {0}")]
    Rejected(String),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Callback invoked for every event published on a subscribed topic.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle one event.
    async fn handle(&self, event: DiscoveryEvent) -> Result<(), HandlerError>;
}

#[async_trait]
impl<F> EventHandler for F
where
    F: Fn(DiscoveryEvent) -> Result<(), HandlerError> + Send + Sync,
{
    async fn handle(&self, event: DiscoveryEvent) -> Result<(), HandlerError> {
        self(event)
    }
}

/// Counters shared between a subscription handle and its dispatcher.
#[derive(Debug, Default)]
pub(crate) struct SubscriptionStats {
    delivered: AtomicU64,
    failed: AtomicU64,
}

/// A subscription handle.
///
/// Delivery continues for the lifetime of the bus whether or not the handle
/// is kept; the handle only exposes delivery counters.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    topic: EventTopic,
    stats: Arc<SubscriptionStats>,
}

impl Subscription {
    /// Bus-unique subscription id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The subscribed topic.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        self.topic
    }

    /// Events handed to the handler so far (including failed ones).
    #[must_use]
    pub fn delivered(&self) -> u64 {
        self.stats.delivered.load(Ordering::Relaxed)
    }

    /// Events whose handler returned an error or panicked.
    #[must_use]
    pub fn failures(&self) -> u64 {
        self.stats.failed.load(Ordering::Relaxed)
    }
}

/// Publisher-side end of a subscription: one sender per priority.
pub(crate) struct SubscriberQueues {
    pub(crate) id: u64,
    senders: [mpsc::UnboundedSender<DiscoveryEvent>; 3],
}

impl SubscriberQueues {
    /// Enqueue without blocking. Returns `false` once the dispatcher is gone.
    pub(crate) fn push(&self, priority: Priority, event: DiscoveryEvent) -> bool {
        self.senders[priority.slot()].send(event).is_ok()
    }
}

/// Create the queues, spawn the dispatcher, and return both ends.
pub(crate) fn spawn_subscriber(
    id: u64,
    topic: EventTopic,
    handler: Arc<dyn EventHandler>,
) -> Result<(SubscriberQueues, Subscription), SubscriptionError> {
    let runtime =
        tokio::runtime::Handle::try_current().map_err(|_| SubscriptionError::NoRuntime { topic })?;

    let (critical_tx, critical_rx) = mpsc::unbounded_channel();
    let (high_tx, high_rx) = mpsc::unbounded_channel();
    let (normal_tx, normal_rx) = mpsc::unbounded_channel();
    let stats = Arc::new(SubscriptionStats::default());

    runtime.spawn(dispatch_loop(
        id,
        topic,
        handler,
        [critical_rx, high_rx, normal_rx],
        stats.clone(),
    ));

    let queues = SubscriberQueues {
        id,
        senders: [critical_tx, high_tx, normal_tx],
    };
    let subscription = Subscription { id, topic, stats };
    Ok((queues, subscription))
}

async fn dispatch_loop(
    id: u64,
    topic: EventTopic,
    handler: Arc<dyn EventHandler>,
    queues: [mpsc::UnboundedReceiver<DiscoveryEvent>; 3],
    stats: Arc<SubscriptionStats>,
) {
    let [mut critical, mut high, mut normal] = queues;

    loop {
        let event = tokio::select! {
            biased;
            Some(event) = critical.recv() => event,
            Some(event) = high.recv() => event,
            Some(event) = normal.recv() => event,
            else => break,
        };

        stats.delivered.fetch_add(1, Ordering::Relaxed);
        match AssertUnwindSafe(handler.handle(event)).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                warn!(subscription = id, topic = %topic, error = %e, "Handler failed");
            }
            Err(_) => {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                error!(subscription = id, topic = %topic, "Handler panicked");
            }
        }
    }

    debug!(subscription = id, topic = %topic, "Subscription closed");
}
