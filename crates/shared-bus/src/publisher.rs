//! # Event Publisher
//!
//! Defines the publishing side of the event bus.

use crate::events::{DiscoveryEvent, EventTopic, Priority};
use crate::subscriber::{spawn_subscriber, EventHandler, SubscriberQueues, Subscription, SubscriptionError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Trait for publishing events to the bus.
///
/// This is the interface services use to emit events for consumption by
/// other services.
pub trait EventPublisher: Send + Sync {
    /// Publish an event on its topic.
    ///
    /// Never blocks and never waits for handlers.
    ///
    /// # Returns
    ///
    /// The number of subscribers the event was queued for.
    fn publish(&self, priority: Priority, event: DiscoveryEvent) -> usize;

    /// Get the total number of events published.
    fn events_published(&self) -> u64;
}

/// In-memory implementation of the event bus.
///
/// Each subscriber has its own unbounded queues, so a slow subscriber grows
/// its backlog instead of losing events or slowing the publisher.
pub struct InMemoryEventBus {
    /// Live subscribers by topic.
    subscribers: RwLock<HashMap<EventTopic, Vec<SubscriberQueues>>>,

    /// Next subscription id.
    next_id: AtomicU64,

    /// Total events published.
    events_published: AtomicU64,
}

impl InMemoryEventBus {
    /// Create a new, empty event bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            events_published: AtomicU64::new(0),
        }
    }

    /// Create a new event bus behind an `Arc`.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register `handler` for every future publish on `topic`.
    ///
    /// Must be called from within a tokio runtime; the handler runs on its
    /// own dispatcher task.
    pub fn subscribe<H>(&self, topic: EventTopic, handler: H) -> Result<Subscription, SubscriptionError>
    where
        H: EventHandler + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (queues, subscription) = spawn_subscriber(id, topic, Arc::new(handler))?;

        self.subscribers.write().entry(topic).or_default().push(queues);

        debug!(topic = %topic, subscription = id, "New subscription created");
        Ok(subscription)
    }

    /// Get the number of live subscribers on a topic.
    #[must_use]
    pub fn subscriber_count(&self, topic: EventTopic) -> usize {
        self.subscribers.read().get(&topic).map_or(0, Vec::len)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for InMemoryEventBus {
    fn publish(&self, priority: Priority, event: DiscoveryEvent) -> usize {
        let topic = event.topic();

        // Always increment counter (event was attempted)
        self.events_published.fetch_add(1, Ordering::Relaxed);

        let mut delivered = 0;
        let mut dead = Vec::new();
        {
            let subscribers = self.subscribers.read();
            if let Some(queues) = subscribers.get(&topic) {
                for q in queues {
                    if q.push(priority, event.clone()) {
                        delivered += 1;
                    } else {
                        dead.push(q.id);
                    }
                }
            }
        }

        // Dispatchers only disappear when their runtime shuts down.
        if !dead.is_empty() {
            if let Some(queues) = self.subscribers.write().get_mut(&topic) {
                queues.retain(|q| !dead.contains(&q.id));
            }
            debug!(topic = %topic, removed = dead.len(), "Pruned closed subscriptions");
        }

        trace!(
            topic = %topic,
            priority = ?priority,
            source = event.source(),
            receivers = delivered,
            "Event published"
        );
        delivered
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
