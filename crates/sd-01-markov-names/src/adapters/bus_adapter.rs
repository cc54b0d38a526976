//! Event Bus Adapter for the Markov generator
//!
//! Publishes generated candidates on the "new-name" topic.

use crate::ports::CandidateSink;
use shared_bus::{DiscoveryEvent, EventPublisher, Priority};
use shared_types::Request;
use std::sync::Arc;
use tracing::trace;

/// Candidate sink backed by the shared bus.
pub struct BusCandidateSink<P: EventPublisher + ?Sized> {
    bus: Arc<P>,
}

impl<P: EventPublisher + ?Sized> BusCandidateSink<P> {
    /// Create a sink publishing on `bus`.
    pub fn new(bus: Arc<P>) -> Self {
        Self { bus }
    }
}

impl<P: EventPublisher + ?Sized> CandidateSink for BusCandidateSink<P> {
    fn publish_candidate(&self, req: Request) {
        trace!(name = %req.name, "Publishing generated name");
        self.bus.publish(Priority::Normal, DiscoveryEvent::NewName(req));
    }
}
