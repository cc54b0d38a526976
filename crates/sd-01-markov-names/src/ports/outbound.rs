//! Outbound Ports (Driven Ports)
//!
//! What the generator needs from the outside world: somewhere to send the
//! candidate names it produces.

use parking_lot::Mutex;
use shared_types::Request;

/// Destination for generated candidate names (Driven Port)
///
/// Called from blocking generation threads; implementations must not block.
pub trait CandidateSink: Send + Sync {
    /// Emit one candidate. Fire and forget.
    fn publish_candidate(&self, req: Request);
}

/// Sink that keeps every candidate in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    published: Mutex<Vec<Request>>,
}

impl CollectingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidates received so far.
    #[must_use]
    pub fn published(&self) -> Vec<Request> {
        self.published.lock().clone()
    }

    /// Number of candidates received so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.published.lock().len()
    }

    /// Whether nothing was received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.published.lock().is_empty()
    }
}

impl CandidateSink for CollectingSink {
    fn publish_candidate(&self, req: Request) {
        self.published.lock().push(req);
    }
}
