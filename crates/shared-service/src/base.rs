//! # Base Service
//!
//! Lifecycle, request queue, rate limiter and bus helpers shared by every
//! discovery service.

use crate::worker::{worker_loop, RequestHandler};
use parking_lot::Mutex;
use shared_bus::{
    DiscoveryEvent, EventPublisher, EventTopic, HandlerError, InMemoryEventBus, Priority,
    Subscription, SubscriptionError,
};
use shared_types::{RateLimiter, Request, ServiceError, ServiceState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace, warn};

/// Cloneable handle that enqueues requests on a service.
#[derive(Debug, Clone)]
pub struct RequestSender {
    name: Arc<str>,
    tx: mpsc::UnboundedSender<Request>,
}

impl RequestSender {
    /// Enqueue a request. Never blocks.
    ///
    /// Requests sent after the worker has exited are dropped.
    pub fn send(&self, req: Request) {
        if self.tx.send(req).is_err() {
            trace!(service = %self.name, "Request dropped, worker has exited");
        }
    }
}

/// The capability set a discovery service embeds.
pub struct BaseService {
    name: Arc<str>,
    /// Lifecycle state; the worker loop watches it for pause and quit.
    state: watch::Sender<ServiceState>,
    requests: RequestSender,
    /// Handed to the worker loop exactly once.
    pending_rx: Mutex<Option<mpsc::UnboundedReceiver<Request>>>,
    rate_limiter: RateLimiter,
    bus: Arc<InMemoryEventBus>,
}

impl BaseService {
    /// Create a service in the `Created` state with no rate limit.
    pub fn new(name: impl Into<String>, bus: Arc<InMemoryEventBus>) -> Self {
        Self::with_rate_limiter(name, bus, RateLimiter::new(Duration::ZERO))
    }

    /// Create a service with a preconfigured rate limiter.
    pub fn with_rate_limiter(
        name: impl Into<String>,
        bus: Arc<InMemoryEventBus>,
        rate_limiter: RateLimiter,
    ) -> Self {
        let name: Arc<str> = Arc::from(name.into());
        let (state, _) = watch::channel(ServiceState::Created);
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            requests: RequestSender {
                name: name.clone(),
                tx,
            },
            name,
            state,
            pending_rx: Mutex::new(Some(rx)),
            rate_limiter,
            bus,
        }
    }

    /// Get the service name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the current lifecycle state.
    pub fn state(&self) -> ServiceState {
        *self.state.borrow()
    }

    /// Get the bus this service publishes on.
    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    /// Start the worker loop with `handler` processing each request.
    ///
    /// Idempotent while running or paused. Fails once stopped, or when
    /// called outside a tokio runtime.
    pub fn start<H>(&self, handler: Arc<H>) -> Result<(), ServiceError>
    where
        H: RequestHandler + ?Sized,
    {
        let mut pending = self.pending_rx.lock();

        match self.state() {
            ServiceState::Stopped => {
                return Err(ServiceError::Stopped {
                    service: self.name.to_string(),
                })
            }
            ServiceState::Running | ServiceState::Paused => return Ok(()),
            ServiceState::Created => {}
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| ServiceError::config(self.name.as_ref(), "no async runtime available"))?;
        let rx = pending.take().ok_or_else(|| ServiceError::WorkerAlreadyStarted {
            service: self.name.to_string(),
        })?;

        self.transition(ServiceState::Running);
        runtime.spawn(worker_loop(
            self.name.to_string(),
            rx,
            self.state.subscribe(),
            handler,
        ));

        info!(service = %self.name, "Service started");
        Ok(())
    }

    /// Stop dequeuing until [`BaseService::resume`]. Queued requests are kept.
    pub fn pause(&self) {
        if self.transition(ServiceState::Paused) {
            debug!(service = %self.name, "Service paused");
        }
    }

    /// Continue dequeuing after a pause.
    pub fn resume(&self) {
        let resumed = self.state.send_if_modified(|state| {
            if *state == ServiceState::Paused {
                *state = ServiceState::Running;
                true
            } else {
                false
            }
        });
        if resumed {
            debug!(service = %self.name, "Service resumed");
        }
    }

    /// Terminate the worker loop. Irreversible.
    pub fn stop(&self) {
        if self.transition(ServiceState::Stopped) {
            info!(service = %self.name, "Service stopped");
        }
    }

    /// Enqueue a unit of work. Never blocks.
    pub fn send_request(&self, req: Request) {
        self.requests.send(req);
    }

    /// Get a cloneable handle onto the request queue.
    pub fn request_sender(&self) -> RequestSender {
        self.requests.clone()
    }

    /// Feed every request published on `topic` into this service's queue.
    pub fn forward_topic(&self, topic: EventTopic) -> Result<Subscription, SubscriptionError> {
        let requests = self.request_sender();
        self.bus
            .subscribe(topic, move |event: DiscoveryEvent| -> Result<(), HandlerError> {
                match event {
                    DiscoveryEvent::NameResolved(req) | DiscoveryEvent::NewName(req) => {
                        requests.send(req);
                        Ok(())
                    }
                    other => Err(HandlerError::Rejected(format!(
                        "no request carried on {}",
                        other.topic()
                    ))),
                }
            })
    }

    /// Get the rate limiter.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Replace the minimum interval between outbound queries.
    pub fn set_rate_limit(&self, min_interval: Duration) {
        self.rate_limiter.set_min_interval(min_interval);
    }

    /// Wait until the next outbound query is permitted.
    pub async fn check_rate_limit(&self) {
        self.rate_limiter.check_rate_limit().await;
    }

    /// Publish a liveness heartbeat.
    pub fn set_active(&self) {
        self.bus
            .publish(Priority::Critical, DiscoveryEvent::set_active(self.name.as_ref()));
    }

    /// Publish a human-readable status or error line.
    pub fn log(&self, message: impl Into<String>) {
        self.bus
            .publish(Priority::High, DiscoveryEvent::log(self.name.as_ref(), message));
    }

    /// Publish a discovered or synthesized candidate name.
    pub fn publish_new_name(&self, req: Request) {
        self.bus.publish(Priority::Normal, DiscoveryEvent::NewName(req));
    }

    /// Apply a legal state transition. Returns whether the state changed.
    fn transition(&self, next: ServiceState) -> bool {
        let mut illegal_from = None;
        let changed = self.state.send_if_modified(|state| {
            if *state == next {
                false
            } else if state.can_transition_to(next) {
                *state = next;
                true
            } else {
                illegal_from = Some(*state);
                false
            }
        });

        if let Some(from) = illegal_from {
            warn!(service = %self.name, from = %from, to = %next, "Illegal state transition ignored");
        }
        changed
    }
}

impl std::fmt::Debug for BaseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseService")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("rate_limiter", &self.rate_limiter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use tokio::time::timeout;

    struct Recorder {
        seen: mpsc::UnboundedSender<String>,
    }

    #[async_trait]
    impl RequestHandler for Recorder {
        async fn handle_request(&self, req: Request) {
            self.seen.send(req.name).ok();
        }
    }

    fn service() -> (BaseService, Arc<Recorder>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let base = BaseService::new("Test", InMemoryEventBus::shared());
        (base, Arc::new(Recorder { seen: tx }), rx)
    }

    async fn next(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
        timeout(Duration::from_millis(500), rx.recv())
            .await
            .expect("timeout")
            .expect("request")
    }

    #[tokio::test]
    async fn test_start_processes_requests() {
        let (base, handler, mut rx) = service();
        assert_eq!(base.state(), ServiceState::Created);

        base.start(handler).unwrap();
        assert_eq!(base.state(), ServiceState::Running);

        base.send_request(Request::new("www.example.com", "example.com"));
        assert_eq!(next(&mut rx).await, "www.example.com");
    }

    #[tokio::test]
    async fn test_requests_queued_before_start_are_kept() {
        let (base, handler, mut rx) = service();
        base.send_request(Request::new("early.example.com", "example.com"));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());

        base.start(handler).unwrap();
        assert_eq!(next(&mut rx).await, "early.example.com");
    }

    #[tokio::test]
    async fn test_pause_holds_queue_until_resume() {
        let (base, handler, mut rx) = service();
        base.start(handler).unwrap();
        base.pause();
        assert_eq!(base.state(), ServiceState::Paused);

        for name in ["a.example.com", "b.example.com", "c.example.com"] {
            base.send_request(Request::new(name, "example.com"));
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err(), "paused worker must not dequeue");

        base.resume();
        assert_eq!(base.state(), ServiceState::Running);

        let mut got = HashSet::new();
        for _ in 0..3 {
            got.insert(next(&mut rx).await);
        }
        assert_eq!(
            got,
            HashSet::from(["a.example.com", "b.example.com", "c.example.com"].map(String::from))
        );
    }

    #[tokio::test]
    async fn test_stop_is_terminal() {
        let (base, handler, mut rx) = service();
        base.start(handler.clone()).unwrap();
        base.stop();
        assert_eq!(base.state(), ServiceState::Stopped);

        tokio::time::sleep(Duration::from_millis(20)).await;
        base.send_request(Request::new("late.example.com", "example.com"));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());

        base.resume();
        assert_eq!(base.state(), ServiceState::Stopped);
        assert_eq!(
            base.start(handler).unwrap_err(),
            ServiceError::Stopped {
                service: "Test".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let (base, handler, mut rx) = service();
        base.start(handler.clone()).unwrap();
        base.start(handler.clone()).unwrap();
        base.pause();
        base.start(handler).unwrap();
        assert_eq!(base.state(), ServiceState::Paused);

        base.resume();
        base.send_request(Request::new("once.example.com", "example.com"));
        assert_eq!(next(&mut rx).await, "once.example.com");

        // A second worker would have produced a duplicate.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stop_before_start() {
        let (base, handler, _rx) = service();
        base.stop();
        assert_eq!(base.state(), ServiceState::Stopped);
        assert!(base.start(handler).is_err());
    }

    #[test]
    fn test_start_without_runtime() {
        let (base, handler, _rx) = service();
        let err = base.start(handler).unwrap_err();
        assert!(matches!(err, ServiceError::Config { .. }));
        assert_eq!(base.state(), ServiceState::Created);
    }

    #[tokio::test]
    async fn test_forward_topic_feeds_queue() {
        let (base, handler, mut rx) = service();
        base.start(handler).unwrap();
        base.forward_topic(EventTopic::NameResolved).unwrap();

        base.bus().publish(
            Priority::Normal,
            DiscoveryEvent::NameResolved(Request::new("mail.example.com", "example.com")),
        );
        assert_eq!(next(&mut rx).await, "mail.example.com");
    }

    #[tokio::test]
    async fn test_bus_helpers_publish_on_their_topics() {
        let (base, _handler, _rx) = service();
        let (tx, mut events) = mpsc::unbounded_channel();

        for topic in [EventTopic::SetActive, EventTopic::Log, EventTopic::NewName] {
            let tx = tx.clone();
            base.bus()
                .subscribe(topic, move |e: DiscoveryEvent| -> Result<(), HandlerError> {
                    tx.send(e).ok();
                    Ok(())
                })
                .unwrap();
        }

        base.set_active();
        base.log("Querying");
        base.publish_new_name(Request::new("x.example.com", "example.com").with_source("Test"));

        let mut topics = HashSet::new();
        for _ in 0..3 {
            let event = timeout(Duration::from_millis(500), events.recv())
                .await
                .expect("timeout")
                .expect("event");
            assert_eq!(event.source(), "Test");
            topics.insert(event.topic());
        }
        assert_eq!(topics.len(), 3);
    }
}
