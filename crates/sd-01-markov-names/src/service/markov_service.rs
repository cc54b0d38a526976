//! Markov name-guessing service
//!
//! Trains on every resolved name published on "name-resolved" and, every
//! `recompute_every` trained labels, publishes a burst of guesses on
//! "new-name".

use super::engine::{MarkovEngine, TrainOutcome};
use crate::adapters::BusCandidateSink;
use crate::domain::MarkovConfig;
use crate::ports::CandidateSink;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_bus::{EventTopic, InMemoryEventBus, Subscription};
use shared_service::{BaseService, RequestHandler};
use shared_types::{DomainScope, Request, Service, ServiceError, ServiceInfo, ServiceState};
use std::sync::Arc;
use tracing::trace;

/// Name this service publishes under.
pub const SERVICE_NAME: &str = "Markov Model";

/// Trains on each dequeued request and triggers bursts.
struct TrainingHandler {
    engine: Arc<MarkovEngine>,
}

#[async_trait]
impl RequestHandler for TrainingHandler {
    async fn handle_request(&self, req: Request) {
        match self.engine.train_model(&req) {
            TrainOutcome::Trained { burst_due: true } => {
                self.engine.spawn_generation();
            }
            TrainOutcome::Trained { burst_due: false } => {}
            TrainOutcome::Skipped(reason) => {
                trace!(name = %req.name, ?reason, "Resolved name not trained");
            }
        }
    }
}

/// The Markov service.
pub struct MarkovService {
    base: BaseService,
    engine: Arc<MarkovEngine>,
    subscription: Mutex<Option<Subscription>>,
}

impl MarkovService {
    /// Create a service that publishes guesses on `bus`.
    pub fn new(config: MarkovConfig, scope: Arc<DomainScope>, bus: Arc<InMemoryEventBus>) -> Self {
        let sink = Arc::new(BusCandidateSink::new(bus.clone()));
        Self::with_sink(config, scope, bus, sink)
    }

    /// Create a service that sends guesses to a custom sink.
    pub fn with_sink(
        config: MarkovConfig,
        scope: Arc<DomainScope>,
        bus: Arc<InMemoryEventBus>,
        sink: Arc<dyn CandidateSink>,
    ) -> Self {
        Self {
            base: BaseService::new(SERVICE_NAME, bus),
            engine: Arc::new(MarkovEngine::new(SERVICE_NAME, config, scope, sink)),
            subscription: Mutex::new(None),
        }
    }

    /// Get the engine.
    pub fn engine(&self) -> &Arc<MarkovEngine> {
        &self.engine
    }

    /// The "name-resolved" subscription, once started.
    pub fn subscription(&self) -> Option<Subscription> {
        self.subscription.lock().clone()
    }
}

impl Service for MarkovService {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn info(&self) -> ServiceInfo {
        ServiceInfo::new(self.name(), "alt")
            .publishes_topics(vec![EventTopic::NewName.as_str()])
            .subscribes_to(vec![EventTopic::NameResolved.as_str()])
    }

    fn start(&self) -> Result<(), ServiceError> {
        self.engine
            .config()
            .validate()
            .map_err(|e| e.into_service_error(self.name()))?;

        self.base.start(Arc::new(TrainingHandler {
            engine: self.engine.clone(),
        }))?;

        if self.engine.config().alterations {
            let mut subscription = self.subscription.lock();
            if subscription.is_none() {
                let sub = self
                    .base
                    .forward_topic(EventTopic::NameResolved)
                    .map_err(|e| ServiceError::config(self.name(), e.to_string()))?;
                *subscription = Some(sub);
            }
        }
        Ok(())
    }

    fn pause(&self) {
        self.base.pause();
    }

    fn resume(&self) {
        self.base.resume();
    }

    fn stop(&self) {
        self.base.stop();
    }

    fn send_request(&self, req: Request) {
        self.base.send_request(req);
    }

    fn state(&self) -> ServiceState {
        self.base.state()
    }
}
