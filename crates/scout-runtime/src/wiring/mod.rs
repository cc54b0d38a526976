//! # Runtime Wiring
//!
//! Connects the service container to the outside world.
//!
//! ```text
//! stdin ──► name-resolved ──► Markov ──┐
//!                                      ├──► new-name ──► stdout
//! --domain ──► URLScan lookups ────────┘
//!
//! every service ──► log ──► tracing
//! ```

pub mod input;
pub mod output;

pub use input::{parse_resolved_line, read_resolved, INPUT_SOURCE};
pub use output::write_names;

use crate::container::{ContainerError, RuntimeConfig, ServiceContainer};
use sd_02_urlscan::WebClient;
use shared_bus::{DiscoveryEvent, EventPublisher, EventTopic, HandlerError, Priority};
use shared_types::{Request, Service};
use std::sync::Arc;
use tokio::io::AsyncBufRead;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

/// Source recorded on the lookup requests the runtime sends.
pub const RUNTIME_SOURCE: &str = "Runtime";

/// The runtime driving all discovery services.
pub struct ScoutRuntime {
    /// Bus and services.
    container: Arc<ServiceContainer>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
}

impl ScoutRuntime {
    /// Create a runtime querying URLScan over HTTP.
    pub fn new(config: RuntimeConfig) -> Result<Self, ContainerError> {
        Ok(Self::from_container(ServiceContainer::new(config)?))
    }

    /// Create a runtime querying URLScan through `client`.
    pub fn with_web_client(
        config: RuntimeConfig,
        client: Arc<dyn WebClient>,
    ) -> Result<Self, ContainerError> {
        Ok(Self::from_container(ServiceContainer::with_web_client(
            config, client,
        )?))
    }

    /// Wrap an already built container.
    pub fn from_container(container: ServiceContainer) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            container: Arc::new(container),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Start the runtime.
    ///
    /// ## Startup Sequence
    ///
    /// 1. Subscribe the new-name output and the log forwarder
    /// 2. Start every service
    /// 3. Send one lookup per target domain to URLScan
    ///
    /// Returns the stream of discovered names. Must be called from within a
    /// tokio runtime.
    pub fn start(&self) -> Result<mpsc::UnboundedReceiver<Request>, ContainerError> {
        let bus = &self.container.bus;

        let (names_tx, names_rx) = mpsc::unbounded_channel();
        bus.subscribe(
            EventTopic::NewName,
            move |event: DiscoveryEvent| -> Result<(), HandlerError> {
                if let DiscoveryEvent::NewName(req) = event {
                    names_tx
                        .send(req)
                        .map_err(|_| HandlerError::Rejected("output closed".to_string()))?;
                }
                Ok(())
            },
        )?;

        bus.subscribe(
            EventTopic::Log,
            |event: DiscoveryEvent| -> Result<(), HandlerError> {
                if let DiscoveryEvent::Log { source, message } = event {
                    info!(source = %source, "{message}");
                }
                Ok(())
            },
        )?;

        for service in self.container.services() {
            service.start()?;
            info!(service = service.name(), "Service started");
        }

        if let Some(urlscan) = &self.container.urlscan {
            for domain in self.container.scope.domains() {
                urlscan.send_request(Request::new(domain, domain).with_source(RUNTIME_SOURCE));
            }
        }

        info!(domains = ?self.container.config.domains, "Subscout runtime started");
        Ok(names_rx)
    }

    /// Publish a resolved name on "name-resolved".
    ///
    /// Returns the number of subscribers it was delivered to.
    pub fn publish_resolved(&self, req: Request) -> usize {
        self.container
            .bus
            .publish(Priority::Normal, DiscoveryEvent::NameResolved(req))
    }

    /// Publish every resolved name read from `reader` until it is exhausted.
    pub async fn feed_resolved<R>(&self, reader: R) -> std::io::Result<usize>
    where
        R: AsyncBufRead + Unpin,
    {
        read_resolved(reader, &self.container.scope, |req| {
            self.publish_resolved(req);
        })
        .await
    }

    /// Receiver that flips to `true` once shutdown starts.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Stop every service and signal shutdown.
    pub fn shutdown(&self) {
        info!("Initiating shutdown...");

        for service in self.container.services() {
            service.stop();
        }

        if let Err(e) = self.shutdown_tx.send(true) {
            warn!("No shutdown listeners: {}", e);
        }

        info!("Shutdown complete");
    }

    /// Get a reference to the service container.
    pub fn container(&self) -> Arc<ServiceContainer> {
        Arc::clone(&self.container)
    }
}
