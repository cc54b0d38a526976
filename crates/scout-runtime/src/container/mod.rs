//! # Service Container
//!
//! Owns the shared infrastructure (event bus, scope) and every discovery
//! service built on it.
//!
//! ## Construction Order
//!
//! 1. Validate configuration
//! 2. Compile the target scope
//! 3. Create the event bus
//! 4. Build the Markov service
//! 5. Build the URLScan service (unless disabled)

pub mod config;

pub use config::{ConfigError, RuntimeConfig, DEFAULT_LINGER};

use sd_01_markov_names::MarkovService;
use sd_02_urlscan::{FetchError, ReqwestWebClient, UrlScanService, WebClient};
use shared_bus::{InMemoryEventBus, SubscriptionError};
use shared_types::{DomainScope, DynService, ServiceError};
use std::sync::Arc;
use tracing::info;

/// Errors raised while building or driving the container.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// Configuration rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A target domain could not be turned into a scope pattern.
    #[error("Invalid target domain {domain}: {message}")]
    Scope {
        /// The offending domain.
        domain: String,
        /// Pattern compiler message.
        message: String,
    },

    /// HTTP client construction failed.
    #[error("HTTP client: {0}")]
    Client(#[from] FetchError),

    /// A service refused to start.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A bus subscription could not be created.
    #[error(transparent)]
    Subscription(#[from] SubscriptionError),
}

/// Container for the bus and all discovery services.
pub struct ServiceContainer {
    /// Runtime configuration.
    pub config: RuntimeConfig,
    /// Shared event bus.
    pub bus: Arc<InMemoryEventBus>,
    /// Target scope shared by every service.
    pub scope: Arc<DomainScope>,
    /// Markov name generator.
    pub markov: Arc<MarkovService>,
    /// URLScan source, when enabled.
    pub urlscan: Option<Arc<UrlScanService>>,
}

impl ServiceContainer {
    /// Build every service, querying URLScan over HTTP.
    pub fn new(config: RuntimeConfig) -> Result<Self, ContainerError> {
        let client = ReqwestWebClient::new(config.urlscan.request_timeout, &config.urlscan.user_agent)?;
        Self::with_web_client(config, Arc::new(client))
    }

    /// Build every service, querying URLScan through `client`.
    pub fn with_web_client(
        config: RuntimeConfig,
        client: Arc<dyn WebClient>,
    ) -> Result<Self, ContainerError> {
        config.validate()?;

        let scope = Arc::new(build_scope(&config.domains)?);
        let bus = InMemoryEventBus::shared();

        let markov = Arc::new(MarkovService::new(
            config.markov.clone(),
            scope.clone(),
            bus.clone(),
        ));

        let urlscan = config.urlscan_enabled.then(|| {
            Arc::new(UrlScanService::new(
                config.urlscan.clone(),
                scope.clone(),
                bus.clone(),
                client,
            ))
        });

        info!(
            domains = config.domains.len(),
            urlscan = config.urlscan_enabled,
            "Service container initialized"
        );

        Ok(Self {
            config,
            bus,
            scope,
            markov,
            urlscan,
        })
    }

    /// Every service, in start order.
    pub fn services(&self) -> Vec<DynService> {
        let mut services: Vec<DynService> = vec![self.markov.clone()];
        if let Some(urlscan) = &self.urlscan {
            services.push(urlscan.clone());
        }
        services
    }
}

fn build_scope(domains: &[String]) -> Result<DomainScope, ContainerError> {
    let mut scope = DomainScope::new();
    for domain in domains {
        scope.add_domain(domain).map_err(|e| ContainerError::Scope {
            domain: domain.clone(),
            message: e.to_string(),
        })?;
    }
    Ok(scope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sd_02_urlscan::MockWebClient;
    use shared_types::Service;

    fn config() -> RuntimeConfig {
        RuntimeConfig::default().with_domains(["Example.COM."])
    }

    #[test]
    fn test_container_builds_all_services() {
        let container =
            ServiceContainer::with_web_client(config(), Arc::new(MockWebClient::new())).unwrap();

        let names: Vec<String> = container
            .services()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["Markov Model", "URLScan"]);
        assert!(container.scope.is_domain_in_scope("www.example.com"));
    }

    #[test]
    fn test_urlscan_can_be_disabled() {
        let container = ServiceContainer::with_web_client(
            config().with_urlscan_enabled(false),
            Arc::new(MockWebClient::new()),
        )
        .unwrap();
        assert!(container.urlscan.is_none());
        assert_eq!(container.services().len(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = ServiceContainer::with_web_client(
            RuntimeConfig::default(),
            Arc::new(MockWebClient::new()),
        );
        assert!(matches!(
            result,
            Err(ContainerError::Config(ConfigError::NoDomains))
        ));
    }
}
