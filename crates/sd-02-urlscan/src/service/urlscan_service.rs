//! URLScan data source service
//!
//! For each lookup request: search past scans of the domain, or submit a
//! new scan when there are none, then collect the linked domains of every
//! scan and publish the in-scope ones as new names.

use crate::domain::{ResultResponse, SearchResponse, SubmitRequest, SubmitResponse, UrlScanConfig};
use crate::error::FetchError;
use crate::ports::WebClient;
use async_trait::async_trait;
use shared_bus::InMemoryEventBus;
use shared_service::{BaseService, RequestHandler};
use shared_types::{
    DomainScope, RateLimiter, Request, Service, ServiceError, ServiceInfo, ServiceState, Tag,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Name this service publishes under.
pub const SERVICE_NAME: &str = "URLScan";

/// Per-request processing, shared with the worker loop.
struct UrlScanHandler {
    base: Arc<BaseService>,
    config: UrlScanConfig,
    client: Arc<dyn WebClient>,
    scope: Arc<DomainScope>,
}

#[async_trait]
impl RequestHandler for UrlScanHandler {
    async fn handle_request(&self, req: Request) {
        self.on_dns_request(&req.domain).await;
    }
}

impl UrlScanHandler {
    async fn on_dns_request(&self, domain: &str) -> usize {
        let Some(pattern) = self.scope.domain_regex(domain) else {
            debug!(domain, "Domain not in scope, skipping");
            return 0;
        };

        self.base.check_rate_limit().await;
        self.base.set_active();
        self.base
            .log(format!("Querying {SERVICE_NAME} for {domain} subdomains"));

        let url = self.config.search_url(domain);
        let page = match self.client.get(&url).await {
            Ok(page) => page,
            Err(e) => {
                self.report(&url, &e);
                return 0;
            }
        };
        let search: SearchResponse = match serde_json::from_str(&page) {
            Ok(search) => search,
            Err(e) => {
                debug!(url = %url, error = %e, "Malformed search response");
                return 0;
            }
        };

        let ids: Vec<String> = if search.total > 0 {
            search.results.into_iter().map(|r| r.id).collect()
        } else {
            self.attempt_submission(domain).await.into_iter().collect()
        };

        let mut subs = BTreeSet::new();
        for id in &ids {
            subs.extend(self.subs_from_result(id).await);
        }

        let mut published = 0;
        for name in subs {
            if pattern.is_match(&name) {
                self.base.publish_new_name(
                    Request::new(name, domain)
                        .with_tag(Tag::Api)
                        .with_source(SERVICE_NAME),
                );
                published += 1;
            }
        }
        debug!(domain, scans = ids.len(), published, "URLScan lookup finished");
        published
    }

    async fn subs_from_result(&self, id: &str) -> Vec<String> {
        self.base.check_rate_limit().await;
        self.base.set_active();

        let url = self.config.result_url(id);
        let page = match self.client.get(&url).await {
            Ok(page) => page,
            Err(e) => {
                self.report(&url, &e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<ResultResponse>(&page) {
            Ok(result) => result.lists.link_domains,
            Err(e) => {
                debug!(url = %url, error = %e, "Malformed result response");
                Vec::new()
            }
        }
    }

    /// Submit a public scan of `domain` and wait for it to complete.
    ///
    /// Returns the scan id once its result is available.
    async fn attempt_submission(&self, domain: &str) -> Option<String> {
        let key = self.config.api_key.as_deref()?;

        self.base.check_rate_limit().await;
        self.base.set_active();

        let url = self.config.submit_url();
        let body = match serde_json::to_string(&SubmitRequest::public(domain, &self.config.user_agent)) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to encode submission");
                return None;
            }
        };
        let page = match self.client.post_json(&url, &body, &[("API-Key", key)]).await {
            Ok(page) => page,
            Err(e) => {
                self.report(&url, &e);
                return None;
            }
        };

        let submission: SubmitResponse = serde_json::from_str(&page).ok()?;
        if !submission.accepted() {
            debug!(domain, message = %submission.message, "Submission not accepted");
            return None;
        }

        for attempt in 0..self.config.max_polls {
            match self.client.get(&submission.api).await {
                Err(FetchError::NotFound { .. }) => {}
                _ => return Some(submission.id),
            }
            if attempt + 1 == self.config.max_polls {
                break;
            }

            tokio::time::sleep(self.config.poll_delay(attempt)).await;
            self.base.check_rate_limit().await;
            self.base.set_active();
        }

        self.base.log(format!(
            "{SERVICE_NAME}: scan of {domain} did not complete after {} polls",
            self.config.max_polls
        ));
        None
    }

    fn report(&self, url: &str, err: &FetchError) {
        warn!(url = %url, error = %err, "URLScan request failed");
        self.base.log(format!("{SERVICE_NAME}: {url}: {err}"));
    }
}

/// The URLScan service.
pub struct UrlScanService {
    base: Arc<BaseService>,
    handler: Arc<UrlScanHandler>,
}

impl UrlScanService {
    /// Create a service querying through `client`.
    pub fn new(
        config: UrlScanConfig,
        scope: Arc<DomainScope>,
        bus: Arc<InMemoryEventBus>,
        client: Arc<dyn WebClient>,
    ) -> Self {
        let base = Arc::new(BaseService::with_rate_limiter(
            SERVICE_NAME,
            bus,
            RateLimiter::new(config.rate_limit),
        ));
        let handler = Arc::new(UrlScanHandler {
            base: base.clone(),
            config,
            client,
            scope,
        });
        Self { base, handler }
    }

    /// Get the configuration.
    pub fn config(&self) -> &UrlScanConfig {
        &self.handler.config
    }

    /// Run one lookup for `domain` inline, bypassing the queue.
    ///
    /// Returns the number of names published.
    pub async fn query_domain(&self, domain: &str) -> usize {
        self.handler.on_dns_request(domain).await
    }
}

impl Service for UrlScanService {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn info(&self) -> ServiceInfo {
        ServiceInfo::new(self.name(), "api").publishes_topics(vec!["new-name", "set-active", "log"])
    }

    fn start(&self) -> Result<(), ServiceError> {
        let config = &self.handler.config;
        config
            .validate()
            .map_err(|e| ServiceError::config(self.name(), e.to_string()))?;

        let first_start = self.base.state() == ServiceState::Created;
        self.base.set_rate_limit(config.rate_limit);
        self.base.start(self.handler.clone())?;

        if first_start && !config.has_api_key() {
            self.base
                .log(format!("{SERVICE_NAME}: API key data was not provided"));
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
