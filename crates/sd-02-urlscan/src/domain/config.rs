//! URLScan configuration and endpoint construction

use crate::error::UrlScanError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public URLScan API root.
pub const DEFAULT_BASE_URL: &str = "https://urlscan.io/api/v1";

/// URLScan configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlScanConfig {
    /// API root, without a trailing slash
    pub base_url: String,
    /// API key; submissions are disabled without one
    pub api_key: Option<String>,
    /// Minimum interval between two queries
    pub rate_limit: Duration,
    /// First delay while waiting for a submitted scan
    pub poll_initial_delay: Duration,
    /// Ceiling for the poll delay
    pub poll_max_delay: Duration,
    /// Result polls before a submission is abandoned
    pub max_polls: u32,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// User agent sent with requests and submissions
    pub user_agent: String,
}

impl Default for UrlScanConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            rate_limit: Duration::from_secs(2),
            poll_initial_delay: Duration::from_secs(2),
            poll_max_delay: Duration::from_secs(30),
            max_polls: 8,
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("subscout/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl UrlScanConfig {
    /// Validate ranges
    pub fn validate(&self) -> Result<(), UrlScanError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(UrlScanError::InvalidBaseUrl(self.base_url.clone()));
        }

        if self.max_polls == 0 {
            return Err(UrlScanError::InvalidParameters(
                "max_polls cannot be 0".to_string(),
            ));
        }

        if self.poll_initial_delay > self.poll_max_delay {
            return Err(UrlScanError::InvalidParameters(
                "poll_initial_delay exceeds poll_max_delay".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder-style method to set the API root
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder-style method to set the API key; empty keys are ignored
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = (!key.trim().is_empty()).then_some(key);
        self
    }

    /// Builder-style method to set the query interval
    pub fn with_rate_limit(mut self, interval: Duration) -> Self {
        self.rate_limit = interval;
        self
    }

    /// Builder-style method to set the poll schedule
    pub fn with_polling(mut self, initial: Duration, max: Duration, polls: u32) -> Self {
        self.poll_initial_delay = initial;
        self.poll_max_delay = max;
        self.max_polls = polls;
        self
    }

    /// Whether submissions are possible.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search past scans of `domain`.
    pub fn search_url(&self, domain: &str) -> String {
        format!("{}/search/?q=domain:{}", self.base_url, domain)
    }

    /// Submit a new scan.
    pub fn submit_url(&self) -> String {
        format!("{}/scan/", self.base_url)
    }

    /// Full result of scan `id`.
    pub fn result_url(&self, id: &str) -> String {
        format!("{}/result/{}/", self.base_url, id)
    }

    /// Delay after the `attempt`-th unsuccessful poll (0-based).
    ///
    /// Doubles from `poll_initial_delay`, capped at `poll_max_delay`.
    pub fn poll_delay(&self, attempt: u32) -> Duration {
        self.poll_initial_delay
            .saturating_mul(1u32 << attempt.min(16))
            .min(self.poll_max_delay)
    }
}
