//! # Runtime Configuration
//!
//! Unified configuration for the discovery services and the runtime itself.
//!
//! ## Environment
//!
//! | Variable | Effect |
//! |---|---|
//! | `SCOUT_URLSCAN_API_KEY` | enables URLScan submissions |
//! | `SCOUT_URLSCAN_BASE_URL` | overrides the URLScan API root |
//! | `SCOUT_URLSCAN_ENABLED` | `false` disables the URLScan service |
//! | `SCOUT_MARKOV_NGRAM_SIZE` | Markov context width |
//! | `SCOUT_MARKOV_NUM_NAMES` | guesses per burst |
//! | `SCOUT_MARKOV_RECOMPUTE_EVERY` | trained labels between bursts |
//! | `SCOUT_ALTERATIONS` | `false` disables Markov training |
//! | `SCOUT_LINGER_SECS` | wait after stdin closes |

use sd_01_markov_names::{MarkovConfig, MarkovError};
use sd_02_urlscan::{UrlScanConfig, UrlScanError};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Default wait between stdin EOF and shutdown.
pub const DEFAULT_LINGER: Duration = Duration::from_secs(10);

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Target domains. Discoveries outside them are never reported.
    pub domains: Vec<String>,
    /// Markov generator configuration.
    pub markov: MarkovConfig,
    /// URLScan configuration.
    pub urlscan: UrlScanConfig,
    /// Whether the URLScan service runs at all.
    pub urlscan_enabled: bool,
    /// How long to keep running after stdin closes.
    pub linger: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            markov: MarkovConfig::default(),
            urlscan: UrlScanConfig::default(),
            urlscan_enabled: true,
            linger: DEFAULT_LINGER,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No target domain given.
    #[error("At least one target domain is required")]
    NoDomains,

    /// Invalid Markov settings.
    #[error("Markov configuration: {0}")]
    Markov(#[from] MarkovError),

    /// Invalid URLScan settings.
    #[error("URLScan configuration: {0}")]
    UrlScan(#[from] UrlScanError),
}

impl RuntimeConfig {
    /// Load overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load overrides through `lookup`, starting from the defaults.
    ///
    /// Unparseable values are reported and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(key) = lookup("SCOUT_URLSCAN_API_KEY") {
            config.urlscan = config.urlscan.with_api_key(key);
        }
        if let Some(url) = lookup("SCOUT_URLSCAN_BASE_URL") {
            config.urlscan = config.urlscan.with_base_url(url);
        }
        if let Some(enabled) = parse_var(&lookup, "SCOUT_URLSCAN_ENABLED") {
            config.urlscan_enabled = enabled;
        }

        if let Some(size) = parse_var(&lookup, "SCOUT_MARKOV_NGRAM_SIZE") {
            config.markov = config.markov.with_ngram_size(size);
        }
        if let Some(num) = parse_var(&lookup, "SCOUT_MARKOV_NUM_NAMES") {
            config.markov = config.markov.with_num_names(num);
        }
        if let Some(every) = parse_var(&lookup, "SCOUT_MARKOV_RECOMPUTE_EVERY") {
            config.markov = config.markov.with_recompute_every(every);
        }
        if let Some(enabled) = parse_var(&lookup, "SCOUT_ALTERATIONS") {
            config.markov = config.markov.with_alterations(enabled);
        }

        if let Some(secs) = parse_var(&lookup, "SCOUT_LINGER_SECS") {
            config.linger = Duration::from_secs(secs);
        }

        config
    }

    /// Validate the configuration before any service is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domains.is_empty() {
            return Err(ConfigError::NoDomains);
        }
        self.markov.validate()?;
        if self.urlscan_enabled {
            self.urlscan.validate()?;
        }
        Ok(())
    }

    /// Builder-style method to add target domains.
    pub fn with_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains.extend(domains.into_iter().map(Into::into));
        self
    }

    /// Builder-style method to set the Markov configuration.
    pub fn with_markov(mut self, markov: MarkovConfig) -> Self {
        self.markov = markov;
        self
    }

    /// Builder-style method to set the URLScan configuration.
    pub fn with_urlscan(mut self, urlscan: UrlScanConfig) -> Self {
        self.urlscan = urlscan;
        self
    }

    /// Builder-style method to enable or disable URLScan.
    pub fn with_urlscan_enabled(mut self, enabled: bool) -> Self {
        self.urlscan_enabled = enabled;
        self
    }

    /// Builder-style method to set the linger period.
    pub fn with_linger(mut self, linger: Duration) -> Self {
        self.linger = linger;
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable environment variable");
            None
        }
    }
}
