//! # Domain Scope
//!
//! Compiled matchers deciding which names a run may report.

use regex::Regex;

/// One in-scope registrable domain and its subdomain pattern.
#[derive(Debug, Clone)]
struct ScopedDomain {
    domain: String,
    pattern: Regex,
}

/// The set of domains a run is permitted to report discoveries for.
#[derive(Debug, Clone, Default)]
pub struct DomainScope {
    domains: Vec<ScopedDomain>,
}

impl DomainScope {
    /// Create an empty scope. Nothing is in scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scope from registrable domains.
    pub fn from_domains<I, S>(domains: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scope = Self::new();
        for domain in domains {
            scope.add_domain(domain.as_ref())?;
        }
        Ok(scope)
    }

    /// Add a registrable domain. Adding the same domain twice is a no-op.
    pub fn add_domain(&mut self, domain: &str) -> Result<(), regex::Error> {
        let domain = normalize(domain);
        if domain.is_empty() || self.domains.iter().any(|d| d.domain == domain) {
            return Ok(());
        }

        let pattern = Regex::new(&format!(
            r"(?i)^(?:[a-z0-9_*-]+\.)*{}$",
            regex::escape(&domain)
        ))?;
        self.domains.push(ScopedDomain { domain, pattern });
        Ok(())
    }

    /// All registrable domains in scope.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(|d| d.domain.as_str())
    }

    /// The in-scope domain owning `name`, if any.
    pub fn which_domain(&self, name: &str) -> Option<&str> {
        let name = normalize(name);
        self.domains
            .iter()
            .filter(|d| name == d.domain || name.ends_with(&format!(".{}", d.domain)))
            .max_by_key(|d| d.domain.len())
            .map(|d| d.domain.as_str())
    }

    /// Whether `name` belongs to any in-scope domain.
    pub fn is_domain_in_scope(&self, name: &str) -> bool {
        self.which_domain(name).is_some()
    }

    /// The subdomain pattern for an in-scope domain.
    pub fn domain_regex(&self, domain: &str) -> Option<&Regex> {
        let domain = normalize(domain);
        self.domains
            .iter()
            .find(|d| d.domain == domain)
            .map(|d| &d.pattern)
    }
}

fn normalize(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}
