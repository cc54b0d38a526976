//! Known suffixes that generated labels are attached to

use parking_lot::Mutex;
use shared_types::Request;
use std::collections::HashMap;

/// Suffix → request that first introduced it.
///
/// Entries are inserted once and never replaced or removed.
#[derive(Debug, Default)]
pub struct SuffixRegistry {
    subs: Mutex<HashMap<String, Request>>,
}

impl SuffixRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `suffix` as owned by `domain` unless it is already known.
    ///
    /// Returns whether the suffix was new.
    pub fn insert_if_absent(&self, suffix: &str, domain: &str) -> bool {
        let mut subs = self.subs.lock();
        if subs.contains_key(suffix) {
            return false;
        }
        subs.insert(suffix.to_string(), Request::new(suffix, domain));
        true
    }

    /// The request registered for `suffix`.
    #[must_use]
    pub fn get(&self, suffix: &str) -> Option<Request> {
        self.subs.lock().get(suffix).cloned()
    }

    /// `(suffix, domain)` pairs as of now.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.subs
            .lock()
            .values()
            .map(|req| (req.name.clone(), req.domain.clone()))
            .collect()
    }

    /// Number of known suffixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subs.lock().len()
    }

    /// Whether no suffix is known yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subs.lock().is_empty()
    }
}
