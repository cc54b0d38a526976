//! # String Filter
//!
//! Exact set-membership filter with test-and-set semantics.
//!
//! A service keeps one filter per direction (names coming in for processing,
//! names going out as discoveries). Filters are never cleared during a run.

use parking_lot::Mutex;
use std::collections::HashSet;

/// Thread-safe seen-set.
#[derive(Debug, Default)]
pub struct StringFilter {
    seen: Mutex<HashSet<String>>,
}

impl StringFilter {
    /// Create an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report whether `s` was already seen, inserting it if it was not.
    ///
    /// Exactly one of any number of concurrent callers passing the same
    /// string observes `false`.
    pub fn duplicate(&self, s: &str) -> bool {
        let mut seen = self.seen.lock();
        if seen.contains(s) {
            return true;
        }
        seen.insert(s.to_string());
        false
    }

    /// Number of distinct strings seen.
    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    /// Whether nothing has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }
}
