//! Character n-gram transition model
//!
//! Maps a fixed-width context (the characters preceding a position) to the
//! observed next characters, with raw counts and normalized frequencies.
//!
//! Contexts near the start of a label are left-padded with [`SENTINEL`];
//! the end of a label is recorded as a transition to [`TERMINATOR`].

use std::collections::{BTreeMap, HashMap};

/// Padding character for contexts that start before the label.
pub const SENTINEL: char = '`';

/// Transition marking the end of a label.
pub const TERMINATOR: char = '.';

/// Observation statistics for one `(context, next char)` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transition {
    /// Times the character followed the context. Only increases.
    pub count: u64,
    /// `count` over the context total, as of the last recomputation.
    pub freq: f64,
}

/// The n-gram model.
///
/// Next characters are kept in a `BTreeMap` so weighted draws walk them in
/// ascending order, which makes a draw a pure function of `(context, r)`.
#[derive(Debug, Default)]
pub struct NgramModel {
    ngrams: HashMap<String, BTreeMap<char, Transition>>,
    total_labels: u64,
}

impl NgramModel {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `next` after `ngram`.
    pub fn observe(&mut self, ngram: &str, next: char) {
        self.ngrams
            .entry(ngram.to_string())
            .or_default()
            .entry(next)
            .or_default()
            .count += 1;
    }

    /// Count one more trained label and return the new total.
    pub fn record_label(&mut self) -> u64 {
        self.total_labels += 1;
        self.total_labels
    }

    /// Labels trained so far.
    #[must_use]
    pub fn total_labels(&self) -> u64 {
        self.total_labels
    }

    /// Number of distinct contexts observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ngrams.len()
    }

    /// Whether nothing has been observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ngrams.is_empty()
    }

    /// Observed transitions out of `ngram`.
    #[must_use]
    pub fn transitions(&self, ngram: &str) -> Option<&BTreeMap<char, Transition>> {
        self.ngrams.get(ngram)
    }

    /// All observed contexts.
    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.ngrams.keys().map(String::as_str)
    }

    /// Recompute every frequency from the counts.
    ///
    /// Afterwards the frequencies out of each context sum to 1.
    pub fn recompute_frequencies(&mut self) {
        for chars in self.ngrams.values_mut() {
            let total: u64 = chars.values().map(|t| t.count).sum();
            if total == 0 {
                continue;
            }
            for transition in chars.values_mut() {
                transition.freq = transition.count as f64 / total as f64;
            }
        }
    }

    /// Weighted draw from the transitions out of exactly `ngram`.
    ///
    /// Walks the characters in ascending order and returns the first whose
    /// cumulative frequency reaches `r`. `None` when the context is unknown
    /// or has no frequencies yet.
    #[must_use]
    pub fn draw(&self, ngram: &str, r: f64) -> Option<char> {
        let chars = self.ngrams.get(ngram)?;

        let mut accum = 0.0;
        for (&ch, transition) in chars {
            if transition.freq <= 0.0 {
                continue;
            }
            accum += transition.freq;
            if accum >= r {
                return Some(ch);
            }
        }
        None
    }

    /// Next character after `ngram`, falling back to shorter contexts.
    ///
    /// The context loses its leftmost character until a draw succeeds. Past
    /// the empty context the label is terminated.
    #[must_use]
    pub fn generate_char(&self, ngram: &str, r: f64) -> char {
        let mut context = ngram;
        loop {
            if let Some(ch) = self.draw(context, r) {
                return ch;
            }
            let mut chars = context.chars();
            if chars.next().is_none() {
                return TERMINATOR;
            }
            context = chars.as_str();
        }
    }
}
