//! Markov training and generation engine
//!
//! Owns the n-gram model, the suffix registry and both dedup filters.
//! Training is called once per resolved name; generation bursts run on
//! blocking threads and may overlap.

use crate::domain::{
    clean_name, generate_label, split_name, training_ngrams, MarkovConfig, NgramModel,
    SuffixRegistry,
};
use crate::ports::CandidateSink;
use parking_lot::Mutex;
use rand::Rng;
use shared_types::{DomainScope, RecordType, Request, StringFilter, Tag};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

/// Record types that mark a resolved name as worth learning from.
pub const TRAINABLE_RECORDS: [RecordType; 4] = [
    RecordType::TXT,
    RecordType::A,
    RecordType::AAAA,
    RecordType::CNAME,
];

/// Why a resolved name was not trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// None of the observed records is trainable.
    RecordTypes,
    /// Already trained on.
    Duplicate,
    /// Not under any in-scope domain.
    OutOfScope,
    /// No label/suffix split.
    NoSuffix,
}

/// Result of [`MarkovEngine::train_model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainOutcome {
    /// The name was ignored.
    Skipped(SkipReason),
    /// The model learned the label. `burst_due` is set when frequencies were
    /// just recomputed and a generation burst should follow.
    Trained { burst_due: bool },
}

/// Training and generation over one shared model.
pub struct MarkovEngine {
    source: String,
    config: MarkovConfig,
    model: Mutex<NgramModel>,
    registry: SuffixRegistry,
    in_filter: StringFilter,
    out_filter: StringFilter,
    scope: Arc<DomainScope>,
    sink: Arc<dyn CandidateSink>,
}

impl MarkovEngine {
    /// Create an engine publishing as `source`.
    pub fn new(
        source: impl Into<String>,
        config: MarkovConfig,
        scope: Arc<DomainScope>,
        sink: Arc<dyn CandidateSink>,
    ) -> Self {
        Self {
            source: source.into(),
            config,
            model: Mutex::new(NgramModel::new()),
            registry: SuffixRegistry::new(),
            in_filter: StringFilter::new(),
            out_filter: StringFilter::new(),
            scope,
            sink,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &MarkovConfig {
        &self.config
    }

    /// Learn from one resolved name.
    pub fn train_model(&self, req: &Request) -> TrainOutcome {
        if !req.has_any_record(&TRAINABLE_RECORDS) {
            return TrainOutcome::Skipped(SkipReason::RecordTypes);
        }
        if self.in_filter.duplicate(&req.name) {
            return TrainOutcome::Skipped(SkipReason::Duplicate);
        }
        if !self.scope.is_domain_in_scope(&req.name) {
            return TrainOutcome::Skipped(SkipReason::OutOfScope);
        }
        let Some((label, suffix)) = split_name(&req.name) else {
            return TrainOutcome::Skipped(SkipReason::NoSuffix);
        };

        // A resolved name is never worth guessing again.
        self.out_filter.duplicate(&req.name);

        for (ngram, next) in training_ngrams(label, self.config.ngram_size) {
            self.model.lock().observe(&ngram, next);
        }

        if self.registry.insert_if_absent(suffix, &req.domain) {
            debug!(suffix, domain = %req.domain, "New suffix registered");
        }

        let total = self.model.lock().record_label();
        trace!(name = %req.name, total, "Trained on resolved name");

        if total % self.config.recompute_every == 0 {
            self.recompute_frequencies();
            return TrainOutcome::Trained { burst_due: true };
        }
        TrainOutcome::Trained { burst_due: false }
    }

    /// Recompute every frequency from the current counts.
    pub fn recompute_frequencies(&self) {
        let mut model = self.model.lock();
        model.recompute_frequencies();
        debug!(
            contexts = model.len(),
            labels = model.total_labels(),
            "Recomputed n-gram frequencies"
        );
    }

    /// Run one generation burst on a blocking thread.
    ///
    /// `None` outside a tokio runtime.
    pub fn spawn_generation(self: &Arc<Self>) -> Option<JoinHandle<usize>> {
        let runtime = tokio::runtime::Handle::try_current().ok()?;
        let engine = self.clone();
        Some(runtime.spawn_blocking(move || engine.generate_names(&mut rand::thread_rng())))
    }

    /// Generate `num_names` labels and offer each under every known suffix.
    ///
    /// Returns the number of names published.
    pub fn generate_names<R: Rng>(&self, rng: &mut R) -> usize {
        let mut published = 0;

        for _ in 0..self.config.num_names {
            let Some(label) = self.generate_label(rng) else {
                debug!("Model produced no usable label, ending burst");
                break;
            };
            for (suffix, domain) in self.registry.snapshot() {
                if self.send_generated_name(&format!("{label}.{suffix}"), &domain) {
                    published += 1;
                }
            }
        }

        info!(published, source = %self.source, "Generation burst finished");
        published
    }

    /// Draw one label from the model.
    pub fn generate_label<R: Rng>(&self, rng: &mut R) -> Option<String> {
        generate_label(
            self.config.ngram_size,
            self.config.max_label_len,
            self.config.max_label_attempts,
            |ngram| {
                let r: f64 = rng.gen();
                self.model.lock().generate_char(ngram, r)
            },
        )
    }

    /// Publish `name` unless it was already emitted or falls outside the
    /// pattern of `domain`. Returns whether it was published.
    pub fn send_generated_name(&self, name: &str, domain: &str) -> bool {
        let name = clean_name(name);
        if name.is_empty() || self.out_filter.duplicate(name) {
            return false;
        }

        match self.scope.domain_regex(domain) {
            Some(pattern) if pattern.is_match(name) => {}
            _ => return false,
        }

        self.sink.publish_candidate(
            Request::new(name, domain)
                .with_tag(Tag::Altered)
                .with_source(self.source.as_str()),
        );
        true
    }

    /// Labels trained so far.
    pub fn total_labels(&self) -> u64 {
        self.model.lock().total_labels()
    }

    /// Known suffixes.
    pub fn known_suffixes(&self) -> usize {
        self.registry.len()
    }

    /// Run `f` against the model under its lock.
    pub fn with_model<T>(&self, f: impl FnOnce(&NgramModel) -> T) -> T {
        f(&self.model.lock())
    }
}

impl std::fmt::Debug for MarkovEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkovEngine")
            .field("source", &self.source)
            .field("config", &self.config)
            .field("known_suffixes", &self.registry.len())
            .finish_non_exhaustive()
    }
}
