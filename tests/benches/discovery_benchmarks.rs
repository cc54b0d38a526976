//! # Subscout Discovery Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | sd-01 Markov | training one resolved name |
//! | sd-01 Markov | frequency recomputation |
//! | sd-01 Markov | one generation burst |
//! | shared-types | scope matching |
//! | shared-bus | publish fan-out |

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;

use sd_01_markov_names::{CollectingSink, MarkovConfig, MarkovEngine, NgramModel};
use shared_bus::{DiscoveryEvent, EventPublisher, EventTopic, HandlerError, InMemoryEventBus, Priority};
use shared_types::{DomainScope, RecordType, Request, Tag};

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789-";

fn random_label<R: Rng>(rng: &mut R) -> String {
    let len = rng.gen_range(2..16);
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len() - 1)] as char)
        .collect()
}

fn resolved_names(count: usize) -> Vec<Request> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..count)
        .map(|i| {
            let name = format!("{}{}.example.com", random_label(&mut rng), i);
            Request::new(name, "example.com")
                .with_tag(Tag::Resolved)
                .with_records(vec![RecordType::A])
        })
        .collect()
}

fn engine(config: MarkovConfig) -> MarkovEngine {
    let scope = Arc::new(DomainScope::from_domains(["example.com"]).expect("scope"));
    MarkovEngine::new("Bench", config, scope, Arc::new(CollectingSink::new()))
}

// ============================================================================
// SD-01: Markov Model
// ============================================================================

fn bench_markov_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("sd-01-markov/train");
    group.measurement_time(Duration::from_secs(10));

    for size in [100usize, 1_000] {
        let names = resolved_names(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("train_names", size), &names, |b, names| {
            b.iter(|| {
                let engine = engine(MarkovConfig::default().with_recompute_every(u64::MAX));
                for req in names {
                    black_box(engine.train_model(req));
                }
            })
        });
    }

    group.finish();
}

fn bench_frequency_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("sd-01-markov/recompute");

    let mut model = NgramModel::new();
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..5_000 {
        let label = random_label(&mut rng);
        let chars: Vec<char> = label.chars().collect();
        for window in chars.windows(4) {
            let ngram: String = window[..3].iter().collect();
            model.observe(&ngram, window[3]);
        }
    }

    group.bench_function("recompute_5000_labels", |b| {
        b.iter(|| model.recompute_frequencies())
    });

    group.finish();
}

fn bench_generation_burst(c: &mut Criterion) {
    let mut group = c.benchmark_group("sd-01-markov/generate");
    group.measurement_time(Duration::from_secs(10));

    let names = resolved_names(500);
    for burst in [100usize, 1_000] {
        group.throughput(Throughput::Elements(burst as u64));
        group.bench_function(BenchmarkId::new("burst", burst), |b| {
            b.iter_batched(
                || {
                    let engine = engine(
                        MarkovConfig::default()
                            .with_num_names(burst)
                            .with_recompute_every(u64::MAX),
                    );
                    for req in &names {
                        engine.train_model(req);
                    }
                    engine.recompute_frequencies();
                    engine
                },
                |engine| {
                    let mut rng = StdRng::seed_from_u64(3);
                    black_box(engine.generate_names(&mut rng))
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

// ============================================================================
// SHARED-TYPES: Scope
// ============================================================================

fn bench_scope_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared-types/scope");

    let domains: Vec<String> = (0..50).map(|i| format!("target{i}.com")).collect();
    let scope = DomainScope::from_domains(&domains).expect("scope");

    group.bench_function("which_domain_hit", |b| {
        b.iter(|| black_box(scope.which_domain(black_box("a.b.c.target42.com"))))
    });
    group.bench_function("which_domain_miss", |b| {
        b.iter(|| black_box(scope.which_domain(black_box("a.b.c.unrelated.org"))))
    });

    group.finish();
}

// ============================================================================
// SHARED-BUS: Publish
// ============================================================================

fn bench_bus_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared-bus/publish");
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");

    for subscribers in [1usize, 8] {
        let bus = InMemoryEventBus::new();
        runtime.block_on(async {
            for _ in 0..subscribers {
                bus.subscribe(
                    EventTopic::NewName,
                    |e: DiscoveryEvent| -> Result<(), HandlerError> {
                        black_box(e);
                        Ok(())
                    },
                )
                .expect("subscribe");
            }
        });

        let event = DiscoveryEvent::NewName(Request::new("www.example.com", "example.com"));
        group.bench_with_input(
            BenchmarkId::new("fan_out", subscribers),
            &event,
            |b, event| b.iter(|| black_box(bus.publish(Priority::Normal, event.clone()))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_markov_training,
    bench_frequency_recompute,
    bench_generation_burst,
    bench_scope_matching,
    bench_bus_publish,
);

criterion_main!(benches);
