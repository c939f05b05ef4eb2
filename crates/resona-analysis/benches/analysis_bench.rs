//! Criterion benchmarks for resona-analysis components
//!
//! Run with: cargo bench -p resona-analysis

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use resona_analysis::{
    Collaborators, ResonanceEngine, SpectralTransformer, find_peaks, locate_fundamental,
    match_harmonics,
};
use resona_config::{EngineConfig, HarmonicConfig};
use resona_core::TransformDomain;
use std::f64::consts::PI;

const SAMPLE_RATE: f64 = 44100.0;

/// Generate a signal with a 440 Hz fundamental and three partials
fn generate_harmonic_signal(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            let f1 = (2.0 * PI * 440.0 * t).sin();
            let f2 = 0.8 * (2.0 * PI * 880.0 * t).sin();
            let f3 = 0.7 * (2.0 * PI * 1320.0 * t).sin();
            let f4 = 0.6 * (2.0 * PI * 1760.0 * t).sin();
            (f1 + f2 + f3 + f4) * 0.25
        })
        .collect()
}

// ============================================================================
// Transform benchmarks
// ============================================================================

fn bench_transform_domains(c: &mut Criterion) {
    let mut group = c.benchmark_group("Transform");
    let transformer = SpectralTransformer::new(4096, SAMPLE_RATE);
    let collaborators = Collaborators::default();
    let signal = generate_harmonic_signal(4096);
    let mut rng = StdRng::seed_from_u64(0);

    for domain in TransformDomain::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(domain), &signal, |b, signal| {
            b.iter(|| {
                black_box(transformer.transform(
                    black_box(signal),
                    domain,
                    &collaborators,
                    &mut rng,
                ))
            });
        });
    }

    group.finish();
}

// ============================================================================
// Pipeline stage benchmarks
// ============================================================================

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("Stages");
    let transformer = SpectralTransformer::new(4096, SAMPLE_RATE);
    let mut rng = StdRng::seed_from_u64(0);
    let spectrum = transformer.transform(
        &generate_harmonic_signal(4096),
        TransformDomain::Frequency,
        &Collaborators::default(),
        &mut rng,
    );
    let harmonics = HarmonicConfig::default();

    group.bench_function("find_peaks", |b| {
        b.iter(|| black_box(find_peaks(black_box(&spectrum), 0.5, 10)));
    });

    group.bench_function("locate_fundamental", |b| {
        b.iter(|| black_box(locate_fundamental(black_box(&spectrum))));
    });

    group.bench_function("match_harmonics", |b| {
        b.iter(|| black_box(match_harmonics(black_box(&spectrum), 440.0, &harmonics)));
    });

    group.finish();
}

// ============================================================================
// End-to-end benchmarks
// ============================================================================

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("Analyze");

    for size in [1024, 4096, 16384] {
        let config = EngineConfig::default()
            .with_transform_size(size)
            .with_seed(1)
            .with_history_limit(1);
        let signal = generate_harmonic_signal(size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &signal, |b, signal| {
            let Ok(mut engine) = ResonanceEngine::new(config.clone()) else {
                return;
            };
            b.iter(|| black_box(engine.analyze(black_box(signal), TransformDomain::Frequency, false)));
        });
    }

    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let Ok(mut engine) = ResonanceEngine::new(EngineConfig::default().with_seed(1)) else {
        return;
    };
    let Ok(result) = engine.analyze(
        &generate_harmonic_signal(4096),
        TransformDomain::Frequency,
        false,
    ) else {
        return;
    };

    c.bench_function("compute_metrics_cached", |b| {
        b.iter(|| black_box(engine.compute_metrics(black_box(&result), None)));
    });
}

criterion_group!(
    benches,
    bench_transform_domains,
    bench_stages,
    bench_analyze,
    bench_metrics,
);
criterion_main!(benches);
