//! Criterion benchmarks for the fidi-core hot path
//!
//! Run with: cargo bench -p fidi-core
#![allow(missing_docs)]

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fidi_core::{
    Coefficients, Compressor, CompressorParams, EngineConfig, EnvelopeDomain, GainComputer,
    GainReductionMeter, KneeCurve, ParamStore,
};

const SAMPLE_RATE: f64 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.8
        })
        .collect()
}

fn bench_gain_computer(c: &mut Criterion) {
    let mut group = c.benchmark_group("GainComputer");
    let input = generate_test_signal(1024);
    let coeffs = Coefficients::new(SAMPLE_RATE);
    let params = CompressorParams::default();

    let configs = [
        ("db_per_sample", EngineConfig::default()),
        (
            "linear_per_sample",
            EngineConfig::default().with_envelope_domain(EnvelopeDomain::Linear),
        ),
        ("db_batched_32", EngineConfig::default().with_smoothing_interval(32)),
        (
            "quadratic_blend",
            EngineConfig::default().with_knee_curve(KneeCurve::QuadraticBlend),
        ),
    ];

    for (name, config) in configs {
        group.bench_function(name, |b| {
            let mut engine = GainComputer::new(config);
            engine.update(&coeffs, &params);
            engine.reset();
            b.iter(|| {
                for &sample in &input {
                    black_box(engine.compute_gain_reduction(black_box(sample.abs())));
                }
            });
        });
    }

    group.finish();
}

fn bench_compressor_stereo(c: &mut Criterion) {
    let mut group = c.benchmark_group("Compressor");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process_stereo_in_place", block_size),
            &block_size,
            |b, _| {
                let params = Arc::new(ParamStore::new());
                let meter = Arc::new(GainReductionMeter::new());
                let mut comp = Compressor::new(params, Arc::clone(&meter), EngineConfig::default());
                comp.prepare(SAMPLE_RATE);
                let mut left = input.clone();
                let mut right = input.clone();
                b.iter(|| {
                    left.copy_from_slice(&input);
                    right.copy_from_slice(&input);
                    black_box(comp.process_stereo_in_place(&mut left, &mut right));
                    black_box(meter.take());
                });
            },
        );
    }

    group.finish();
}

fn bench_coefficients(c: &mut Criterion) {
    let coeffs = Coefficients::new(SAMPLE_RATE);
    let params = CompressorParams::default();
    c.bench_function("Coefficients/derive", |b| {
        b.iter(|| black_box(coeffs.derive(black_box(&params))));
    });
}

criterion_group!(
    benches,
    bench_gain_computer,
    bench_compressor_stereo,
    bench_coefficients
);
criterion_main!(benches);
