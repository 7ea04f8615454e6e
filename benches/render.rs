//! Latency of the pieces the greedy decoder runs once per stroke.
//!
//! 1. Rasterizing a program onto the canvas
//! 2. Stacking (canvas, target) pairs into a network input
//! 3. One forward pass of the recognition network
//! 4. Decoding a full three-stroke target

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use recognizer::data::batch::BatchIterator;
use recognizer::inference::{decode_target, DecodeConfig};
use recognizer::model::input::stack_pairs;
use recognizer::model::RecognitionModelConfig;
use recognizer::render::RasterRenderer;
use recognizer::{Program, Stroke};

use burn::backend::NdArray;

type B = NdArray;

fn sample_program() -> Program {
    Program::new(vec![
        Stroke::circle(2, 3, 1),
        Stroke::circle(7, 6, 1),
        Stroke::line(0, 9, 9, 0),
    ])
}

fn bench_render(c: &mut Criterion) {
    let program = sample_program();
    let mut group = c.benchmark_group("render");
    for size in [100, 300] {
        let renderer = RasterRenderer::new(size);
        group.bench_function(format!("{}px", size), |b| {
            b.iter(|| renderer.render_program(black_box(&program)))
        });
    }
    group.finish();
}

fn bench_batches(c: &mut Criterion) {
    let mut batches = BatchIterator::new(3000, 50, 42, true);
    c.bench_function("next_indices_3000x50", |b| {
        b.iter(|| batches.next_indices())
    });
}

fn bench_input(c: &mut Criterion) {
    let device = Default::default();
    let config = RecognitionModelConfig::new();
    let renderer = RasterRenderer::default();
    let target = renderer.render_program(&sample_program());
    let canvas = renderer.render_program(&sample_program().prefix(1));
    let pairs: Vec<_> = (0..50).map(|_| (&canvas, &target)).collect();

    c.bench_function("stack_pairs_50", |b| {
        b.iter(|| stack_pairs::<B>(black_box(&pairs), &config, &device))
    });
}

fn bench_forward(c: &mut Criterion) {
    let device = Default::default();
    let config = RecognitionModelConfig::new();
    let model = config.init::<B>(&device);
    let renderer = RasterRenderer::default();
    let target = renderer.render_program(&sample_program());
    let canvas = renderer.render_program(&Program::default());
    let input = stack_pairs::<B>(&[(&canvas, &target)], &config, &device)
        .expect("canvas and target share the configured size");

    c.bench_function("forward_single_300px", |b| {
        b.iter(|| model.forward(black_box(input.clone())))
    });
}

fn bench_decode(c: &mut Criterion) {
    let device = Default::default();
    let config = RecognitionModelConfig::new();
    let model = config.init::<B>(&device);
    let mut renderer = RasterRenderer::default();
    let target = renderer.render_program(&sample_program());
    let decode = DecodeConfig::default();

    c.bench_function("decode_three_strokes", |b| {
        b.iter(|| {
            decode_target(
                &model,
                &config,
                black_box(&target),
                &mut renderer,
                &decode,
                None,
                "bench",
                &device,
            )
        })
    });
}

criterion_group!(
    benches,
    bench_render,
    bench_batches,
    bench_input,
    bench_forward,
    bench_decode
);
criterion_main!(benches);
