//! Benchmarks for the easing solver and per-frame evaluation
//!
//! Run with: cargo bench -p kinetic_animation --bench easing

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kinetic_animation::{
    bezier, AnimationScheduler, AnimeParams, Easing, ElementTarget, ManualFrames, Target,
};
use std::hint::black_box;
use std::sync::Arc;

fn bench_bezier_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("bezier_ease");

    for easing in [Easing::EaseInQuad, Easing::EaseInOutCubic, Easing::EaseOutBack] {
        let curve = easing.resolve().expect("preset curves are valid");
        group.bench_with_input(BenchmarkId::from_parameter(easing), &curve, |b, curve| {
            b.iter(|| {
                let mut sum = 0.0;
                for i in 0..=100 {
                    sum += curve.apply(black_box(f64::from(i) / 100.0), 0.5);
                }
                sum
            });
        });
    }

    group.finish();
}

fn bench_bezier_construction(c: &mut Criterion) {
    c.bench_function("bezier_new", |b| {
        b.iter(|| bezier(black_box(0.68), black_box(-0.55), black_box(0.265), black_box(1.55)))
    });
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    for count in [10usize, 100, 1000] {
        let scheduler = AnimationScheduler::new();
        scheduler.set_frame_source(Arc::new(ManualFrames::new()));
        let handle = scheduler.handle();

        let targets: Vec<Target> = (0..count)
            .map(|_| Arc::new(ElementTarget::new().with_style("opacity", "0")) as Target)
            .collect();
        let _anime = handle.animate(
            AnimeParams::new()
                .targets(targets)
                .property("opacity", 1)
                .property("translateX", "250px")
                .property("rotate", "1turn")
                .duration(1_000_000.0)
                .loop_infinite(),
        );

        let mut now = 0.0;
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                now += 16.0;
                handle.step(black_box(now))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_bezier_solver,
    bench_bezier_construction,
    bench_frame
);
criterion_main!(benches);
