//! Benchmarks for jux-reactive
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jux_reactive::animation::{Duration, KeyFrame, KeyValue, Timeline, VirtualFrameScheduler};
use jux_reactive::collections::{self, observable_array_list};
use jux_reactive::constants::INDEFINITE;
use jux_reactive::{Binding, DoubleProperty, IntegerProperty, bindings};
use std::rc::Rc;

// =============================================================================
// PROPERTY BENCHMARKS
// =============================================================================

fn bench_property_create(c: &mut Criterion) {
    c.bench_function("property_create", |b| {
        b.iter(|| black_box(IntegerProperty::new(0)))
    });
}

fn bench_property_get(c: &mut Criterion) {
    let p = IntegerProperty::new(42);
    c.bench_function("property_get", |b| b.iter(|| black_box(p.get())));
}

fn bench_property_set(c: &mut Criterion) {
    let p = IntegerProperty::new(0);
    let mut n = 0;
    c.bench_function("property_set", |b| {
        b.iter(|| {
            n += 1;
            p.set(black_box(n))
        })
    });
}

// =============================================================================
// BINDING BENCHMARKS
// =============================================================================

fn bench_binding_get_cached(c: &mut Criterion) {
    let a = IntegerProperty::new(1);
    let b = IntegerProperty::new(2);
    let sum = bindings::add(&a, &b);
    sum.int_value();
    c.bench_function("binding_get_cached", |bench| {
        bench.iter(|| black_box(sum.int_value()))
    });
}

fn bench_binding_get_invalidated(c: &mut Criterion) {
    let a = IntegerProperty::new(1);
    let b = IntegerProperty::new(2);
    let sum = bindings::add(&a, &b);
    let mut n = 0;
    c.bench_function("binding_get_invalidated", |bench| {
        bench.iter(|| {
            n += 1;
            a.set(n);
            black_box(sum.int_value())
        })
    });
}

fn bench_binding_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("binding_chain");

    for depth in [1, 10, 100] {
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, &depth| {
            let source = IntegerProperty::new(0);
            let mut tip: Binding<i32> = source.map(|v| v + 1);
            for _ in 1..depth {
                tip = tip.map(|v| v + 1);
            }
            let mut n = 0;
            b.iter(|| {
                n += 1;
                source.set(n);
                black_box(tip.get())
            });
        });
    }

    group.finish();
}

// =============================================================================
// COLLECTION BENCHMARKS
// =============================================================================

fn bench_list_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_sort");

    for len in [100, 10_000] {
        group.bench_with_input(BenchmarkId::new("len", len), &len, |b, &len| {
            let list = observable_array_list((0..len).rev());
            list.on_change(|change| {
                black_box(change.len());
            });
            b.iter(|| {
                collections::shuffle(&list).ok();
                collections::sort(&list).ok();
            });
        });
    }

    group.finish();
}

// =============================================================================
// TIMELINE BENCHMARKS
// =============================================================================

fn bench_timeline_frame(c: &mut Criterion) {
    let clock = Rc::new(VirtualFrameScheduler::new());
    let properties: Vec<DoubleProperty> = (0..64).map(|_| DoubleProperty::new(0.0)).collect();
    let frame = properties
        .iter()
        .fold(KeyFrame::new(Duration::seconds(1.0)).unwrap(), |frame, p| {
            frame.with_value(KeyValue::new(p, 1.0))
        });
    let timeline = Timeline::with_scheduler([frame], clock.clone());
    timeline.set_cycle_count(INDEFINITE).ok();
    timeline.play();

    c.bench_function("timeline_frame_64_properties", |b| {
        b.iter(|| black_box(clock.tick()))
    });
}

criterion_group!(
    property_benches,
    bench_property_create,
    bench_property_get,
    bench_property_set,
);

criterion_group!(
    binding_benches,
    bench_binding_get_cached,
    bench_binding_get_invalidated,
    bench_binding_chain,
);

criterion_group!(collection_benches, bench_list_sort);

criterion_group!(animation_benches, bench_timeline_frame);

criterion_main!(property_benches, binding_benches, collection_benches, animation_benches);
