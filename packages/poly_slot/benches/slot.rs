//! Basic benchmarks for the `poly_slot` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::any::Any;
use std::hint::black_box;
use std::iter;
use std::time::Instant;

use alloc_tracker::Allocator;
use criterion::{Criterion, criterion_group, criterion_main};
use poly_slot::PolySlot;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

type TestItem = u64;
const TEST_VALUE: TestItem = 1024;

type LargeItem = [u64; 64];
const LARGE_VALUE: LargeItem = [1024; 64];

fn entrypoint(c: &mut Criterion) {
    let allocs = alloc_tracker::Session::new();

    let mut group = c.benchmark_group("slot_basic");

    let allocs_op = allocs.operation("place_inline");
    group.bench_function("place_inline", |b| {
        b.iter_custom(|iters| {
            let mut slots = iter::repeat_with(PolySlot::<dyn Any>::empty)
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for slot in &mut slots {
                _ = black_box(slot.place(black_box(TEST_VALUE)));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("place_spilled");
    group.bench_function("place_spilled", |b| {
        b.iter_custom(|iters| {
            let mut slots = iter::repeat_with(PolySlot::<dyn Any>::empty)
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for slot in &mut slots {
                _ = black_box(slot.place(black_box(LARGE_VALUE)));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("read_inline");
    group.bench_function("read_inline", |b| {
        b.iter_custom(|iters| {
            let slot: PolySlot<dyn Any> = PolySlot::holding(TEST_VALUE);

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                _ = black_box(slot.value::<TestItem>());
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("read_spilled");
    group.bench_function("read_spilled", |b| {
        b.iter_custom(|iters| {
            let slot: PolySlot<dyn Any> = PolySlot::holding(LARGE_VALUE);

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                _ = black_box(slot.value::<LargeItem>());
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("clone_inline");
    group.bench_function("clone_inline", |b| {
        b.iter_custom(|iters| {
            let slot: PolySlot<dyn Any> = PolySlot::holding(TEST_VALUE);

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(slot.clone()));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("clone_spilled");
    group.bench_function("clone_spilled", |b| {
        b.iter_custom(|iters| {
            let slot: PolySlot<dyn Any> = PolySlot::holding(LARGE_VALUE);

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(slot.clone()));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("take_inline");
    group.bench_function("take_inline", |b| {
        b.iter_custom(|iters| {
            let mut slots = iter::repeat_with(|| PolySlot::<dyn Any>::holding(TEST_VALUE))
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for slot in &mut slots {
                _ = black_box(slot.take());
            }

            start.elapsed()
        });
    });

    group.finish();

    allocs.print_to_stdout();
}
