//! Throughput benchmarks for pacer
//!
//! Measures operations per second for:
//! - Uncontended queue put/get
//! - Producer/consumer through a small bounded queue
//! - Throttle and debounce call overhead

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use pacer::{BoundedQueue, Debounce, ManualScheduler, Throttle};
use std::sync::Arc;
use std::time::Duration;

fn bench_queue_uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_uncontended");
    group.throughput(Throughput::Elements(1));

    group.bench_function("try_put_try_get", |b| {
        let queue = BoundedQueue::new(1024).unwrap();
        b.iter(|| {
            queue.try_put(black_box(42u64)).unwrap();
            black_box(queue.try_get().unwrap());
        });
    });

    group.bench_function("put_get_async", |b| {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let queue = BoundedQueue::new(1024).unwrap();

        b.to_async(&rt).iter(|| async {
            queue.put(black_box(42u64)).await.unwrap();
            black_box(queue.get().await.unwrap());
        });
    });

    group.finish();
}

fn bench_queue_producer_consumer(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_producer_consumer");

    for capacity in [1usize, 16, 256] {
        let items = 10_000u64;
        group.throughput(Throughput::Elements(items));
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, &capacity| {
            let rt = tokio::runtime::Runtime::new().unwrap();

            b.to_async(&rt).iter(|| async move {
                let queue = BoundedQueue::new(capacity).unwrap();
                let producer = queue.clone();
                let task = tokio::spawn(async move {
                    for i in 0..items {
                        producer.put(i).await.unwrap();
                    }
                });
                for _ in 0..items {
                    black_box(queue.get().await.unwrap());
                }
                task.await.unwrap();
            });
        });
    }

    group.finish();
}

fn bench_pacing_call_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("pacing_call");
    group.throughput(Throughput::Elements(1));

    group.bench_function("throttle_deferred", |b| {
        let scheduler = Arc::new(ManualScheduler::new());
        let throttle = Throttle::new(Duration::from_secs(3600), scheduler, |value: u64| {
            black_box(value);
        });
        throttle.call(0).unwrap();

        b.iter(|| throttle.call(black_box(1)).unwrap());
    });

    group.bench_function("debounce_reschedule", |b| {
        let scheduler = Arc::new(ManualScheduler::new());
        let debounce = Debounce::new(Duration::from_millis(10), scheduler.clone(), |value: u64| {
            black_box(value);
        });

        let mut calls = 0u64;
        b.iter(|| {
            debounce.call(black_box(calls)).unwrap();
            calls += 1;
            // Keep the cancelled timers from piling up
            if calls % 1024 == 0 {
                scheduler.advance(Duration::from_millis(10));
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_queue_uncontended,
    bench_queue_producer_consumer,
    bench_pacing_call_overhead
);
criterion_main!(benches);
