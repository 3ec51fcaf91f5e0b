use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use futures::stream::{FuturesUnordered, StreamExt};
use hashjob::{FIRST_JOB_ID, JobEntry, JobStore, digest};
use std::time::Instant;
use tokio::runtime::Builder;

const OPS_PER_ITER: u64 = 1_024;

fn bench_store(c: &mut Criterion) {
    let rt = Builder::new_multi_thread().enable_all().build().unwrap();

    for concurrency in [1_usize, 4, 16, 64] {
        let mut group = c.benchmark_group("store/allocate");
        group.throughput(Throughput::Elements(OPS_PER_ITER));
        group.bench_function(format!("conc/{concurrency}"), |b| {
            b.to_async(&rt).iter_custom(|iters| async move {
                let store = JobStore::spawn(FIRST_JOB_ID, 1024);
                let start = Instant::now();
                for _ in 0..iters {
                    let mut tasks = FuturesUnordered::new();
                    for _ in 0..concurrency {
                        let store = store.clone();
                        tasks.push(tokio::spawn(async move {
                            for _ in 0..OPS_PER_ITER / concurrency as u64 {
                                black_box(store.allocate().await.unwrap());
                            }
                        }));
                    }
                    while let Some(res) = tasks.next().await {
                        res.unwrap();
                    }
                }
                start.elapsed()
            });
        });
        group.finish();
    }

    let mut group = c.benchmark_group("store/record_lookup");
    group.throughput(Throughput::Elements(OPS_PER_ITER));
    group.bench_function("sequential", |b| {
        b.to_async(&rt).iter_custom(|iters| async move {
            let store = JobStore::spawn(FIRST_JOB_ID, 1024);
            let start = Instant::now();
            for _ in 0..iters {
                for _ in 0..OPS_PER_ITER {
                    let id = store.allocate().await.unwrap();
                    store
                        .record(JobEntry {
                            id,
                            digest: String::from("00"),
                            duration_micros: 1,
                        })
                        .await
                        .unwrap();
                    black_box(store.lookup(id).await.unwrap());
                }
            }
            start.elapsed()
        });
    });
    group.finish();
}

fn bench_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest");
    for len in [16_usize, 256, 4096] {
        let payload = vec![b'a'; len];
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_function(format!("sha512_hex/{len}"), |b| {
            b.iter(|| black_box(digest::compute(black_box(&payload))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_store, bench_digest);
criterion_main!(benches);
