use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use crossbeam_utils::sync::WaitGroup;
use failure::ResultExt;
use worker_pool::{PoolErrorKind, Result, ThreadPool, WorkerPool};

const TASKS: usize = 1_000;

// rayon's pool behind the same trait so both run the same workload
struct RayonPool(rayon::ThreadPool);

impl ThreadPool for RayonPool {
    fn new(capacity: i32) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(capacity.max(1) as usize)
            .build()
            .context(PoolErrorKind::ThreadSpawn)?;
        Ok(Self(pool))
    }

    fn spawn<F: FnOnce() + Send + 'static>(&self, f: F) {
        self.0.spawn(f);
    }
}

fn run_tasks<P: ThreadPool>(pool: &P) {
    let wg = WaitGroup::new();
    for i in 0..TASKS {
        let wg = wg.clone();
        pool.spawn(move || {
            black_box((0..64).fold(i, |acc, x| acc.wrapping_mul(31).wrapping_add(x)));
            drop(wg);
        });
    }
    wg.wait();
}

fn spawn_throughput(c: &mut Criterion) {
    let threads = [1, 2, 4, 8];
    let mut group = c.benchmark_group("spawn_throughput");

    for num_thread in threads.iter() {
        let pool = WorkerPool::new(*num_thread).unwrap();
        group.bench_with_input(
            BenchmarkId::new("worker_pool", num_thread),
            num_thread,
            |b, _| b.iter(|| run_tasks(&pool)),
        );

        let pool = RayonPool::new(*num_thread).unwrap();
        group.bench_with_input(
            BenchmarkId::new("rayon", num_thread),
            num_thread,
            |b, _| b.iter(|| run_tasks(&pool)),
        );
    }

    group.finish();
}

fn wait_barrier(c: &mut Criterion) {
    let pool = WorkerPool::new(4).unwrap();

    c.bench_function("submit_then_wait", |b| {
        b.iter(|| {
            for i in 0..TASKS {
                pool.submit(move || {
                    black_box(i);
                });
            }
            pool.wait();
        })
    });
}

criterion_group!(group, spawn_throughput, wait_barrier);
criterion_main!(group);
