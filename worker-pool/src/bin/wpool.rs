use clap::Parser;
use rand::Rng;
use std::num::NonZeroUsize;
use std::process::exit;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, Level};
use worker_pool::{PoolBuilder, WorkerPool};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Run a synthetic workload on a WorkerPool", long_about = None)]
struct Args {
    #[clap(long, allow_hyphen_values = true)]
    #[clap(help = "Number of workers, values below 1 become 1 [default: available parallelism]")]
    threads: Option<i32>,

    #[clap(long, default_value_t = 100)]
    #[clap(help = "Number of tasks to submit")]
    tasks: usize,

    #[clap(long, default_value_t = 10)]
    #[clap(help = "Upper bound of the sleep each task performs, in milliseconds")]
    max_sleep_ms: u64,

    #[clap(long)]
    #[clap(help = "Bound the task queue; submission blocks while it is full")]
    queue_capacity: Option<usize>,

    #[clap(long)]
    #[clap(help = "Make every n-th task panic")]
    panic_every: Option<NonZeroUsize>,

    #[clap(long)]
    #[clap(help = "Print the final pool statistics as JSON")]
    json: bool,

    #[clap(short, long)]
    #[clap(help = "Log pool internals")]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // set log collector
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    info!("Application Started: Version {}", env!("CARGO_PKG_VERSION"));

    let pool = match build_pool(&args) {
        Ok(pool) => pool,
        Err(error) => {
            eprintln!("{}", error);
            exit(1);
        }
    };

    run_workload(&pool, &args);
}

fn build_pool(args: &Args) -> worker_pool::Result<WorkerPool> {
    let mut builder = PoolBuilder::new();
    if let Some(threads) = args.threads {
        builder = builder.num_threads(threads);
    }
    if let Some(capacity) = args.queue_capacity {
        builder = builder.queue_capacity(capacity);
    }
    info!("Using {} workers", builder.config().effective_threads());
    builder.build()
}

fn sleep_for<R: Rng>(rng: &mut R, max_ms: u64) -> Duration {
    Duration::from_millis(rng.gen_range(0, max_ms.saturating_add(1)))
}

fn run_workload(pool: &WorkerPool, args: &Args) {
    let finished = Arc::new(AtomicUsize::new(0));
    let mut rng = rand::thread_rng();
    let start = Instant::now();

    for index in 0..args.tasks {
        let finished = Arc::clone(&finished);
        let nap = sleep_for(&mut rng, args.max_sleep_ms);
        let panics = args
            .panic_every
            .map_or(false, |every| (index + 1) % every.get() == 0);

        pool.submit(move || {
            thread::sleep(nap);
            if panics {
                panic!("task {} panicked on purpose", index);
            }
            finished.fetch_add(1, Ordering::SeqCst);
        });
    }

    pool.wait();
    let elapsed = start.elapsed();
    let stats = pool.stats();

    if args.json {
        match serde_json::to_string(&stats) {
            Ok(json) => println!("{}", json),
            Err(error) => {
                eprintln!("{}", error);
                exit(1);
            }
        }
    } else {
        println!(
            "{} tasks on {} workers in {:?}: {} returned, {} panicked",
            stats.completed,
            stats.threads,
            elapsed,
            finished.load(Ordering::SeqCst),
            stats.panicked
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleep_for_stays_within_bounds() {
        let mut rng = rand::thread_rng();
        assert_eq!(Duration::from_millis(0), sleep_for(&mut rng, 0));
        for _ in 0..100 {
            assert!(sleep_for(&mut rng, 10) <= Duration::from_millis(10));
        }
    }

    #[test]
    fn sleep_for_accepts_largest_bound() {
        let mut rng = rand::thread_rng();
        sleep_for(&mut rng, u64::MAX);
    }
}
