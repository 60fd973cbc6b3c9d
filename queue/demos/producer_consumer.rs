//! Runs a small producer/consumer workload against a `BoundedQueue` and prints
//! a summary. Set `RUST_LOG=fibre_queue=trace` to see every queue operation.
//!
//! cargo run -p fibre_queue --example producer_consumer

use fibre_queue::BoundedQueue;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const CAPACITY: usize = 8;
const PRODUCERS: usize = 4;
const CONSUMERS: usize = 2;
const RUN_FOR: Duration = Duration::from_millis(200);
const OP_TIMEOUT: Duration = Duration::from_millis(1);

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_thread_ids(true)
    .init();

  let queue = match BoundedQueue::new(CAPACITY) {
    Ok(queue) => queue,
    Err(e) => {
      tracing::error!("failed to create queue: {}", e);
      return;
    }
  };
  let inserted = AtomicUsize::new(0);
  let removed = AtomicUsize::new(0);
  let timeouts = AtomicUsize::new(0);
  let start = Instant::now();

  thread::scope(|s| {
    for p in 0..PRODUCERS {
      let (queue, inserted, timeouts) = (&queue, &inserted, &timeouts);
      s.spawn(move || {
        let mut next = p;
        while start.elapsed() < RUN_FOR {
          match queue.enqueue_timeout(next, OP_TIMEOUT) {
            Ok(()) => {
              inserted.fetch_add(1, Ordering::Relaxed);
              next += PRODUCERS;
            }
            Err(_) => {
              timeouts.fetch_add(1, Ordering::Relaxed);
            }
          }
        }
      });
    }
    for _ in 0..CONSUMERS {
      s.spawn(|| {
        while start.elapsed() < RUN_FOR {
          if queue.dequeue_timeout(OP_TIMEOUT).is_some() {
            removed.fetch_add(1, Ordering::Relaxed);
          }
        }
      });
    }
  });

  tracing::info!(
    producers = PRODUCERS,
    consumers = CONSUMERS,
    inserted = inserted.load(Ordering::Relaxed),
    removed = removed.load(Ordering::Relaxed),
    enqueue_timeouts = timeouts.load(Ordering::Relaxed),
    left = queue.len(),
    capacity = queue.capacity(),
    "workload finished"
  );

  let stdout = std::io::stdout();
  if let Err(e) = queue.dump(stdout.lock()) {
    tracing::error!("failed to dump queue: {}", e);
  }
}
