use bench_matrix::{
  criterion_runner::sync_suite::SyncBenchmarkSuite, AbstractCombination, MatrixCellValue,
};
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use fibre_queue::BoundedQueue;

const ITEM_VALUE: u64 = 203;

// --- Config, State, Context ---
#[derive(Debug, Clone)]
struct LatencyBenchConfig {
  capacity: usize,
  num_items: usize,
  producers: usize,
}

#[derive(Default, Debug)]
struct BenchContext {
  items_processed_total: usize,
}

struct QueueState {
  queue: Arc<BoundedQueue<u64>>,
}

fn extract_config(combo: &AbstractCombination) -> Result<LatencyBenchConfig, String> {
  let capacity = combo.get_u64(0)? as usize;
  let num_items = (combo.get_u64(1)? as usize).max(1);
  let producers = (combo.get_u64(2)? as usize).max(1);

  // A zero-capacity queue never completes an untimed hand-off.
  if capacity == 0 {
    return Err(format!(
      "Skipping combination: capacity cannot be 0. Cap: {}, Items: {}",
      capacity, num_items
    ));
  }
  if num_items % producers != 0 {
    return Err(format!(
      "Skipping combination: items ({}) must divide evenly across producers ({})",
      num_items, producers
    ));
  }

  Ok(LatencyBenchConfig {
    capacity,
    num_items,
    producers,
  })
}

fn setup_fn(cfg: &LatencyBenchConfig) -> Result<(BenchContext, QueueState), String> {
  let queue = BoundedQueue::new(cfg.capacity).map_err(|e| e.to_string())?;
  Ok((
    BenchContext::default(),
    QueueState {
      queue: Arc::new(queue),
    },
  ))
}

// Producers on spawned threads, the bench thread drains.
fn benchmark_logic(
  mut ctx: BenchContext,
  state: QueueState,
  cfg: &LatencyBenchConfig,
) -> (BenchContext, QueueState, Duration) {
  let per_producer = cfg.num_items / cfg.producers;
  let start_time = Instant::now();

  let handles: Vec<_> = (0..cfg.producers)
    .map(|_| {
      let queue = state.queue.clone();
      thread::spawn(move || {
        for _ in 0..per_producer {
          queue.enqueue(ITEM_VALUE);
        }
      })
    })
    .collect();

  for _ in 0..cfg.num_items {
    let _ = state.queue.dequeue();
  }
  for handle in handles {
    handle.join().unwrap();
  }

  let duration = start_time.elapsed();
  ctx.items_processed_total += cfg.num_items;
  (ctx, state, duration)
}

fn teardown(ctx: BenchContext, state: QueueState, cfg: &LatencyBenchConfig) {
  // Every hand-off of every iteration must have been drained.
  assert_eq!(ctx.items_processed_total % cfg.num_items, 0);
  assert!(state.queue.is_empty());
}

// Single-item producer/consumer hand-off on a fresh queue.
fn handoff_latency(c: &mut Criterion) {
  c.bench_function("BoundedQueue/handoff_latency", |b| {
    b.iter_custom(|iters| {
      let mut total = Duration::ZERO;
      for _ in 0..iters {
        let queue = BoundedQueue::new(4usize).unwrap();
        total += thread::scope(|s| {
          let producer = s.spawn(|| {
            let start = Instant::now();
            queue.enqueue(ITEM_VALUE);
            start
          });
          let consumer = s.spawn(|| {
            let _ = queue.dequeue();
            Instant::now()
          });
          let start = producer.join().unwrap();
          consumer.join().unwrap().saturating_duration_since(start)
        });
      }
      total
    })
  });
}

fn throughput_benches(c: &mut Criterion) {
  let parameter_axes = vec![
    vec![
      MatrixCellValue::Unsigned(1),
      MatrixCellValue::Unsigned(128),
      MatrixCellValue::Unsigned(1024),
    ], // Capacity
    vec![
      MatrixCellValue::Unsigned(1_000),
      MatrixCellValue::Unsigned(100_000),
    ], // NumItems
    vec![
      MatrixCellValue::Unsigned(1),
      MatrixCellValue::Unsigned(4),
    ], // Producers
  ];
  let parameter_names = vec!["Cap".to_string(), "Items".to_string(), "Prod".to_string()];

  SyncBenchmarkSuite::new(
    c,
    "BoundedQueueSync".to_string(),
    Some(parameter_names),
    parameter_axes,
    Box::new(extract_config),
    setup_fn,
    benchmark_logic,
    teardown,
  )
  .throughput(|cfg: &LatencyBenchConfig| Throughput::Elements(cfg.num_items as u64))
  .run();
}

criterion_group!(benches, handoff_latency, throughput_benches);
criterion_main!(benches);
