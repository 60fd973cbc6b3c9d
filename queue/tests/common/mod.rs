#![allow(dead_code)]

use fibre_queue::BoundedQueue;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub const SETTLE: Duration = Duration::from_millis(50);
pub const SHORT_TIMEOUT: Duration = Duration::from_millis(500);
pub const LONG_TIMEOUT: Duration = Duration::from_secs(3);
pub const STRESS_WINDOW: Duration = Duration::from_millis(500);
pub const ITEMS_MEDIUM: usize = 200;
pub const ITEMS_HIGH: usize = 1000;

/// Polls `condition` until it holds or `timeout` elapses.
pub fn wait_until<F: Fn() -> bool>(timeout: Duration, condition: F) -> bool {
  let deadline = Instant::now() + timeout;
  while Instant::now() < deadline {
    if condition() {
      return true;
    }
    thread::sleep(Duration::from_millis(1));
  }
  condition()
}

/// Waits for the queue to reach `len` items, panicking after `LONG_TIMEOUT`.
pub fn wait_for_len<T>(queue: &BoundedQueue<T>, len: usize) {
  assert!(
    wait_until(LONG_TIMEOUT, || queue.len() == len),
    "queue never reached len {} (len is {})",
    len,
    queue.len()
  );
}

/// Builds the expected queue for an equality check.
pub fn expected<T>(items: impl IntoIterator<Item = T>) -> BoundedQueue<T> {
  let items: Vec<T> = items.into_iter().collect();
  BoundedQueue::with_items(items.len(), items).unwrap()
}

/// Counts drops so tests can check that every item is released exactly once.
pub struct DropCounter {
  pub id: usize,
  drops: Arc<AtomicUsize>,
}

impl DropCounter {
  pub fn new(id: usize, drops: &Arc<AtomicUsize>) -> Self {
    Self {
      id,
      drops: drops.clone(),
    }
  }
}

impl Drop for DropCounter {
  fn drop(&mut self) {
    self.drops.fetch_add(1, Ordering::SeqCst);
  }
}
