//! A fixed-capacity, thread-safe blocking FIFO queue.
//!
//! [`BoundedQueue`] serializes hand-off between producer and consumer threads:
//! producers block while the queue is full, consumers block while it is empty,
//! and both sides have timed and non-blocking variants. The capacity is fixed
//! at construction and the queue never grows.
//!
//! Items move into the queue on enqueue and move out to the caller on
//! dequeue. An enqueue that times out hands the item back inside the error, so
//! nothing is ever silently dropped.
//!
//! ```
//! use fibre_queue::BoundedQueue;
//! use std::time::Duration;
//!
//! let queue = BoundedQueue::new(2).unwrap();
//! std::thread::scope(|s| {
//!   s.spawn(|| {
//!     for i in 0..4 {
//!       queue.enqueue(i);
//!     }
//!   });
//!   let received: Vec<i32> = (0..4).map(|_| queue.dequeue()).collect();
//!   assert_eq!(received, vec![0, 1, 2, 3]);
//! });
//! assert_eq!(queue.dequeue_timeout(Duration::from_millis(5)), None);
//! ```
//!
//! With the default `tracing` feature, operations emit `trace`/`debug` events
//! under the `fibre_queue` target.

pub mod error;
mod queue;

// Internal utilities - not part of public API
mod ring;
mod sync_util;
mod telemetry;
mod waiter;

pub use error::{QueueError, TryEnqueueError};
pub use queue::BoundedQueue;
