// src/telemetry.rs

//! Structured logging hooks for queue operations.
//!
//! With the `tracing` feature (on by default) every hook forwards to a `tracing`
//! event under the `fibre_queue` target. Without it the hooks compile to nothing.

pub(crate) const LOC_NEW: &str = "BoundedQueue::new";
pub(crate) const LOC_ENQUEUE: &str = "BoundedQueue::enqueue";
pub(crate) const LOC_DEQUEUE: &str = "BoundedQueue::dequeue";

pub(crate) const EVT_CREATED: &str = "Created";
pub(crate) const EVT_ENQUEUED: &str = "Enqueued";
pub(crate) const EVT_DEQUEUED: &str = "Dequeued";
pub(crate) const EVT_WAKE_ONE: &str = "WakeOne";

pub(crate) const COND_ROOM: &str = "room_available";
pub(crate) const COND_ITEM: &str = "item_available";

#[cfg(feature = "tracing")]
pub mod enabled {
  use std::time::Duration;

  pub fn log_event_fn(location: &'static str, event: &'static str, len: usize, capacity: usize) {
    tracing::trace!(target: "fibre_queue", location, event, len, capacity);
  }

  pub fn log_wait_fn(location: &'static str, condition: &'static str, remaining: Option<Duration>) {
    tracing::trace!(
      target: "fibre_queue",
      location,
      condition,
      timeout_ms = remaining.map(|d| d.as_millis() as u64),
      "parking until condition holds"
    );
  }

  pub fn log_timeout_fn(location: &'static str, condition: &'static str, timeout: Duration) {
    tracing::debug!(
      target: "fibre_queue",
      location,
      condition,
      timeout_ms = timeout.as_millis() as u64,
      "wait timed out, queue left unchanged"
    );
  }

  pub fn log_rejected_fn(location: &'static str, capacity: &str) {
    tracing::warn!(target: "fibre_queue", location, capacity, "rejected queue capacity");
  }
}

#[cfg(not(feature = "tracing"))]
pub mod disabled {
  use std::time::Duration;

  #[inline(always)]
  pub fn log_event_fn(_location: &'static str, _event: &'static str, _len: usize, _capacity: usize) {}
  #[inline(always)]
  pub fn log_wait_fn(_location: &'static str, _condition: &'static str, _remaining: Option<Duration>) {}
  #[inline(always)]
  pub fn log_timeout_fn(_location: &'static str, _condition: &'static str, _timeout: Duration) {}
  #[inline(always)]
  pub fn log_rejected_fn(_location: &'static str, _capacity: &str) {}
}

#[cfg(feature = "tracing")]
pub(crate) use enabled::{
  log_event_fn as log_event, log_rejected_fn as log_rejected, log_timeout_fn as log_timeout,
  log_wait_fn as log_wait,
};

#[cfg(not(feature = "tracing"))]
pub(crate) use disabled::{
  log_event_fn as log_event, log_rejected_fn as log_rejected, log_timeout_fn as log_timeout,
  log_wait_fn as log_wait,
};
