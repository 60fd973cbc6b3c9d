//! Parked-thread waiters and the FIFO wait list behind each queue condition.
//!
//! A `WaitList` lives inside the queue's locked state, so registering a waiter
//! and changing the state it waits on are serialized by the same lock. That is
//! what keeps wakeups from getting lost: a notifier can only pop a waiter that
//! registered before the mutation, and a waiter only registers after seeing
//! the predicate false under the lock.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, Thread};
use std::time::Instant;

use crate::sync_util;

struct WaiterInner {
  thread: Thread,
  notified: AtomicBool,
}

/// A handle to a thread parked on one queue condition.
#[derive(Clone)]
pub(crate) struct Waiter {
  inner: Arc<WaiterInner>,
}

impl Waiter {
  /// Creates a waiter for the calling thread.
  pub(crate) fn current() -> Self {
    Self {
      inner: Arc::new(WaiterInner {
        thread: thread::current(),
        notified: AtomicBool::new(false),
      }),
    }
  }

  #[inline]
  pub(crate) fn is_notified(&self) -> bool {
    self.inner.notified.load(Ordering::Acquire)
  }

  /// Marks the waiter notified and unparks its thread.
  pub(crate) fn wake(self) {
    self.inner.notified.store(true, Ordering::Release);
    self.inner.thread.unpark();
  }

  /// Parks the calling thread until woken or until `deadline`.
  /// Returns whether the waiter was notified.
  pub(crate) fn park(&self, deadline: Option<Instant>) -> bool {
    sync_util::park_until(deadline, || self.is_notified())
  }

  #[inline]
  fn same_as(&self, other: &Waiter) -> bool {
    Arc::ptr_eq(&self.inner, &other.inner)
  }
}

impl fmt::Debug for Waiter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Waiter")
      .field("thread", &self.inner.thread.id())
      .field("notified", &self.is_notified())
      .finish()
  }
}

/// FIFO of waiters for one condition ("room available" or "item available").
#[derive(Debug, Default)]
pub(crate) struct WaitList {
  waiters: VecDeque<Waiter>,
}

impl WaitList {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.waiters.len()
  }

  pub(crate) fn push(&mut self, waiter: Waiter) {
    self.waiters.push_back(waiter);
  }

  /// Takes the longest-waiting waiter. The caller wakes it, normally after
  /// releasing the lock.
  pub(crate) fn pop(&mut self) -> Option<Waiter> {
    self.waiters.pop_front()
  }

  /// Unlinks `waiter` if it is still registered. Used when a wait ends without
  /// a notification so no later notification is spent on it.
  pub(crate) fn remove(&mut self, waiter: &Waiter) -> bool {
    match self.waiters.iter().position(|w| w.same_as(waiter)) {
      Some(index) => {
        self.waiters.remove(index);
        true
      }
      None => false,
    }
  }
}
