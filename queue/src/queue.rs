//! The bounded, blocking FIFO queue.
//!
//! `BoundedQueue` keeps its items in a fixed-size ring buffer behind a single
//! `parking_lot::RwLock`. Read-only accessors (`len`, equality, `Debug`, `dump`)
//! take the shared lock. `enqueue*` and `dequeue*` take the exclusive lock and,
//! when their condition does not hold, register a waiter on the matching wait
//! list, release the lock, park, and re-check the condition after re-locking.
//!
//! Each successful mutation wakes exactly one waiter of the complementary
//! condition: an enqueue wakes one consumer, a dequeue wakes one producer.
//! Waiters are woken in registration order, but a thread arriving while the
//! woken one is re-locking may take the slot or item first. The loser simply
//! registers again.

use std::fmt;
use std::io;
use std::ptr;
use std::time::{Duration, Instant};

use parking_lot::{RwLock, RwLockWriteGuard};

use crate::error::{QueueError, TryEnqueueError};
use crate::ring::Ring;
use crate::sync_util;
use crate::telemetry::{self, COND_ITEM, COND_ROOM, EVT_CREATED, EVT_DEQUEUED, EVT_ENQUEUED, EVT_WAKE_ONE};
use crate::telemetry::{LOC_DEQUEUE, LOC_ENQUEUE, LOC_NEW};
use crate::waiter::{WaitList, Waiter};

/// The two conditions a blocked caller can wait on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Condition {
  /// `len < capacity`, awaited by producers.
  RoomAvailable,
  /// `len > 0`, awaited by consumers.
  ItemAvailable,
}

impl Condition {
  #[inline]
  fn holds<T>(self, state: &State<T>) -> bool {
    match self {
      Condition::RoomAvailable => !state.ring.is_full(),
      Condition::ItemAvailable => !state.ring.is_empty(),
    }
  }

  fn name(self) -> &'static str {
    match self {
      Condition::RoomAvailable => COND_ROOM,
      Condition::ItemAvailable => COND_ITEM,
    }
  }

  fn location(self) -> &'static str {
    match self {
      Condition::RoomAvailable => LOC_ENQUEUE,
      Condition::ItemAvailable => LOC_DEQUEUE,
    }
  }
}

/// Everything guarded by the queue lock.
struct State<T> {
  ring: Ring<T>,
  /// Producers blocked on a full queue.
  not_full: WaitList,
  /// Consumers blocked on an empty queue.
  not_empty: WaitList,
}

impl<T> State<T> {
  #[inline]
  fn waiters(&mut self, condition: Condition) -> &mut WaitList {
    match condition {
      Condition::RoomAvailable => &mut self.not_full,
      Condition::ItemAvailable => &mut self.not_empty,
    }
  }
}

/// A fixed-capacity, thread-safe FIFO queue that blocks producers while it is
/// full and consumers while it is empty.
///
/// The queue owns every item from a successful enqueue until the dequeue that
/// returns it. Items still held when the queue is dropped are dropped with it.
///
/// `BoundedQueue` is neither `Clone` nor meant to be moved while shared: share
/// it by reference (e.g. `std::thread::scope`) or through an `Arc`. It is
/// `Sync` when `T: Send + Sync`, since readers may observe `&T` concurrently
/// through equality, `Debug` and `dump`.
pub struct BoundedQueue<T> {
  capacity: usize,
  state: RwLock<State<T>>,
}

impl<T> BoundedQueue<T> {
  /// Creates an empty queue holding at most `capacity` items.
  ///
  /// A capacity of `0` is accepted: such a queue is both full and empty
  /// forever, so only the timed and non-blocking operations ever return.
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::InvalidArgument`] if `capacity` is negative or does
  /// not fit in a `usize`.
  pub fn new<C>(capacity: C) -> Result<Self, QueueError>
  where
    C: TryInto<usize> + fmt::Display + Copy,
  {
    let capacity = validate_capacity(capacity)?;
    telemetry::log_event(LOC_NEW, EVT_CREATED, 0, capacity);
    Ok(Self::with_valid_capacity(capacity))
  }

  /// Creates a queue pre-filled with the first `capacity` items of `items`,
  /// in order.
  ///
  /// Items past `capacity` are never pulled from the iterator. Pass
  /// `iter.by_ref()` to keep them.
  ///
  /// # Errors
  ///
  /// Same as [`BoundedQueue::new`]. On error no item is consumed.
  pub fn with_items<C, I>(capacity: C, items: I) -> Result<Self, QueueError>
  where
    C: TryInto<usize> + fmt::Display + Copy,
    I: IntoIterator<Item = T>,
  {
    let capacity = validate_capacity(capacity)?;
    let mut queue = Self::with_valid_capacity(capacity);
    let len = queue.state.get_mut().ring.fill_from(items.into_iter());
    telemetry::log_event(LOC_NEW, EVT_CREATED, len, capacity);
    Ok(queue)
  }

  fn with_valid_capacity(capacity: usize) -> Self {
    Self {
      capacity,
      state: RwLock::new(State {
        ring: Ring::new(capacity),
        not_full: WaitList::new(),
        not_empty: WaitList::new(),
      }),
    }
  }

  /// Returns the fixed capacity. Never locks.
  #[inline]
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Returns the number of items currently held.
  pub fn len(&self) -> usize {
    self.state.read().ring.len()
  }

  /// Returns `true` if the queue holds no items.
  pub fn is_empty(&self) -> bool {
    self.state.read().ring.is_empty()
  }

  /// Returns `true` if the queue holds `capacity` items.
  pub fn is_full(&self) -> bool {
    self.state.read().ring.is_full()
  }

  /// Appends `item`, blocking while the queue is full.
  ///
  /// On a zero-capacity queue this never returns.
  pub fn enqueue(&self, item: T) {
    if self.enqueue_until(item, None).is_err() {
      unreachable!("an untimed enqueue only returns once there is room");
    }
  }

  /// Appends `item`, blocking for at most `timeout` while the queue is full.
  ///
  /// # Errors
  ///
  /// Returns [`TryEnqueueError::Timeout`] carrying the item back if the queue
  /// stayed full for the whole timeout. The queue is left unchanged.
  pub fn enqueue_timeout(&self, item: T, timeout: Duration) -> Result<(), TryEnqueueError<T>> {
    self
      .enqueue_until(item, Instant::now().checked_add(timeout))
      .map_err(|item| {
        telemetry::log_timeout(LOC_ENQUEUE, COND_ROOM, timeout);
        TryEnqueueError::Timeout(item)
      })
  }

  /// Appends `item` only if there is room right now.
  ///
  /// # Errors
  ///
  /// Returns [`TryEnqueueError::Full`] carrying the item back.
  pub fn try_enqueue(&self, item: T) -> Result<(), TryEnqueueError<T>> {
    self
      .enqueue_until(item, Some(Instant::now()))
      .map_err(TryEnqueueError::Full)
  }

  /// Removes and returns the head item, blocking while the queue is empty.
  ///
  /// On a zero-capacity queue this never returns.
  pub fn dequeue(&self) -> T {
    match self.dequeue_until(None) {
      Some(item) => item,
      None => unreachable!("an untimed dequeue only returns once an item is available"),
    }
  }

  /// Removes and returns the head item, blocking for at most `timeout` while
  /// the queue is empty. Returns `None` on timeout, leaving the queue unchanged.
  pub fn dequeue_timeout(&self, timeout: Duration) -> Option<T> {
    let item = self.dequeue_until(Instant::now().checked_add(timeout));
    if item.is_none() {
      telemetry::log_timeout(LOC_DEQUEUE, COND_ITEM, timeout);
    }
    item
  }

  /// Removes and returns the head item if there is one right now.
  pub fn try_dequeue(&self) -> Option<T> {
    self.dequeue_until(Some(Instant::now()))
  }

  fn enqueue_until(&self, item: T, deadline: Option<Instant>) -> Result<(), T> {
    let state = self.state.write();
    let Some(mut state) = self.wait_for(state, Condition::RoomAvailable, deadline) else {
      return Err(item);
    };
    state.ring.push_back(item)?;
    let len = state.ring.len();
    let consumer = state.not_empty.pop();
    drop(state);

    telemetry::log_event(LOC_ENQUEUE, EVT_ENQUEUED, len, self.capacity);
    if let Some(consumer) = consumer {
      telemetry::log_event(LOC_ENQUEUE, EVT_WAKE_ONE, len, self.capacity);
      consumer.wake();
    }
    Ok(())
  }

  fn dequeue_until(&self, deadline: Option<Instant>) -> Option<T> {
    let state = self.state.write();
    let mut state = self.wait_for(state, Condition::ItemAvailable, deadline)?;
    let item = state.ring.pop_front()?;
    let len = state.ring.len();
    let producer = state.not_full.pop();
    drop(state);

    telemetry::log_event(LOC_DEQUEUE, EVT_DEQUEUED, len, self.capacity);
    if let Some(producer) = producer {
      telemetry::log_event(LOC_DEQUEUE, EVT_WAKE_ONE, len, self.capacity);
      producer.wake();
    }
    Some(item)
  }

  /// Waits until `condition` holds, returning the re-acquired write guard, or
  /// `None` once `deadline` has passed with the condition still false.
  ///
  /// The predicate is re-checked after every wake-up. A waiter that stops
  /// waiting without being notified unlinks itself so later notifications go
  /// to threads that are still parked.
  fn wait_for<'a>(
    &'a self,
    mut state: RwLockWriteGuard<'a, State<T>>,
    condition: Condition,
    deadline: Option<Instant>,
  ) -> Option<RwLockWriteGuard<'a, State<T>>> {
    loop {
      if condition.holds(&state) {
        return Some(state);
      }
      if sync_util::deadline_passed(deadline) {
        return None;
      }

      let waiter = Waiter::current();
      state.waiters(condition).push(waiter.clone());
      let notified = RwLockWriteGuard::unlocked(&mut state, || {
        telemetry::log_wait(
          condition.location(),
          condition.name(),
          deadline.map(|d| d.saturating_duration_since(Instant::now())),
        );
        waiter.park(deadline)
      });
      if !notified {
        state.waiters(condition).remove(&waiter);
      }
    }
  }

  /// Writes `"<len> - <capacity>"` followed by the items, head first, to `out`.
  ///
  /// Debugging aid only; the format is not stable.
  pub fn dump<W: io::Write>(&self, mut out: W) -> io::Result<()>
  where
    T: fmt::Display,
  {
    let state = self.state.read();
    writeln!(out, "{} - {}", state.ring.len(), self.capacity)?;
    for item in state.ring.iter() {
      write!(out, "{} ", item)?;
    }
    writeln!(out)
  }
}

fn validate_capacity<C>(capacity: C) -> Result<usize, QueueError>
where
  C: TryInto<usize> + fmt::Display + Copy,
{
  capacity.try_into().map_err(|_| {
    let shown = capacity.to_string();
    telemetry::log_rejected(LOC_NEW, &shown);
    QueueError::InvalidArgument { capacity: shown }
  })
}

/// Two queues are equal when they hold the same number of items and the items
/// are pairwise equal in FIFO order. Capacities are not compared.
///
/// Both queues are read-locked for the comparison, lower address first.
impl<T: PartialEq> PartialEq for BoundedQueue<T> {
  fn eq(&self, other: &Self) -> bool {
    if ptr::eq(self, other) {
      return true;
    }
    let (first, second) = if (self as *const Self) < (other as *const Self) {
      (self, other)
    } else {
      (other, self)
    };
    let first = first.state.read();
    let second = second.state.read();
    first.ring.len() == second.ring.len() && first.ring.iter().eq(second.ring.iter())
  }
}

impl<T: Eq> Eq for BoundedQueue<T> {}

impl<T: fmt::Debug> fmt::Debug for BoundedQueue<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = self.state.read();
    f.debug_struct("BoundedQueue")
      .field("capacity", &self.capacity)
      .field("len", &state.ring.len())
      .field("items", &state.ring)
      .field("waiting_producers", &state.not_full.len())
      .field("waiting_consumers", &state.not_empty.len())
      .finish()
  }
}
