//! Fixed-capacity ring buffer of owned items.
//!
//! The buffer never grows or shrinks: exactly `capacity` slots are allocated up
//! front. Items are moved into a slot on push and moved back out on pop, leaving
//! the slot empty in between.

use std::fmt;

pub(crate) struct Ring<T> {
  slots: Box<[Option<T>]>,
  // Index of the oldest item.
  head: usize,
  len: usize,
}

impl<T> Ring<T> {
  pub(crate) fn new(capacity: usize) -> Self {
    let slots: Box<[Option<T>]> = (0..capacity).map(|_| None).collect();
    Self {
      slots,
      head: 0,
      len: 0,
    }
  }

  #[inline]
  pub(crate) fn capacity(&self) -> usize {
    self.slots.len()
  }

  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.len
  }

  #[inline]
  pub(crate) fn is_empty(&self) -> bool {
    self.len == 0
  }

  #[inline]
  pub(crate) fn is_full(&self) -> bool {
    self.len == self.capacity()
  }

  /// Moves `item` into the tail slot. Hands it back if there is no room.
  pub(crate) fn push_back(&mut self, item: T) -> Result<(), T> {
    if self.is_full() {
      return Err(item);
    }
    let tail = (self.head + self.len) % self.capacity();
    debug_assert!(self.slots[tail].is_none(), "tail slot must be vacant");
    self.slots[tail] = Some(item);
    self.len += 1;
    Ok(())
  }

  /// Moves items from `items` into the free slots, in order, until the buffer
  /// is full. Never pulls more items than it can store. Returns the new length.
  pub(crate) fn fill_from<I>(&mut self, items: I) -> usize
  where
    I: Iterator<Item = T>,
  {
    let room = self.capacity() - self.len;
    for item in items.take(room) {
      let tail = (self.head + self.len) % self.capacity();
      self.slots[tail] = Some(item);
      self.len += 1;
    }
    self.len
  }

  /// Moves the head item out of the buffer.
  pub(crate) fn pop_front(&mut self) -> Option<T> {
    if self.is_empty() {
      return None;
    }
    let item = self.slots[self.head].take();
    debug_assert!(item.is_some(), "head slot must be occupied");
    self.head = (self.head + 1) % self.capacity();
    self.len -= 1;
    item
  }

  /// Iterates the held items from head to tail.
  pub(crate) fn iter(&self) -> impl Iterator<Item = &T> + '_ {
    let capacity = self.capacity();
    (0..self.len).filter_map(move |offset| self.slots[(self.head + offset) % capacity].as_ref())
  }
}

impl<T: fmt::Debug> fmt::Debug for Ring<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.iter()).finish()
  }
}
