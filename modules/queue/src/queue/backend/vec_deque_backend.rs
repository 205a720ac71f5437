use core::{fmt, time::Duration};
use std::{
  collections::VecDeque,
  sync::{Condvar, Mutex, MutexGuard, PoisonError},
  time::Instant,
};

use crate::queue::{backend::queue_backend::QueueBackend, queue_error::QueueError};

#[cfg(test)]
mod tests;

/// Bounded FIFO store guarded by a mutex, with its own consumer-side blocking.
///
/// This is the default backend for a
/// [`WaterMarkedQueue`](crate::queue::WaterMarkedQueue): a `VecDeque` behind a
/// `Mutex`, with a `not_empty` condvar suspending consumers until an element
/// arrives or the store is closed.
pub struct VecDequeBackend<T> {
  inner:     Mutex<Inner<T>>,
  not_empty: Condvar,
  capacity:  usize,
}

struct Inner<T> {
  items:  VecDeque<T>,
  closed: bool,
}

impl<T> VecDequeBackend<T> {
  /// Creates an empty store bounded to `capacity` elements.
  #[must_use]
  pub fn new(capacity: usize) -> Self {
    Self {
      inner:     Mutex::new(Inner { items: VecDeque::with_capacity(capacity), closed: false }),
      not_empty: Condvar::new(),
      capacity,
    }
  }

  fn lock(&self) -> MutexGuard<'_, Inner<T>> {
    // A panicked holder cannot leave the deque structurally broken, so poisoning is
    // recovered rather than propagated.
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl<T> fmt::Debug for VecDequeBackend<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let guard = self.lock();
    f.debug_struct("VecDequeBackend")
      .field("len", &guard.items.len())
      .field("capacity", &self.capacity)
      .field("closed", &guard.closed)
      .finish()
  }
}

impl<T> QueueBackend<T> for VecDequeBackend<T> {
  fn try_offer(&self, item: T) -> Result<(), QueueError<T>> {
    let mut guard = self.lock();
    if guard.closed {
      return Err(QueueError::Closed(item));
    }
    if guard.items.len() >= self.capacity {
      return Err(QueueError::Full(item));
    }
    guard.items.push_back(item);
    drop(guard);
    self.not_empty.notify_one();
    Ok(())
  }

  fn try_poll(&self) -> Option<T> {
    self.lock().items.pop_front()
  }

  fn poll_blocking(&self) -> Result<T, QueueError<T>> {
    let mut guard = self.lock();
    loop {
      if let Some(item) = guard.items.pop_front() {
        return Ok(item);
      }
      if guard.closed {
        return Err(QueueError::Disconnected);
      }
      guard = self.not_empty.wait(guard).unwrap_or_else(PoisonError::into_inner);
    }
  }

  fn poll_timeout(&self, timeout: Duration) -> Result<Option<T>, QueueError<T>> {
    // None when the deadline overflows the clock's range: wait untimed.
    let deadline = Instant::now().checked_add(timeout);
    let mut guard = self.lock();
    loop {
      if let Some(item) = guard.items.pop_front() {
        return Ok(Some(item));
      }
      if guard.closed {
        return Err(QueueError::Disconnected);
      }
      match deadline {
        | Some(deadline) => {
          let now = Instant::now();
          if now >= deadline {
            return Ok(None);
          }
          let (next, _timed_out) = self
            .not_empty
            .wait_timeout(guard, deadline - now)
            .unwrap_or_else(PoisonError::into_inner);
          guard = next;
        },
        | None => {
          guard = self.not_empty.wait(guard).unwrap_or_else(PoisonError::into_inner);
        },
      }
    }
  }

  fn peek(&self) -> Option<T>
  where
    T: Clone, {
    self.lock().items.front().cloned()
  }

  fn len(&self) -> usize {
    self.lock().items.len()
  }

  fn capacity(&self) -> usize {
    self.capacity
  }

  fn drain(&self, sink: &mut Vec<T>, limit: Option<usize>) -> usize {
    let mut guard = self.lock();
    let count = limit.unwrap_or(usize::MAX).min(guard.items.len());
    sink.extend(guard.items.drain(..count));
    count
  }

  fn retain(&self, mut pred: impl FnMut(&T) -> bool) -> usize {
    let mut guard = self.lock();
    let before = guard.items.len();
    guard.items.retain(|item| pred(item));
    before - guard.items.len()
  }

  fn remove(&self, item: &T) -> bool
  where
    T: PartialEq, {
    let mut guard = self.lock();
    match guard.items.iter().position(|stored| stored == item) {
      | Some(index) => {
        guard.items.remove(index);
        true
      },
      | None => false,
    }
  }

  fn contains(&self, item: &T) -> bool
  where
    T: PartialEq, {
    self.lock().items.contains(item)
  }

  fn snapshot(&self) -> Vec<T>
  where
    T: Clone, {
    self.lock().items.iter().cloned().collect()
  }

  fn clear(&self) -> usize {
    let mut guard = self.lock();
    let removed = guard.items.len();
    guard.items.clear();
    removed
  }

  fn close(&self) {
    let mut guard = self.lock();
    guard.closed = true;
    drop(guard);
    self.not_empty.notify_all();
  }

  fn is_closed(&self) -> bool {
    self.lock().closed
  }
}
