use core::time::Duration;

use crate::queue::queue_error::QueueError;

/// Contract for the bounded blocking store a
/// [`WaterMarkedQueue`](crate::queue::WaterMarkedQueue) decorates.
///
/// An implementation owns its storage, its consumer-side blocking, and its size
/// bookkeeping; the decorator only adds producer-side admission control on top.
/// The store must start empty and must not be touched by any other code once it
/// has been handed to a decorator.
pub trait QueueBackend<T> {
  /// Inserts the element if space is available, without blocking.
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::Full`] when the store is at capacity and [`QueueError::Closed`]
  /// once [`close`](Self::close) has been called. Both return the element to the caller.
  fn try_offer(&self, item: T) -> Result<(), QueueError<T>>;

  /// Removes the head element if one is present, without blocking.
  fn try_poll(&self) -> Option<T>;

  /// Removes the head element, suspending the caller until one is available.
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::Disconnected`] once the store is closed and fully drained.
  fn poll_blocking(&self) -> Result<T, QueueError<T>>;

  /// As [`poll_blocking`](Self::poll_blocking), bounded by `timeout`.
  ///
  /// Returns `Ok(None)` when the timeout expires without an element becoming available.
  /// A `timeout` beyond the clock's range (such as `Duration::MAX`) must wait untimed
  /// rather than fail.
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::Disconnected`] once the store is closed and fully drained.
  fn poll_timeout(&self, timeout: Duration) -> Result<Option<T>, QueueError<T>>;

  /// Clones the head element without removing it.
  fn peek(&self) -> Option<T>
  where
    T: Clone;

  /// Returns the current number of stored elements.
  fn len(&self) -> usize;

  /// Returns the fixed storage capacity.
  fn capacity(&self) -> usize;

  /// Returns the number of slots still available.
  fn remaining_capacity(&self) -> usize {
    self.capacity().saturating_sub(self.len())
  }

  /// Indicates whether no element is stored.
  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Moves up to `limit` elements (all of them when `None`) into `sink` in queue order,
  /// returning the number moved.
  fn drain(&self, sink: &mut Vec<T>, limit: Option<usize>) -> usize;

  /// Keeps only the elements satisfying the predicate, returning the number removed.
  fn retain(&self, pred: impl FnMut(&T) -> bool) -> usize;

  /// Removes the first element equal to `item`, returning whether one was found.
  fn remove(&self, item: &T) -> bool
  where
    T: PartialEq;

  /// Indicates whether an element equal to `item` is stored.
  fn contains(&self, item: &T) -> bool
  where
    T: PartialEq;

  /// Copies the stored elements in queue order.
  fn snapshot(&self) -> Vec<T>
  where
    T: Clone;

  /// Removes every element, returning the number removed.
  fn clear(&self) -> usize;

  /// Transitions the store into the closed state and wakes its blocked consumers.
  ///
  /// Idempotent. After closing, inserts fail with [`QueueError::Closed`]; removals keep
  /// draining the remaining elements.
  fn close(&self);

  /// Indicates whether [`close`](Self::close) has been called.
  fn is_closed(&self) -> bool;
}
