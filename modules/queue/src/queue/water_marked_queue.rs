use core::{fmt, marker::PhantomData, time::Duration};
use std::{
  sync::{Condvar, Mutex, MutexGuard, PoisonError},
  time::Instant,
};

use crate::queue::{
  backend::{queue_backend::QueueBackend, vec_deque_backend::VecDequeBackend},
  config_error::ConfigError,
  queue_error::QueueError,
  water_mark_gate::WaterMarkGate,
};


/// Decorator adding hysteresis-based backpressure to a bounded blocking store.
///
/// The high-water mark is the store's own capacity; the low-water mark is
/// supplied by the caller. Once the store rejects an insert for lack of space,
/// every further insert is rejected (or suspended, for [`put`](Self::put) and
/// [`offer_timeout`](Self::offer_timeout)) until remaining capacity has
/// recovered to `initial remaining capacity - low_water_mark`. This keeps
/// producers from oscillating between blocked and unblocked around a queue
/// hovering one element below capacity.
///
/// The store is owned exclusively for the decorator's lifetime; consumers and
/// producers both go through the decorator, whose removal operations broadcast
/// a `not_full` condvar so suspended producers re-check the gate.
pub struct WaterMarkedQueue<T, B = VecDequeBackend<T>>
where
  B: QueueBackend<T>, {
  backend:   B,
  gate:      WaterMarkGate,
  wait_lock: Mutex<()>,
  not_full:  Condvar,
  _pd:       PhantomData<T>,
}

impl<T> WaterMarkedQueue<T, VecDequeBackend<T>> {
  /// Creates a decorator over a fresh [`VecDequeBackend`] bounded to `capacity` elements.
  ///
  /// # Errors
  ///
  /// Returns a `ConfigError` when `low_water_mark` exceeds `capacity`.
  pub fn bounded(capacity: usize, low_water_mark: usize) -> Result<Self, ConfigError> {
    Self::new(VecDequeBackend::new(capacity), low_water_mark)
  }
}

impl<T, B> WaterMarkedQueue<T, B>
where
  B: QueueBackend<T>,
{
  /// Wraps `backend`, which must be empty and not shared with any other code.
  ///
  /// The reopening threshold is computed once as the backend's remaining
  /// capacity minus `low_water_mark` and is immutable afterwards.
  ///
  /// # Errors
  ///
  /// Returns a `ConfigError` when `low_water_mark` exceeds the backend's
  /// remaining capacity; no partial queue is produced.
  pub fn new(backend: B, low_water_mark: usize) -> Result<Self, ConfigError> {
    let remaining_capacity = backend.remaining_capacity();
    if low_water_mark > remaining_capacity {
      return Err(ConfigError::LowWaterMarkTooLarge { low_water_mark, remaining_capacity });
    }
    Ok(Self {
      backend,
      gate: WaterMarkGate::new(remaining_capacity - low_water_mark),
      wait_lock: Mutex::new(()),
      not_full: Condvar::new(),
      _pd: PhantomData,
    })
  }

  /// Inserts the element without blocking.
  ///
  /// This is the try-insert primitive every other insertion path funnels
  /// through, and the only operation that mutates the water-mark flag. While
  /// the gate is open the attempt goes straight to the store and a rejection
  /// latches the gate closed; while it is closed the attempt is refused
  /// outright unless live remaining capacity has recovered to the threshold.
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::Full`] with the element when the store is at
  /// capacity or the gate is closed, and [`QueueError::Closed`] after
  /// [`close`](Self::close).
  pub fn offer(&self, item: T) -> Result<(), QueueError<T>> {
    if !self.gate.is_closed() {
      match self.backend.try_offer(item) {
        | Ok(()) => Ok(()),
        | Err(QueueError::Full(item)) => {
          self.gate.latch_closed();
          Err(QueueError::Full(item))
        },
        | Err(other) => Err(other),
      }
    } else if self.gate.admits(self.backend.remaining_capacity()) {
      match self.backend.try_offer(item) {
        | Ok(()) => {
          self.gate.reopen();
          Ok(())
        },
        // A racing producer may have taken the revalidated slot; the gate stays closed.
        | Err(other) => Err(other),
      }
    } else if self.backend.is_closed() {
      // The store is never consulted on this branch, so the closed state must be
      // checked here or a suspended producer would re-wait forever after close().
      Err(QueueError::Closed(item))
    } else {
      Err(QueueError::Full(item))
    }
  }

  /// Inserts the element, suspending the caller until the gate admits it.
  ///
  /// Each wakeup performs exactly one [`offer`](Self::offer) and re-waits on
  /// failure. [`close`](Self::close) cancels the wait: the element is returned
  /// un-inserted inside [`QueueError::Closed`].
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::Closed`] when the queue is closed before or during
  /// the wait.
  pub fn put(&self, item: T) -> Result<(), QueueError<T>> {
    // Fast path outside the wait lock.
    let mut item = match self.offer(item) {
      | Ok(()) => return Ok(()),
      | Err(QueueError::Full(item)) => item,
      | Err(other) => return Err(other),
    };
    let mut guard = self.wait_guard();
    loop {
      match self.offer(item) {
        | Ok(()) => return Ok(()),
        | Err(QueueError::Full(rejected)) => {
          item = rejected;
          guard = self.not_full.wait(guard).unwrap_or_else(PoisonError::into_inner);
        },
        | Err(other) => return Err(other),
      }
    }
  }

  /// As [`put`](Self::put), bounded by `timeout`.
  ///
  /// The wait budget is accounted against a fixed deadline, so spurious
  /// wakeups and failed retries consume it monotonically instead of resetting
  /// it. A `timeout` beyond the clock's range (such as `Duration::MAX`) waits
  /// untimed, like [`put`](Self::put).
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::TimedOut`] with the element when the deadline
  /// passes without an insert, and [`QueueError::Closed`] when the queue is
  /// closed before or during the wait.
  pub fn offer_timeout(&self, item: T, timeout: Duration) -> Result<(), QueueError<T>> {
    let mut item = match self.offer(item) {
      | Ok(()) => return Ok(()),
      | Err(QueueError::Full(item)) => item,
      | Err(other) => return Err(other),
    };
    // None when the deadline overflows the clock's range: wait untimed.
    let deadline = Instant::now().checked_add(timeout);
    let mut guard = self.wait_guard();
    loop {
      match self.offer(item) {
        | Ok(()) => return Ok(()),
        | Err(QueueError::Full(rejected)) => {
          item = rejected;
          match deadline {
            | Some(deadline) => {
              let now = Instant::now();
              if now >= deadline {
                return Err(QueueError::TimedOut(item));
              }
              let (next, _timed_out) = self
                .not_full
                .wait_timeout(guard, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
              guard = next;
            },
            | None => {
              guard = self.not_full.wait(guard).unwrap_or_else(PoisonError::into_inner);
            },
          }
        },
        | Err(other) => return Err(other),
      }
    }
  }

  /// Inserts each element via [`offer`](Self::offer) in iteration order.
  ///
  /// Bulk insertion is not atomic: elements inserted before a failure stay in
  /// the queue.
  ///
  /// # Errors
  ///
  /// Returns the first rejected element's error and stops iterating.
  pub fn add_all<I>(&self, items: I) -> Result<(), QueueError<T>>
  where
    I: IntoIterator<Item = T>, {
    for item in items {
      self.offer(item)?;
    }
    Ok(())
  }

  /// Removes the head element if one is present, without blocking.
  pub fn poll(&self) -> Option<T> {
    let item = self.backend.try_poll();
    if item.is_some() {
      self.notify_not_full();
    }
    item
  }

  /// Removes the head element, suspending the caller until one is available.
  ///
  /// Consumer-side blocking is the backend's own; the decorator only adds the
  /// producer notification afterwards.
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::Disconnected`] once the queue is closed and fully
  /// drained.
  pub fn take(&self) -> Result<T, QueueError<T>> {
    let item = self.backend.poll_blocking()?;
    self.notify_not_full();
    Ok(item)
  }

  /// As [`take`](Self::take), bounded by `timeout`; `Ok(None)` on expiry.
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::Disconnected`] once the queue is closed and fully
  /// drained.
  pub fn poll_timeout(&self, timeout: Duration) -> Result<Option<T>, QueueError<T>> {
    let item = self.backend.poll_timeout(timeout)?;
    if item.is_some() {
      self.notify_not_full();
    }
    Ok(item)
  }

  /// Moves every stored element into `sink`, returning the number moved.
  pub fn drain_to(&self, sink: &mut Vec<T>) -> usize {
    let moved = self.backend.drain(sink, None);
    self.notify_not_full();
    moved
  }

  /// Moves up to `max` elements into `sink`, returning the number moved.
  pub fn drain_to_limit(&self, sink: &mut Vec<T>, max: usize) -> usize {
    let moved = self.backend.drain(sink, Some(max));
    self.notify_not_full();
    moved
  }

  /// Keeps only the elements satisfying the predicate, returning the number removed.
  pub fn retain(&self, pred: impl FnMut(&T) -> bool) -> usize {
    let removed = self.backend.retain(pred);
    self.notify_not_full();
    removed
  }

  /// Removes the first element equal to `item`, returning whether one was found.
  pub fn remove(&self, item: &T) -> bool
  where
    T: PartialEq, {
    let removed = self.backend.remove(item);
    if removed {
      self.notify_not_full();
    }
    removed
  }

  /// Removes every element, returning the number removed.
  pub fn clear(&self) -> usize {
    let removed = self.backend.clear();
    self.notify_not_full();
    removed
  }

  /// Clones the head element without removing it.
  pub fn peek(&self) -> Option<T>
  where
    T: Clone, {
    self.backend.peek()
  }

  /// Indicates whether an element equal to `item` is stored.
  pub fn contains(&self, item: &T) -> bool
  where
    T: PartialEq, {
    self.backend.contains(item)
  }

  /// Copies the stored elements in queue order.
  pub fn snapshot(&self) -> Vec<T>
  where
    T: Clone, {
    self.backend.snapshot()
  }

  /// Returns the current number of stored elements.
  #[must_use]
  pub fn len(&self) -> usize {
    self.backend.len()
  }

  /// Indicates whether no element is stored.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.backend.is_empty()
  }

  /// Indicates whether the store is at capacity.
  #[must_use]
  pub fn is_full(&self) -> bool {
    self.backend.remaining_capacity() == 0
  }

  /// Returns the store's fixed capacity.
  #[must_use]
  pub fn capacity(&self) -> usize {
    self.backend.capacity()
  }

  /// Returns the number of slots still available.
  #[must_use]
  pub fn remaining_capacity(&self) -> usize {
    self.backend.remaining_capacity()
  }

  /// Remaining capacity the store must regain before the gate reopens.
  #[must_use]
  pub const fn capacity_threshold(&self) -> usize {
    self.gate.capacity_threshold()
  }

  /// Indicates whether the gate is currently latched closed.
  #[must_use]
  pub fn is_water_mark_reached(&self) -> bool {
    self.gate.is_closed()
  }

  /// Closes the queue and wakes every suspended producer and consumer.
  ///
  /// Pending [`put`](Self::put) and [`offer_timeout`](Self::offer_timeout)
  /// calls return [`QueueError::Closed`] with their element un-inserted;
  /// consumers keep draining the remaining elements. Idempotent.
  pub fn close(&self) {
    tracing::debug!(len = self.backend.len(), "closing water-marked queue");
    self.backend.close();
    self.notify_not_full();
  }

  /// Indicates whether [`close`](Self::close) has been called.
  #[must_use]
  pub fn is_closed(&self) -> bool {
    self.backend.is_closed()
  }

  fn wait_guard(&self) -> MutexGuard<'_, ()> {
    self.wait_lock.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Broadcasts to every suspended producer.
  ///
  /// All waiters are woken rather than a counted subset: how many slots a
  /// removal batch freed, and whose threshold it satisfies, is not knowable
  /// here, so each waiter re-runs one `offer` and re-waits on failure. Taking
  /// the wait lock orders the broadcast after any in-flight waiter's failed
  /// retry, so no wakeup is lost.
  fn notify_not_full(&self) {
    let _guard = self.wait_guard();
    self.not_full.notify_all();
  }
}

impl<T, B> fmt::Debug for WaterMarkedQueue<T, B>
where
  B: QueueBackend<T>,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WaterMarkedQueue")
      .field("len", &self.backend.len())
      .field("capacity", &self.backend.capacity())
      .field("capacity_threshold", &self.gate.capacity_threshold())
      .field("water_mark_reached", &self.gate.is_closed())
      .finish()
  }
}
