use core::sync::atomic::{AtomicBool, Ordering};


/// Two-state hysteresis gate deciding whether insertion attempts may proceed.
///
/// The gate starts open and behaves as if it were not there: attempts go
/// straight to the store. It latches closed when the store rejects an insert
/// for lack of space, and reopens only once an insert succeeds while remaining
/// capacity has recovered to the threshold.
///
/// The flag is a fast-path hint, not a lock-protected invariant. Readers may
/// observe a stale value; the closed path always revalidates against the
/// store's live remaining capacity, so staleness costs at most one extra
/// rejected attempt and never an incorrect acceptance.
#[derive(Debug)]
pub struct WaterMarkGate {
  capacity_threshold: usize,
  water_mark_reached: AtomicBool,
}

impl WaterMarkGate {
  /// Creates an open gate with the given reopening threshold.
  #[must_use]
  pub const fn new(capacity_threshold: usize) -> Self {
    Self { capacity_threshold, water_mark_reached: AtomicBool::new(false) }
  }

  /// Remaining capacity the store must regain before the gate reopens.
  #[must_use]
  pub const fn capacity_threshold(&self) -> usize {
    self.capacity_threshold
  }

  /// Indicates whether the high-water mark has been reached and not yet recovered from.
  #[must_use]
  pub fn is_closed(&self) -> bool {
    self.water_mark_reached.load(Ordering::Acquire)
  }

  /// Latches the gate closed after the store rejected an insert for lack of space.
  pub fn latch_closed(&self) {
    self.water_mark_reached.store(true, Ordering::Release);
    tracing::trace!(capacity_threshold = self.capacity_threshold, "high-water mark reached, gate closed");
  }

  /// Reopens the gate after an insert succeeded in the closed state.
  pub fn reopen(&self) {
    self.water_mark_reached.store(false, Ordering::Release);
    tracing::trace!("gate reopened");
  }

  /// Closed-state admission check against the store's live remaining capacity.
  ///
  /// A threshold of zero admits on any re-check, which disables hysteresis and
  /// degrades to plain bounded-queue backpressure.
  #[must_use]
  pub fn admits(&self, remaining_capacity: usize) -> bool {
    remaining_capacity >= self.capacity_threshold
  }
}
