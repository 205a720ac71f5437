use core::fmt;

/// Errors that occur during water-marked queue operations.
///
/// Variants produced by a failed insert carry the rejected element back to the
/// caller so nothing is silently dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueError<T> {
  /// The store is at capacity and the hysteresis gate has not reopened. Contains the element
  /// that was attempted to be added.
  Full(T),
  /// A timed insert expired before enough capacity was recovered. Contains the element that
  /// was attempted to be added; nothing was inserted.
  TimedOut(T),
  /// The queue was closed, either before the insert or while the caller was suspended waiting
  /// for capacity. Contains the element that was attempted to be added.
  Closed(T),
  /// The store is no longer usable on the consumer side: it is closed and fully drained.
  Disconnected,
}

impl<T> QueueError<T> {
  /// Extracts the payload carried by variants that preserve the element on failure.
  #[must_use]
  pub fn into_item(self) -> Option<T> {
    match self {
      | Self::Full(item) | Self::TimedOut(item) | Self::Closed(item) => Some(item),
      | Self::Disconnected => None,
    }
  }
}

impl<T> fmt::Display for QueueError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::Full(_) => f.write_str("queue is full"),
      | Self::TimedOut(_) => f.write_str("timed out waiting for queue capacity"),
      | Self::Closed(_) => f.write_str("queue is closed"),
      | Self::Disconnected => f.write_str("queue is closed and drained"),
    }
  }
}

impl<T: fmt::Debug> std::error::Error for QueueError<T> {}
