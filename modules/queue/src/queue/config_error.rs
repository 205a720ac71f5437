/// Errors raised while constructing a water-marked queue.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
  /// The requested low-water mark exceeds the remaining capacity the backing store reported
  /// at construction time.
  #[error("low-water mark {low_water_mark} exceeds remaining capacity {remaining_capacity}")]
  LowWaterMarkTooLarge {
    /// Requested low-water mark.
    low_water_mark:     usize,
    /// Remaining capacity reported by the backing store.
    remaining_capacity: usize,
  },
}
