//! Hysteresis-based backpressure for bounded blocking queues.
//!
//! A plain bounded queue that hovers one element below capacity makes producers
//! oscillate rapidly between blocked and unblocked. [`WaterMarkedQueue`] wraps a
//! bounded blocking store and adds a two-state gate: once the store rejects an
//! insert for lack of space the gate latches closed, and producers are admitted
//! again only after remaining capacity has recovered to a threshold derived from
//! the caller's low-water mark.
//!
//! ```
//! use floodgate_queue_rs::{QueueError, WaterMarkedQueue};
//!
//! // Capacity 5, low-water mark 3: the gate reopens once 2 slots are free.
//! let queue = WaterMarkedQueue::bounded(5, 3).unwrap();
//! for n in 1..=5 {
//!   queue.offer(n).unwrap();
//! }
//! assert!(matches!(queue.offer(6), Err(QueueError::Full(6))));
//! assert_eq!(queue.poll(), Some(1));
//! // One freed slot is below the threshold; the gate stays closed.
//! assert!(matches!(queue.offer(6), Err(QueueError::Full(6))));
//! assert_eq!(queue.poll(), Some(2));
//! queue.offer(6).unwrap();
//! ```

pub mod queue;

pub use queue::{ConfigError, QueueBackend, QueueError, VecDequeBackend, WaterMarkGate, WaterMarkedQueue};
