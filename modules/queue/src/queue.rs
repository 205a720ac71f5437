//! Water-marked queue decorator, its backend contract, and the default store.

pub mod backend;
pub mod config_error;
pub mod queue_error;
pub mod water_mark_gate;
pub mod water_marked_queue;

pub use backend::{QueueBackend, VecDequeBackend};
pub use config_error::ConfigError;
pub use queue_error::QueueError;
pub use water_mark_gate::WaterMarkGate;
pub use water_marked_queue::WaterMarkedQueue;
