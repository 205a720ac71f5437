//! Backend contract for the bounded blocking store a decorator wraps.

pub mod queue_backend;
pub mod vec_deque_backend;

pub use queue_backend::QueueBackend;
pub use vec_deque_backend::VecDequeBackend;
