use std::{sync::Arc, thread, time::Duration};

use super::*;

#[test]
fn offer_and_poll_roundtrip() {
  let backend = VecDequeBackend::new(4);

  backend.try_offer(1).unwrap();
  backend.try_offer(2).unwrap();
  assert_eq!(backend.len(), 2);
  assert_eq!(backend.try_poll(), Some(1));
  assert_eq!(backend.try_poll(), Some(2));
  assert_eq!(backend.try_poll(), None);
}

#[test]
fn full_store_returns_the_rejected_item() {
  let backend = VecDequeBackend::new(2);

  backend.try_offer(10).unwrap();
  backend.try_offer(20).unwrap();
  assert!(matches!(backend.try_offer(30), Err(QueueError::Full(30))));
  assert_eq!(backend.len(), 2);
  assert_eq!(backend.remaining_capacity(), 0);
}

#[test]
fn closed_store_rejects_offer_and_drains_then_disconnects() {
  let backend = VecDequeBackend::new(2);

  backend.try_offer(1).unwrap();
  backend.close();
  assert!(backend.is_closed());
  assert!(matches!(backend.try_offer(2), Err(QueueError::Closed(2))));
  assert_eq!(backend.poll_blocking().unwrap(), 1);
  assert!(matches!(backend.poll_blocking(), Err(QueueError::Disconnected)));
}

#[test]
fn close_is_idempotent() {
  let backend: VecDequeBackend<i32> = VecDequeBackend::new(1);
  backend.close();
  backend.close();
  assert!(backend.is_closed());
}

#[test]
fn poll_timeout_expires_empty_handed() {
  let backend: VecDequeBackend<i32> = VecDequeBackend::new(1);
  let polled = backend.poll_timeout(Duration::from_millis(20)).unwrap();
  assert_eq!(polled, None);
}

#[test]
fn poll_timeout_with_unbounded_duration_waits_for_offer() {
  let backend = Arc::new(VecDequeBackend::new(1));
  let consumer = {
    let backend = Arc::clone(&backend);
    thread::spawn(move || backend.poll_timeout(Duration::MAX))
  };

  thread::sleep(Duration::from_millis(20));
  backend.try_offer(42).unwrap();
  assert_eq!(consumer.join().unwrap().unwrap(), Some(42));
}

#[test]
fn poll_blocking_wakes_on_offer() {
  let backend = Arc::new(VecDequeBackend::new(1));
  let consumer = {
    let backend = Arc::clone(&backend);
    thread::spawn(move || backend.poll_blocking())
  };

  thread::sleep(Duration::from_millis(20));
  backend.try_offer(99).unwrap();
  assert_eq!(consumer.join().unwrap().unwrap(), 99);
}

#[test]
fn poll_blocking_wakes_on_close() {
  let backend: Arc<VecDequeBackend<i32>> = Arc::new(VecDequeBackend::new(1));
  let consumer = {
    let backend = Arc::clone(&backend);
    thread::spawn(move || backend.poll_blocking())
  };

  thread::sleep(Duration::from_millis(20));
  backend.close();
  assert!(matches!(consumer.join().unwrap(), Err(QueueError::Disconnected)));
}

#[test]
fn drain_moves_in_queue_order() {
  let backend = VecDequeBackend::new(4);
  for n in 1..=4 {
    backend.try_offer(n).unwrap();
  }

  let mut sink = Vec::new();
  assert_eq!(backend.drain(&mut sink, Some(2)), 2);
  assert_eq!(sink, vec![1, 2]);
  assert_eq!(backend.drain(&mut sink, None), 2);
  assert_eq!(sink, vec![1, 2, 3, 4]);
  assert!(backend.is_empty());
}

#[test]
fn retain_reports_removed_count() {
  let backend = VecDequeBackend::new(5);
  for n in 1..=5 {
    backend.try_offer(n).unwrap();
  }

  assert_eq!(backend.retain(|n| n % 2 == 0), 3);
  assert_eq!(backend.snapshot(), vec![2, 4]);
}

#[test]
fn remove_takes_first_occurrence_only() {
  let backend = VecDequeBackend::new(4);
  backend.try_offer(7).unwrap();
  backend.try_offer(8).unwrap();
  backend.try_offer(7).unwrap();

  assert!(backend.remove(&7));
  assert_eq!(backend.snapshot(), vec![8, 7]);
  assert!(!backend.remove(&9));
}

#[test]
fn contains_and_peek_do_not_consume() {
  let backend = VecDequeBackend::new(2);
  backend.try_offer(5).unwrap();

  assert!(backend.contains(&5));
  assert_eq!(backend.peek(), Some(5));
  assert_eq!(backend.len(), 1);
}

#[test]
fn clear_reports_removed_count() {
  let backend = VecDequeBackend::new(3);
  backend.try_offer(1).unwrap();
  backend.try_offer(2).unwrap();

  assert_eq!(backend.clear(), 2);
  assert!(backend.is_empty());
  assert_eq!(backend.remaining_capacity(), 3);
}
