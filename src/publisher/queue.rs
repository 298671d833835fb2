//! Bounded blocking event queue.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use super::PublishError;
use crate::Event;

/// Default queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Bounded FIFO buffer between event producers and the delivery loop.
///
/// The capacity bound exists to apply back-pressure: when the queue is full,
/// [`enqueue`](EventQueue::enqueue) blocks the producer until the delivery
/// loop makes room. Events are never dropped and never reordered — delivery
/// order is queue order across all producers.
///
/// Safe for concurrent producers and a single consumer; all waiting goes
/// through one mutex and two condition variables.
pub struct EventQueue {
    items: Mutex<VecDeque<Arc<dyn Event>>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    /// Create a queue with the default capacity of 1024 events.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Create a queue holding at most `capacity` undelivered events.
    ///
    /// A capacity of 0 is raised to 1 — a queue that can never accept an
    /// event would block every producer forever.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        }
    }

    /// Append an event, blocking while the queue is full.
    ///
    /// A full queue is back-pressure, not an error; the only failure is a
    /// poisoned queue lock.
    pub fn enqueue(&self, event: Arc<dyn Event>) -> Result<(), PublishError> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| PublishError::QueueUnavailable("enqueue"))?;

        while items.len() >= self.capacity {
            items = self
                .not_full
                .wait(items)
                .map_err(|_| PublishError::QueueUnavailable("enqueue"))?;
        }

        items.push_back(event);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove the oldest event, waiting up to `timeout` while the queue is
    /// empty.
    ///
    /// Returns `Ok(None)` when the timeout elapses with no event. The
    /// delivery loop uses the timeout as its cancellation check interval.
    pub fn dequeue_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Option<Arc<dyn Event>>, PublishError> {
        let deadline = Instant::now() + timeout;
        let mut items = self
            .items
            .lock()
            .map_err(|_| PublishError::QueueUnavailable("dequeue"))?;

        loop {
            if let Some(event) = items.pop_front() {
                self.not_full.notify_one();
                return Ok(Some(event));
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }

            let (guard, _timed_out) = self
                .not_empty
                .wait_timeout(items, deadline - now)
                .map_err(|_| PublishError::QueueUnavailable("dequeue"))?;
            items = guard;
        }
    }

    /// Number of undelivered events.
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    /// Whether the queue holds no undelivered events.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of undelivered events.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
