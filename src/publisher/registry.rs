//! Registry of event subscribers.

use std::sync::{Arc, Mutex};

use tracing::debug;

use super::EventSubscriber;

/// Ordered, mutable set of event subscribers.
///
/// Insertion order determines delivery order. The same subscriber may be
/// added more than once; it then receives every event once per
/// registration. Mutation and the delivery loop's read are serialized on a
/// single mutex: the loop takes a [`snapshot`](SubscriberRegistry::snapshot)
/// before each fan-out, so an `add` or `remove` takes effect for the next
/// dequeued event, never for a delivery already in progress.
#[derive(Default)]
pub struct SubscriberRegistry {
    subscribers: Mutex<Vec<Arc<dyn EventSubscriber>>>,
}

impl SubscriberRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subscriber to the registry.
    pub fn add(&self, subscriber: Arc<dyn EventSubscriber>) {
        let mut subscribers = self.lock();
        subscribers.push(subscriber);
        debug!(count = subscribers.len(), "added subscriber");
    }

    /// Remove the first registration of the given subscriber.
    ///
    /// Matching is by pointer identity. A no-op when the subscriber is not
    /// registered; a subscriber registered twice keeps its other
    /// registration.
    pub fn remove(&self, subscriber: &Arc<dyn EventSubscriber>) {
        let mut subscribers = self.lock();
        if let Some(index) = subscribers
            .iter()
            .position(|s| Arc::ptr_eq(s, subscriber))
        {
            subscribers.remove(index);
            debug!(count = subscribers.len(), "removed subscriber");
        }
    }

    /// Atomically copy the current subscriber list, in registration order.
    pub fn snapshot(&self) -> Vec<Arc<dyn EventSubscriber>> {
        self.lock().clone()
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the registry has no registrations.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Arc<dyn EventSubscriber>>> {
        // No lock is held while subscriber callbacks run, so a poisoning
        // panic cannot leave the list half-mutated; recover the guard.
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
