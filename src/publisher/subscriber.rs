//! Event subscriber contract.

use crate::Event;

/// Error returned by a subscriber's event callback.
///
/// Opaque to the delivery loop: a failing subscriber is logged and counted,
/// and delivery continues with the remaining subscribers.
pub type SubscriberError = Box<dyn std::error::Error + Send + Sync>;

/// A subscriber is notified of every event published through the publisher
/// it is registered with.
///
/// `on_event` is invoked synchronously by the delivery loop, once per
/// delivered event, in registration order. The publisher enforces no
/// timeout — a callback that blocks indefinitely stalls delivery to every
/// subscriber, so keep it short and hand long work off elsewhere.
pub trait EventSubscriber: Send + Sync {
    /// Handle one delivered event.
    fn on_event(&self, event: &dyn Event) -> Result<(), SubscriberError>;
}
