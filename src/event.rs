//! Base contract for domain events.
//!
//! An event is the record of a state change that already happened. It is
//! named with a past-participle verb (`OrderConfirmed`, `PaymentSucceeded`)
//! and carries only the data needed to qualify the change. Events are
//! immutable by convention: subscribers receive `&dyn Event` and never
//! mutate it.
//!
//! ## Example
//!
//! ```
//! use cqrs_base::Event;
//!
//! #[derive(Debug)]
//! struct OrderConfirmed {
//!     pub id: String,
//! }
//!
//! impl Event for OrderConfirmed {}
//! ```

use std::any::Any;
use std::fmt::Debug;

/// Marker trait for domain events.
///
/// The concrete type is the event's identity — there are no shared fields.
/// Events travel through the publisher as `Arc<dyn Event>` so the queue and
/// an aggregate's uncommitted list can share one allocation.
pub trait Event: Any + Send + Sync + Debug {}

impl dyn Event {
    /// Downcast a delivered event to its concrete type.
    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        (self as &dyn Any).downcast_ref::<E>()
    }

    /// Check whether this event is of the given concrete type.
    pub fn is<E: Event>(&self) -> bool {
        (self as &dyn Any).is::<E>()
    }
}
