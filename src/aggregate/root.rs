//! Uncommitted-event bookkeeping for root aggregates.

use std::sync::Arc;

use crate::Event;

/// Event bookkeeping shared by all root aggregates.
///
/// A root aggregate is the consistency boundary of an object tree. When an
/// executed command changes its state, the aggregate records a domain event
/// as the observable result of that change. Embed a `RootAggregate` in your
/// aggregate type to get the uncommitted-event list:
///
/// ```
/// use cqrs_base::{Event, RootAggregate};
///
/// #[derive(Debug)]
/// struct OrderConfirmed {
///     id: String,
/// }
///
/// impl Event for OrderConfirmed {}
///
/// #[derive(Default)]
/// struct Order {
///     root: RootAggregate,
///     confirmed: bool,
/// }
///
/// impl Order {
///     fn confirm(&mut self, id: &str) {
///         self.confirmed = true;
///         self.root.record(OrderConfirmed { id: id.into() });
///     }
/// }
///
/// let mut order = Order::default();
/// order.confirm("42");
/// assert_eq!(order.root.uncommitted_events().len(), 1);
/// order.root.commit();
/// assert!(order.root.uncommitted_events().is_empty());
/// ```
///
/// The list is append-only between commits and reflects only the changes
/// since the last commit. A command handler typically publishes
/// `uncommitted_events()` after the business methods succeed, then calls
/// [`commit`](RootAggregate::commit).
#[derive(Debug, Default, Clone)]
pub struct RootAggregate {
    events: Vec<Arc<dyn Event>>,
}

impl RootAggregate {
    /// Create an aggregate root with no uncommitted events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a domain event representing a state change of this aggregate.
    pub fn record<E: Event>(&mut self, event: E) {
        self.events.push(Arc::new(event));
    }

    /// The state changes recorded since the last commit, in order.
    pub fn uncommitted_events(&self) -> &[Arc<dyn Event>] {
        &self.events
    }

    /// Commit the recorded state changes, clearing the list.
    ///
    /// Called after the events have been handed to a publisher.
    pub fn commit(&mut self) {
        self.events.clear();
    }
}
