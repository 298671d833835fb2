//! Event publishing — the asynchronous, queue-backed broadcaster.
//!
//! ## Architecture
//!
//! ```text
//! producer threads                         delivery thread (one per service)
//! (command handlers)
//!        │ publish(event)
//!        ▼
//! ┌──────────────────┐   dequeue   ┌───────────────────────────────┐
//! │    EventQueue    │────────────►│         delivery loop          │
//! │ (bounded FIFO,   │             │  snapshot registry, then       │
//! │  blocks on full) │             │  on_event() per subscriber,    │
//! └──────────────────┘             │  in registration order         │
//!                                  └───────────────┬───────────────┘
//! ┌──────────────────────┐    snapshot()           │
//! │  SubscriberRegistry  │◄────────────────────────┘
//! │ (mutex'd ordered     │◄─── add/remove (any thread)
//! │  list)               │
//! └──────────────────────┘
//! ```
//!
//! [`EventPublisherService`] owns all three and exposes the start/stop
//! lifecycle; [`EventPublisher`] is the cloneable producer-facing handle.

mod error;
mod queue;
mod registry;
mod service;
mod subscriber;

pub use error::{PublishError, ServiceError};
pub use queue::{EventQueue, DEFAULT_QUEUE_CAPACITY};
pub use registry::SubscriberRegistry;
pub use service::{DeliveryStats, EventPublisher, EventPublisherService};
pub use subscriber::{EventSubscriber, SubscriberError};
