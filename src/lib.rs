mod aggregate;
mod command;
mod event;
mod publisher;

pub use aggregate::RootAggregate;
pub use command::{Command, CommandDispatcher, CommandHandler, DispatchError, HandlerError};
pub use event::Event;
pub use publisher::{
    DeliveryStats, EventPublisher, EventPublisherService, EventQueue, EventSubscriber,
    PublishError, ServiceError, SubscriberError, SubscriberRegistry, DEFAULT_QUEUE_CAPACITY,
};
