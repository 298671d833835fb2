//! Command handler contract.

use super::Command;

/// Error returned by a command handler.
///
/// Handlers fail for domain reasons the dispatcher knows nothing about, so
/// the error is opaque — the dispatcher propagates it to the caller
/// unmodified, with no retry and no swallowing.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A command handler executes commands of a single concrete type.
///
/// A handler typically loads the affected root aggregate, calls business
/// methods on it, publishes the resulting events and commits them:
///
/// ```ignore
/// struct ConfirmOrderHandler {
///     publisher: EventPublisher,
/// }
///
/// impl CommandHandler<ConfirmOrder> for ConfirmOrderHandler {
///     fn execute(&self, command: &ConfirmOrder) -> Result<(), HandlerError> {
///         let mut order = self.repository.find(&command.id)?;
///         order.confirm();
///
///         self.publisher.publish_all(order.uncommitted_events())?;
///         order.commit();
///         Ok(())
///     }
/// }
/// ```
pub trait CommandHandler<C: Command>: Send + Sync {
    /// Execute the command.
    fn execute(&self, command: &C) -> Result<(), HandlerError>;
}

/// Plain functions and closures with a matching signature are handlers.
impl<C, F> CommandHandler<C> for F
where
    C: Command,
    F: Fn(&C) -> Result<(), HandlerError> + Send + Sync,
{
    fn execute(&self, command: &C) -> Result<(), HandlerError> {
        self(command)
    }
}
