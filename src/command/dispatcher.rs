//! In-memory command dispatcher.
//!
//! The dispatcher is the central endpoint that receives commands to be
//! executed by the domain. It routes each command to exactly one registered
//! handler, keyed by the command's concrete type, and invokes it
//! synchronously on the caller's thread — the dispatcher has no concurrency
//! of its own.
//!
//! ## Example
//!
//! ```
//! use cqrs_base::{Command, CommandDispatcher, HandlerError};
//!
//! #[derive(Debug)]
//! struct ConfirmOrder {
//!     id: String,
//! }
//!
//! impl Command for ConfirmOrder {}
//!
//! fn confirm_order(command: &ConfirmOrder) -> Result<(), HandlerError> {
//!     assert_eq!(command.id, "42");
//!     Ok(())
//! }
//!
//! let dispatcher = CommandDispatcher::new();
//! dispatcher.register_handler::<ConfirmOrder, _>(confirm_order).unwrap();
//! dispatcher.execute(&ConfirmOrder { id: "42".into() }).unwrap();
//! ```

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use super::{Command, CommandHandler, DispatchError, HandlerError};

type BoxedHandler = Box<dyn Fn(&dyn Any) -> Result<(), HandlerError> + Send + Sync>;

/// An in-memory command dispatcher backed by a map from command type to
/// handler.
///
/// At most one handler is registered per command type; registering a second
/// handler for the same type overwrites the first. The map is guarded by an
/// `RwLock` so registration may run concurrently with execution when the
/// dispatcher is shared across threads.
#[derive(Default)]
pub struct CommandDispatcher {
    handlers: RwLock<HashMap<TypeId, BoxedHandler>>,
}

impl CommandDispatcher {
    /// Create a dispatcher with no registered handlers.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a handler for the command type `C`.
    ///
    /// Overwrites any handler previously registered for `C`.
    pub fn register_handler<C, H>(&self, handler: H) -> Result<(), DispatchError>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let erased: BoxedHandler = Box::new(move |command: &dyn Any| {
            match command.downcast_ref::<C>() {
                Some(command) => handler.execute(command),
                // The map is keyed by TypeId::of::<C>() and execute() looks
                // up the same key, so a mismatch cannot be reached.
                None => Err(format!("command is not a {}", type_name::<C>()).into()),
            }
        });

        let mut handlers = self
            .handlers
            .write()
            .map_err(|_| DispatchError::LockPoisoned("register_handler"))?;
        handlers.insert(TypeId::of::<C>(), erased);
        debug!(command = type_name::<C>(), "registered command handler");
        Ok(())
    }

    /// Execute a command by routing it to its registered handler.
    ///
    /// Fails with [`DispatchError::NoHandlerRegistered`] when no handler is
    /// associated with `C`; otherwise the handler runs exactly once,
    /// synchronously, and any error it raises is propagated to the caller
    /// unmodified inside [`DispatchError::Handler`].
    pub fn execute<C: Command>(&self, command: &C) -> Result<(), DispatchError> {
        let handlers = self
            .handlers
            .read()
            .map_err(|_| DispatchError::LockPoisoned("execute"))?;

        let handler = handlers
            .get(&TypeId::of::<C>())
            .ok_or(DispatchError::NoHandlerRegistered(type_name::<C>()))?;

        handler(command).map_err(DispatchError::Handler)
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.read().map(|h| h.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[derive(Debug)]
    struct ConfirmOrder {
        id: String,
    }

    impl Command for ConfirmOrder {}

    #[derive(Debug)]
    struct CancelOrder;

    impl Command for CancelOrder {}

    struct CountingHandler {
        calls: Arc<AtomicUsize>,
    }

    impl CommandHandler<ConfirmOrder> for CountingHandler {
        fn execute(&self, command: &ConfirmOrder) -> Result<(), HandlerError> {
            assert_eq!(command.id, "42");
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn routes_command_to_registered_handler() {
        let dispatcher = CommandDispatcher::new();
        let calls = Arc::new(AtomicUsize::new(0));

        dispatcher
            .register_handler(CountingHandler {
                calls: Arc::clone(&calls),
            })
            .unwrap();

        dispatcher.execute(&ConfirmOrder { id: "42".into() }).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unregistered_command_fails() {
        let dispatcher = CommandDispatcher::new();
        let calls = Arc::new(AtomicUsize::new(0));
        dispatcher
            .register_handler(CountingHandler {
                calls: Arc::clone(&calls),
            })
            .unwrap();

        let err = dispatcher.execute(&CancelOrder).unwrap_err();
        assert!(matches!(err, DispatchError::NoHandlerRegistered(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn last_registration_wins() {
        let dispatcher = CommandDispatcher::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        dispatcher
            .register_handler(CountingHandler {
                calls: Arc::clone(&first),
            })
            .unwrap();
        dispatcher
            .register_handler(CountingHandler {
                calls: Arc::clone(&second),
            })
            .unwrap();
        assert_eq!(dispatcher.handler_count(), 1);

        dispatcher.execute(&ConfirmOrder { id: "42".into() }).unwrap();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handler_error_propagates_to_caller() {
        struct RejectingHandler;

        impl CommandHandler<ConfirmOrder> for RejectingHandler {
            fn execute(&self, _command: &ConfirmOrder) -> Result<(), HandlerError> {
                Err("order already shipped".into())
            }
        }

        let dispatcher = CommandDispatcher::new();
        dispatcher.register_handler(RejectingHandler).unwrap();

        let err = dispatcher.execute(&ConfirmOrder { id: "42".into() }).unwrap_err();
        match err {
            DispatchError::Handler(e) => assert_eq!(e.to_string(), "order already shipped"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
