//! Error types for command dispatch.

use std::error::Error;
use std::fmt;

use super::HandlerError;

/// Error type for dispatch operations.
#[derive(Debug)]
pub enum DispatchError {
    /// No handler is registered for this command type.
    NoHandlerRegistered(&'static str),
    /// The handler rejected or failed to execute the command.
    Handler(HandlerError),
    /// The handler registry lock was poisoned.
    LockPoisoned(&'static str),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NoHandlerRegistered(command) => {
                write!(f, "no command handler registered for command {}", command)
            }
            DispatchError::Handler(e) => write!(f, "command handler failed: {}", e),
            DispatchError::LockPoisoned(operation) => {
                write!(f, "handler registry lock poisoned during {}", operation)
            }
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DispatchError::Handler(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
