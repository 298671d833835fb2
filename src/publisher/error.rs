//! Error types for event publishing and publisher lifecycle.

use std::error::Error;
use std::fmt;

/// Error type for publish operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// The event queue lock was poisoned and the queue can no longer be used.
    QueueUnavailable(&'static str),
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::QueueUnavailable(operation) => {
                write!(f, "event queue unavailable during {}", operation)
            }
        }
    }
}

impl Error for PublishError {}

/// Error type for publisher lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// `start()` was called on a publisher that is already running.
    AlreadyRunning,
    /// `stop()` was called on a publisher that is not running.
    NotRunning,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::AlreadyRunning => write!(f, "publisher is already started"),
            ServiceError::NotRunning => write!(f, "publisher is not started"),
        }
    }
}

impl Error for ServiceError {}
