//! Command side — base contracts and the in-memory dispatcher.
//!
//! A command expresses the intent to change domain state and is executed by
//! exactly one handler. The [`CommandDispatcher`] is the synchronous router
//! between the two.

mod command;
mod dispatcher;
mod error;
mod handler;

pub use command::Command;
pub use dispatcher::CommandDispatcher;
pub use error::DispatchError;
pub use handler::{CommandHandler, HandlerError};
