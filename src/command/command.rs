//! Base contract for commands.

use std::any::Any;
use std::fmt::Debug;

/// Marker trait for commands.
///
/// A command is a message to the domain to get something changed. It is
/// named with a verb in the imperative mood (`ConfirmOrder`, `CancelOrder`);
/// the concrete type carries the intention, the fields carry the request
/// data. Commands are immutable by convention — handlers receive `&C`.
///
/// The concrete type is also the routing key: the dispatcher associates at
/// most one handler with each command type.
///
/// ## Example
///
/// ```
/// use cqrs_base::Command;
///
/// #[derive(Debug)]
/// struct ConfirmOrder {
///     pub id: String,
/// }
///
/// impl Command for ConfirmOrder {}
/// ```
pub trait Command: Any + Send + Sync + Debug {}
