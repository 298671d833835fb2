//! Root aggregate base type.

mod root;

pub use root::RootAggregate;
