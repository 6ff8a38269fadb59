//! Shared types for the order service workspace.

pub mod money;
pub mod types;

pub use money::Money;
pub use types::{LineItemId, OrderId};
