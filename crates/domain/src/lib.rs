//! Domain layer for the order service.
//!
//! This crate provides the order aggregate and its invariants:
//! - `NewOrder` / `NewLineItem` for orders that have not been persisted yet
//! - `Order` / `LineItem` for persisted orders with storage-assigned ids
//! - `ValidationError` naming the first invariant an input violates
//! - `CreateOrder` / `UpdateOrder` commands consumed by the service layer
//!
//! Nothing here performs I/O.

pub mod error;
pub mod order;

pub use common::{LineItemId, Money, OrderId};
pub use error::ValidationError;
pub use order::{
    CreateOrder, LineItem, MAX_CUSTOMER_LEN, MAX_PRODUCT_LEN, MAX_QUANTITY, MAX_UNIT_PRICE,
    NewLineItem, NewOrder, Order, UpdateOrder,
};
