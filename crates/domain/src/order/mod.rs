//! Order aggregate and related types.

mod aggregate;
mod commands;
mod value_objects;

pub use aggregate::{LineItem, Order};
pub use commands::{CreateOrder, UpdateOrder};
pub use value_objects::{
    MAX_CUSTOMER_LEN, MAX_PRODUCT_LEN, MAX_QUANTITY, MAX_UNIT_PRICE, NewLineItem, NewOrder,
};

pub(crate) use value_objects::validate_customer;
