//! Service layer for the order service.
//!
//! `OrderService` enforces the business rules on top of any
//! [`OrderRepository`](store::OrderRepository) and turns repository
//! outcomes into [`ServiceError`]s.

pub mod error;
pub mod order_service;

pub use error::ServiceError;
pub use order_service::OrderService;
