//! Service error types.

use common::OrderId;
use domain::ValidationError;
use store::RepositoryError;
use thiserror::Error;

/// Errors returned by [`OrderService`](crate::OrderService).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Input violates an order invariant. Nothing was persisted.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The referenced order does not exist.
    #[error("Order {order_id} not found")]
    NotFound { order_id: OrderId },

    /// Storage failed and the operation was rolled back.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl ServiceError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation",
            ServiceError::NotFound { .. } => "not_found",
            ServiceError::Persistence(_) => "persistence",
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(order_id) => ServiceError::NotFound { order_id },
            RepositoryError::Persistence(message) => ServiceError::Persistence(message),
        }
    }
}
