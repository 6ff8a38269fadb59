use thiserror::Error;

use crate::OrderId;

/// Errors raised by order repositories.
///
/// Storage driver errors are flattened to a message so callers never see
/// driver-specific types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// A storage operation failed; its unit of work was rolled back.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The order targeted by a write does not exist.
    #[error("Order not found: {0}")]
    NotFound(OrderId),
}

impl RepositoryError {
    /// Builds a persistence error from the failing step and its cause.
    pub fn persistence(operation: &str, cause: impl std::fmt::Display) -> Self {
        RepositoryError::Persistence(format!("failed to {operation}: {cause}"))
    }

    /// Returns true when storage itself failed, as opposed to the target
    /// order being absent.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, RepositoryError::Persistence(_))
    }
}

/// Logs a discarded unit of work.
///
/// Only storage failures count as rollbacks; a missing order is an ordinary
/// outcome and is logged at debug.
pub(crate) fn record_discard(operation: &'static str, err: &RepositoryError) {
    if err.is_storage_failure() {
        tracing::warn!(operation, error = %err, "unit of work rolled back");
        metrics::counter!("repository_rollbacks_total").increment(1);
    } else {
        tracing::debug!(operation, error = %err, "unit of work discarded");
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Persistence(format!("database error: {err}"))
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
