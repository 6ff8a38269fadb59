use async_trait::async_trait;
use domain::{NewOrder, Order};

use crate::{OrderId, Result};

/// Persistence boundary for order aggregates.
///
/// Every method is its own unit of work: it either commits all of its
/// writes or rolls all of them back and returns
/// [`RepositoryError::Persistence`](crate::RepositoryError::Persistence).
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts an order and all of its items atomically.
    ///
    /// Returns the stored order with generated ids and, if the input had
    /// none, the defaulted order date.
    async fn create(&self, order: NewOrder) -> Result<Order>;

    /// Loads an order with its items.
    ///
    /// Returns None if the order doesn't exist; absence is not a failure
    /// at this layer.
    async fn read_by_id(&self, order_id: OrderId) -> Result<Option<Order>>;

    /// Loads every order, ascending by id.
    async fn read_all(&self) -> Result<Vec<Order>>;

    /// Persists the customer and date of an already loaded order as given.
    ///
    /// Items are never touched. Fails with `NotFound` if the order no
    /// longer exists.
    async fn update(&self, order: &Order) -> Result<Order>;

    /// Deletes an order and all of its items.
    ///
    /// Fails with `NotFound` if there is no such order.
    async fn delete(&self, order_id: OrderId) -> Result<()>;
}
