//! Order service providing the business API for order operations.

use common::OrderId;
use domain::{CreateOrder, NewOrder, Order, UpdateOrder};
use store::OrderRepository;

use crate::error::ServiceError;

fn record_error(err: &ServiceError) {
    metrics::counter!("order_service_errors_total", "kind" => err.kind()).increment(1);
}

/// Service for managing orders.
///
/// Validates input before any storage call, converts "no such order" into
/// [`ServiceError::NotFound`], and passes every other repository failure
/// through. No error is swallowed.
pub struct OrderService<R: OrderRepository> {
    repository: R,
}

impl<R: OrderRepository> OrderService<R> {
    /// Creates a new order service over the given repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Creates an order with its items in one unit of work.
    ///
    /// Fails with `Validation` before touching storage if the customer is
    /// blank, the item list is empty, or any item is invalid.
    #[tracing::instrument(skip(self, cmd), fields(items = cmd.items.len()))]
    pub async fn create_order(&self, cmd: CreateOrder) -> Result<Order, ServiceError> {
        self.insert(cmd).await.inspect_err(record_error)
    }

    /// Loads an order by ID.
    ///
    /// Fails with `NotFound` if the order doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn read_order_by_id(&self, order_id: OrderId) -> Result<Order, ServiceError> {
        self.load(order_id).await.inspect_err(record_error)
    }

    /// Loads every order, ascending by id.
    #[tracing::instrument(skip(self))]
    pub async fn read_all_orders(&self) -> Result<Vec<Order>, ServiceError> {
        self.repository
            .read_all()
            .await
            .map_err(ServiceError::from)
            .inspect_err(record_error)
    }

    /// Applies a partial update: only supplied fields change.
    ///
    /// The order is fetched, the supplied fields are applied, and the result
    /// is persisted. An update with no fields still round-trips through
    /// storage and returns the current order unchanged.
    #[tracing::instrument(skip(self, cmd), fields(order_id = %cmd.order_id))]
    pub async fn update_order(&self, cmd: UpdateOrder) -> Result<Order, ServiceError> {
        self.apply_update(cmd).await.inspect_err(record_error)
    }

    /// Deletes an order and all of its items.
    ///
    /// Fails with `NotFound` if there is no such order.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order(&self, order_id: OrderId) -> Result<(), ServiceError> {
        self.remove(order_id).await.inspect_err(record_error)
    }

    async fn insert(&self, cmd: CreateOrder) -> Result<Order, ServiceError> {
        let new_order = NewOrder::new(cmd.customer, cmd.order_date, cmd.items)?;
        let order = self.repository.create(new_order).await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %order.id(), total = %order.total(), "order created");
        Ok(order)
    }

    async fn apply_update(&self, cmd: UpdateOrder) -> Result<Order, ServiceError> {
        let mut order = self.load(cmd.order_id).await?;

        if let Some(customer) = cmd.customer.as_deref() {
            order.rename_customer(customer)?;
        }
        if let Some(order_date) = cmd.order_date {
            order.reschedule(order_date);
        }

        let order = self.repository.update(&order).await?;

        metrics::counter!("orders_updated_total").increment(1);
        tracing::info!(order_id = %order.id(), "order updated");
        Ok(order)
    }

    async fn remove(&self, order_id: OrderId) -> Result<(), ServiceError> {
        self.repository.delete(order_id).await?;

        metrics::counter!("orders_deleted_total").increment(1);
        tracing::info!(%order_id, "order deleted");
        Ok(())
    }

    async fn load(&self, order_id: OrderId) -> Result<Order, ServiceError> {
        self.repository
            .read_by_id(order_id)
            .await?
            .ok_or(ServiceError::NotFound { order_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use common::Money;
    use domain::{NewLineItem, ValidationError};
    use store::{InMemoryOrderRepository, StorageOp};

    fn create_service() -> OrderService<InMemoryOrderRepository> {
        OrderService::new(InMemoryOrderRepository::new())
    }

    fn widget_order(customer: &str) -> CreateOrder {
        CreateOrder::new(
            customer,
            vec![NewLineItem::new("Widget", 2, Money::from_cents(999))],
        )
    }

    #[tokio::test]
    async fn test_create_order() {
        let service = create_service();

        let order = service.create_order(widget_order("Alice")).await.unwrap();

        assert_eq!(order.customer(), "Alice");
        assert_eq!(order.item_count(), 1);
        assert_eq!(order.total().cents(), 1998);
    }

    #[tokio::test]
    async fn test_create_order_with_date() {
        let service = create_service();
        let date = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();

        let order = service
            .create_order(widget_order("Alice").with_date(date))
            .await
            .unwrap();

        assert_eq!(order.order_date(), date);
    }

    #[tokio::test]
    async fn test_create_order_rejects_invalid_item() {
        let service = create_service();
        let cmd = CreateOrder::new(
            "Alice",
            vec![NewLineItem::new("Widget", 0, Money::from_cents(999))],
        );

        let err = service.create_order(cmd).await.unwrap_err();

        assert_eq!(
            err,
            ServiceError::Validation(ValidationError::InvalidQuantity {
                index: 0,
                quantity: 0
            })
        );
        assert_eq!(service.repository().order_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_order_propagates_persistence_error() {
        let service = create_service();
        service
            .repository()
            .fail_on(StorageOp::InsertOrder, 0)
            .await;

        let err = service.create_order(widget_order("Alice")).await.unwrap_err();

        assert!(matches!(err, ServiceError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_read_order_by_id() {
        let service = create_service();
        let created = service.create_order(widget_order("Alice")).await.unwrap();

        let loaded = service.read_order_by_id(created.id()).await.unwrap();

        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn test_read_missing_order_is_not_found() {
        let service = create_service();

        let err = service.read_order_by_id(OrderId::new(1)).await.unwrap_err();

        assert_eq!(
            err,
            ServiceError::NotFound {
                order_id: OrderId::new(1)
            }
        );
    }

    #[tokio::test]
    async fn test_update_customer_only() {
        let service = create_service();
        let created = service.create_order(widget_order("Alice")).await.unwrap();

        let updated = service
            .update_order(UpdateOrder::new(created.id()).customer("Bob"))
            .await
            .unwrap();

        assert_eq!(updated.customer(), "Bob");
        assert_eq!(updated.order_date(), created.order_date());
        assert_eq!(updated.items(), created.items());
    }

    #[tokio::test]
    async fn test_update_rejects_blank_customer() {
        let service = create_service();
        let created = service.create_order(widget_order("Alice")).await.unwrap();

        let err = service
            .update_order(UpdateOrder::new(created.id()).customer("  "))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ServiceError::Validation(ValidationError::CustomerRequired)
        );
        let stored = service.read_order_by_id(created.id()).await.unwrap();
        assert_eq!(stored.customer(), "Alice");
    }

    #[tokio::test]
    async fn test_update_missing_order_is_not_found() {
        let service = create_service();

        let err = service
            .update_order(UpdateOrder::new(OrderId::new(5)).customer("Bob"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ServiceError::NotFound {
                order_id: OrderId::new(5)
            }
        );
    }

    #[tokio::test]
    async fn test_update_propagates_persistence_error() {
        let service = create_service();
        let created = service.create_order(widget_order("Alice")).await.unwrap();
        service
            .repository()
            .fail_on(StorageOp::UpdateOrder, 0)
            .await;

        let err = service
            .update_order(UpdateOrder::new(created.id()).customer("Bob"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Persistence(_)));
        let stored = service.read_order_by_id(created.id()).await.unwrap();
        assert_eq!(stored.customer(), "Alice");
    }

    #[tokio::test]
    async fn test_delete_order() {
        let service = create_service();
        let created = service.create_order(widget_order("Alice")).await.unwrap();

        service.delete_order(created.id()).await.unwrap();

        assert!(service.read_all_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_propagates_persistence_error() {
        let service = create_service();
        let created = service.create_order(widget_order("Alice")).await.unwrap();
        service
            .repository()
            .fail_on(StorageOp::DeleteOrder, 0)
            .await;

        let err = service.delete_order(created.id()).await.unwrap_err();

        assert!(matches!(err, ServiceError::Persistence(_)));
        assert_eq!(service.read_all_orders().await.unwrap(), vec![created]);
    }
}
