use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::Money;
use domain::{LineItem, NewOrder, Order};
use sqlx::{PgConnection, PgPool, Postgres, Row, Transaction, postgres::PgRow};

use crate::error::record_discard;
use crate::{LineItemId, OrderId, RepositoryError, Result, repository::OrderRepository};

/// PostgreSQL-backed order repository.
///
/// Every call runs in its own transaction. A transaction that is dropped
/// before commit (for example because the request future was cancelled) is
/// rolled back by sqlx.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new PostgreSQL order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::persistence("run migrations", e))
    }

    fn row_to_item(row: &PgRow) -> Result<LineItem> {
        let quantity: i64 = row.try_get("quantity")?;
        let quantity = u32::try_from(quantity).map_err(|_| {
            RepositoryError::persistence("decode item", format!("quantity {quantity} out of range"))
        })?;

        Ok(LineItem::restore(
            LineItemId::new(row.try_get("id")?),
            OrderId::new(row.try_get("order_id")?),
            row.try_get::<String, _>("product")?,
            quantity,
            Money::from_cents(row.try_get("unit_price_cents")?),
        ))
    }

    fn row_to_order(row: &PgRow, items: Vec<LineItem>) -> Result<Order> {
        Ok(Order::restore(
            OrderId::new(row.try_get("id")?),
            row.try_get::<String, _>("customer")?,
            row.try_get::<NaiveDate, _>("order_date")?,
            items,
        ))
    }

    async fn fetch(conn: &mut PgConnection, order_id: OrderId) -> Result<Option<Order>> {
        let row: Option<PgRow> =
            sqlx::query("SELECT id, customer, order_date FROM orders WHERE id = $1")
                .bind(order_id.as_i64())
                .fetch_optional(&mut *conn)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = sqlx::query(
            r#"
            SELECT id, order_id, product, quantity, unit_price_cents
            FROM order_items
            WHERE order_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(order_id.as_i64())
        .fetch_all(&mut *conn)
        .await?
        .iter()
        .map(Self::row_to_item)
        .collect::<Result<Vec<_>>>()?;

        Self::row_to_order(&row, items).map(Some)
    }

    async fn fetch_all(conn: &mut PgConnection) -> Result<Vec<Order>> {
        let order_rows = sqlx::query("SELECT id, customer, order_date FROM orders ORDER BY id ASC")
            .fetch_all(&mut *conn)
            .await?;

        let item_rows = sqlx::query(
            r#"
            SELECT id, order_id, product, quantity, unit_price_cents
            FROM order_items
            ORDER BY order_id ASC, id ASC
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        let mut items_by_order: BTreeMap<OrderId, Vec<LineItem>> = BTreeMap::new();
        for row in &item_rows {
            let item = Self::row_to_item(row)?;
            items_by_order.entry(item.order_id()).or_default().push(item);
        }

        order_rows
            .iter()
            .map(|row| {
                let order_id = OrderId::new(row.try_get("id")?);
                let items = items_by_order.remove(&order_id).unwrap_or_default();
                Self::row_to_order(row, items)
            })
            .collect()
    }

    async fn insert(conn: &mut PgConnection, order: &NewOrder) -> Result<Order> {
        let order_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (customer, order_date)
            VALUES ($1, COALESCE($2, CURRENT_DATE))
            RETURNING id
            "#,
        )
        .bind(order.customer())
        .bind(order.order_date())
        .fetch_one(&mut *conn)
        .await?;
        let order_id = OrderId::new(order_id);

        for item in order.items() {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product, quantity, unit_price_cents)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(order_id.as_i64())
            .bind(&item.product)
            .bind(i64::from(item.quantity))
            .bind(item.unit_price.cents())
            .execute(&mut *conn)
            .await?;
        }

        Self::fetch(conn, order_id)
            .await?
            .ok_or_else(|| RepositoryError::persistence("create order", "inserted row missing"))
    }

    async fn apply_update(conn: &mut PgConnection, order: &Order) -> Result<Order> {
        let updated = sqlx::query("UPDATE orders SET customer = $2, order_date = $3 WHERE id = $1")
            .bind(order.id().as_i64())
            .bind(order.customer())
            .bind(order.order_date())
            .execute(&mut *conn)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(order.id()));
        }

        Self::fetch(conn, order.id())
            .await?
            .ok_or(RepositoryError::NotFound(order.id()))
    }

    async fn remove(conn: &mut PgConnection, order_id: OrderId) -> Result<()> {
        let target: Option<i64> = sqlx::query_scalar("SELECT id FROM orders WHERE id = $1 FOR UPDATE")
            .bind(order_id.as_i64())
            .fetch_optional(&mut *conn)
            .await?;

        if target.is_none() {
            return Err(RepositoryError::NotFound(order_id));
        }

        // order_items rows go with it via ON DELETE CASCADE
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id.as_i64())
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Commits on success and rolls back on failure.
    async fn finish<T>(
        tx: Transaction<'static, Postgres>,
        operation: &'static str,
        result: Result<T>,
    ) -> Result<T> {
        match result {
            Ok(value) => {
                tx.commit().await?;
                tracing::debug!(operation, "transaction committed");
                Ok(value)
            }
            Err(err) => {
                match tx.rollback().await {
                    Ok(()) => record_discard(operation, &err),
                    Err(rollback_err) => {
                        tracing::warn!(
                            operation,
                            error = %err,
                            rollback_error = %rollback_err,
                            "transaction rollback failed"
                        );
                        metrics::counter!("repository_rollback_failures_total").increment(1);
                    }
                }
                Err(err)
            }
        }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(&self, order: NewOrder) -> Result<Order> {
        let mut tx = self.pool.begin().await?;
        let result = Self::insert(&mut tx, &order).await;
        Self::finish(tx, "create order", result).await
    }

    async fn read_by_id(&self, order_id: OrderId) -> Result<Option<Order>> {
        let mut tx = self.pool.begin().await?;
        let result = Self::fetch(&mut tx, order_id).await;
        Self::finish(tx, "read order", result).await
    }

    async fn read_all(&self) -> Result<Vec<Order>> {
        let mut tx = self.pool.begin().await?;
        let result = Self::fetch_all(&mut tx).await;
        Self::finish(tx, "read orders", result).await
    }

    async fn update(&self, order: &Order) -> Result<Order> {
        let mut tx = self.pool.begin().await?;
        let result = Self::apply_update(&mut tx, order).await;
        Self::finish(tx, "update order", result).await
    }

    async fn delete(&self, order_id: OrderId) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let result = Self::remove(&mut tx, order_id).await;
        Self::finish(tx, "delete order", result).await
    }
}
