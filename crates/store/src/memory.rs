use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use common::Money;
use domain::{LineItem, NewLineItem, NewOrder, Order};
use tokio::sync::{Mutex, RwLock, RwLockWriteGuard};

use crate::error::record_discard;
use crate::{LineItemId, OrderId, RepositoryError, Result, repository::OrderRepository};

/// Storage steps an in-memory unit of work goes through.
///
/// Used to inject faults at a precise point of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    Begin,
    InsertOrder,
    InsertItem,
    Fetch,
    FetchAll,
    UpdateOrder,
    DeleteOrder,
    Commit,
}

impl std::fmt::Display for StorageOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StorageOp::Begin => "begin unit of work",
            StorageOp::InsertOrder => "insert order",
            StorageOp::InsertItem => "insert item",
            StorageOp::Fetch => "fetch order",
            StorageOp::FetchAll => "fetch orders",
            StorageOp::UpdateOrder => "update order",
            StorageOp::DeleteOrder => "delete order",
            StorageOp::Commit => "commit",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
struct OrderRow {
    customer: String,
    order_date: NaiveDate,
}

#[derive(Debug, Clone)]
struct ItemRow {
    product: String,
    quantity: u32,
    unit_price: Money,
}

type ItemKey = (OrderId, LineItemId);

/// Item rows are keyed by owning order first, so one order's items form a
/// contiguous range.
#[derive(Debug, Default)]
struct Tables {
    orders: BTreeMap<OrderId, OrderRow>,
    items: BTreeMap<ItemKey, ItemRow>,
    last_order_id: i64,
    last_item_id: i64,
}

fn item_range(order_id: OrderId) -> RangeInclusive<ItemKey> {
    (order_id, LineItemId::new(i64::MIN))..=(order_id, LineItemId::new(i64::MAX))
}

impl Tables {
    fn load(&self, order_id: OrderId) -> Option<Order> {
        let row = self.orders.get(&order_id)?;
        let items = self
            .items
            .range(item_range(order_id))
            .map(|((_, item_id), item)| {
                LineItem::restore(
                    *item_id,
                    order_id,
                    item.product.clone(),
                    item.quantity,
                    item.unit_price,
                )
            })
            .collect();
        Some(Order::restore(
            order_id,
            row.customer.clone(),
            row.order_date,
            items,
        ))
    }

    fn load_all(&self) -> Vec<Order> {
        self.orders
            .keys()
            .filter_map(|order_id| self.load(*order_id))
            .collect()
    }

    fn item_keys(&self, order_id: OrderId) -> Vec<ItemKey> {
        self.items
            .range(item_range(order_id))
            .map(|(key, _)| *key)
            .collect()
    }
}

/// Prior state of one row, recorded before a unit of work changes it.
#[derive(Debug)]
enum Undo {
    Order(OrderId, Option<OrderRow>),
    Item(ItemKey, Option<ItemRow>),
    Counters { last_order_id: i64, last_item_id: i64 },
}

impl Undo {
    fn revert(self, tables: &mut Tables) {
        match self {
            Undo::Order(order_id, Some(row)) => {
                tables.orders.insert(order_id, row);
            }
            Undo::Order(order_id, None) => {
                tables.orders.remove(&order_id);
            }
            Undo::Item(key, Some(row)) => {
                tables.items.insert(key, row);
            }
            Undo::Item(key, None) => {
                tables.items.remove(&key);
            }
            Undo::Counters {
                last_order_id,
                last_item_id,
            } => {
                tables.last_order_id = last_order_id;
                tables.last_item_id = last_item_id;
            }
        }
    }
}

#[derive(Debug)]
struct Fault {
    op: StorageOp,
    remaining: usize,
}

/// Fails with an injected fault if one is armed for `op` and due.
async fn trip(fault: &Mutex<Option<Fault>>, op: StorageOp) -> Result<()> {
    let mut armed = fault.lock().await;
    let Some(due) = armed.as_mut().filter(|f| f.op == op) else {
        return Ok(());
    };
    if due.remaining > 0 {
        due.remaining -= 1;
        return Ok(());
    }
    *armed = None;
    Err(RepositoryError::persistence(
        &op.to_string(),
        "injected storage fault",
    ))
}

/// A write unit of work over the in-memory tables.
///
/// Holds the write lock for its whole lifetime and writes in place, logging
/// the prior state of every touched row. `commit` keeps the writes; dropping
/// without committing replays the log backwards.
struct UnitOfWork<'a> {
    tables: RwLockWriteGuard<'a, Tables>,
    undo: Vec<Undo>,
    committed: bool,
    fault: &'a Mutex<Option<Fault>>,
}

impl UnitOfWork<'_> {
    async fn insert_order(&mut self, customer: &str, order_date: NaiveDate) -> Result<OrderId> {
        trip(self.fault, StorageOp::InsertOrder).await?;
        self.tables.last_order_id += 1;
        let order_id = OrderId::new(self.tables.last_order_id);
        let previous = self.tables.orders.insert(
            order_id,
            OrderRow {
                customer: customer.to_string(),
                order_date,
            },
        );
        self.undo.push(Undo::Order(order_id, previous));
        Ok(order_id)
    }

    async fn insert_item(&mut self, order_id: OrderId, item: &NewLineItem) -> Result<LineItemId> {
        trip(self.fault, StorageOp::InsertItem).await?;
        self.tables.last_item_id += 1;
        let item_id = LineItemId::new(self.tables.last_item_id);
        let previous = self.tables.items.insert(
            (order_id, item_id),
            ItemRow {
                product: item.product.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
            },
        );
        self.undo.push(Undo::Item((order_id, item_id), previous));
        Ok(item_id)
    }

    async fn fetch(&self, order_id: OrderId) -> Result<Option<Order>> {
        trip(self.fault, StorageOp::Fetch).await?;
        Ok(self.tables.load(order_id))
    }

    /// Returns false if the order row does not exist.
    async fn update_order(&mut self, order: &Order) -> Result<bool> {
        trip(self.fault, StorageOp::UpdateOrder).await?;
        let Some(row) = self.tables.orders.get_mut(&order.id()) else {
            return Ok(false);
        };
        let previous = std::mem::replace(
            row,
            OrderRow {
                customer: order.customer().to_string(),
                order_date: order.order_date(),
            },
        );
        self.undo.push(Undo::Order(order.id(), Some(previous)));
        Ok(true)
    }

    /// Removes the order row and, by cascade, its items.
    async fn delete_order(&mut self, order_id: OrderId) -> Result<()> {
        trip(self.fault, StorageOp::DeleteOrder).await?;
        for key in self.tables.item_keys(order_id) {
            let previous = self.tables.items.remove(&key);
            self.undo.push(Undo::Item(key, previous));
        }
        let previous = self.tables.orders.remove(&order_id);
        self.undo.push(Undo::Order(order_id, previous));
        Ok(())
    }

    async fn commit(mut self) -> Result<()> {
        trip(self.fault, StorageOp::Commit).await?;
        self.committed = true;
        Ok(())
    }

    /// Commits on success and reverts on failure.
    async fn finish<T>(self, operation: &'static str, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                if let Err(err) = self.commit().await {
                    tracing::warn!(operation, error = %err, "commit failed, unit of work rolled back");
                    metrics::counter!("repository_rollbacks_total").increment(1);
                    return Err(err);
                }
                tracing::debug!(operation, "unit of work committed");
                Ok(value)
            }
            Err(err) => {
                record_discard(operation, &err);
                Err(err)
            }
        }
    }
}

impl Drop for UnitOfWork<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        while let Some(entry) = self.undo.pop() {
            entry.revert(&mut self.tables);
        }
    }
}

/// In-memory order repository for testing and local runs.
///
/// This implementation keeps all orders in memory and provides the same
/// unit-of-work guarantees as the PostgreSQL implementation. Faults can be
/// injected at any storage step with [`fail_on`](Self::fail_on).
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    tables: Arc<RwLock<Tables>>,
    fault: Arc<Mutex<Option<Fault>>>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a one-shot storage fault: `op` succeeds `after` more times,
    /// then fails once. Replaces any previously armed fault.
    pub async fn fail_on(&self, op: StorageOp, after: usize) {
        *self.fault.lock().await = Some(Fault {
            op,
            remaining: after,
        });
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.tables.read().await.orders.len()
    }

    /// Returns the number of stored line items across all orders.
    pub async fn item_count(&self) -> usize {
        self.tables.read().await.items.len()
    }

    /// Clears all orders and items.
    pub async fn clear(&self) {
        *self.tables.write().await = Tables::default();
    }

    async fn begin(&self) -> Result<UnitOfWork<'_>> {
        trip(&self.fault, StorageOp::Begin).await?;
        let tables = self.tables.write().await;
        let counters = Undo::Counters {
            last_order_id: tables.last_order_id,
            last_item_id: tables.last_item_id,
        };
        Ok(UnitOfWork {
            tables,
            undo: vec![counters],
            committed: false,
            fault: &self.fault,
        })
    }

    async fn insert(uow: &mut UnitOfWork<'_>, order: &NewOrder) -> Result<Order> {
        let order_date = order
            .order_date()
            .unwrap_or_else(|| Utc::now().date_naive());
        let order_id = uow.insert_order(order.customer(), order_date).await?;
        for item in order.items() {
            uow.insert_item(order_id, item).await?;
        }
        uow.fetch(order_id)
            .await?
            .ok_or_else(|| RepositoryError::persistence("create order", "inserted row missing"))
    }

    async fn apply_update(uow: &mut UnitOfWork<'_>, order: &Order) -> Result<Order> {
        if !uow.update_order(order).await? {
            return Err(RepositoryError::NotFound(order.id()));
        }
        uow.fetch(order.id())
            .await?
            .ok_or(RepositoryError::NotFound(order.id()))
    }

    async fn remove(uow: &mut UnitOfWork<'_>, order_id: OrderId) -> Result<()> {
        if uow.fetch(order_id).await?.is_none() {
            return Err(RepositoryError::NotFound(order_id));
        }
        uow.delete_order(order_id).await
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: NewOrder) -> Result<Order> {
        let mut uow = self.begin().await?;
        let result = Self::insert(&mut uow, &order).await;
        uow.finish("create order", result).await
    }

    async fn read_by_id(&self, order_id: OrderId) -> Result<Option<Order>> {
        trip(&self.fault, StorageOp::Fetch).await?;
        Ok(self.tables.read().await.load(order_id))
    }

    async fn read_all(&self) -> Result<Vec<Order>> {
        trip(&self.fault, StorageOp::FetchAll).await?;
        Ok(self.tables.read().await.load_all())
    }

    async fn update(&self, order: &Order) -> Result<Order> {
        let mut uow = self.begin().await?;
        let result = Self::apply_update(&mut uow, order).await;
        uow.finish("update order", result).await
    }

    async fn delete(&self, order_id: OrderId) -> Result<()> {
        let mut uow = self.begin().await?;
        let result = Self::remove(&mut uow, order_id).await;
        uow.finish("delete order", result).await
    }
}
