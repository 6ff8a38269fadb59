//! Persisted order aggregate.

use chrono::NaiveDate;
use common::{LineItemId, Money, OrderId};
use serde::{Deserialize, Serialize};

use super::validate_customer;
use crate::error::ValidationError;

/// A persisted line item. Owned by exactly one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    id: LineItemId,
    order_id: OrderId,
    product: String,
    quantity: u32,
    unit_price: Money,
}

impl LineItem {
    /// Rebuilds a line item from storage.
    ///
    /// Storage constraints already guarantee the invariants, so nothing is
    /// re-validated here.
    pub fn restore(
        id: LineItemId,
        order_id: OrderId,
        product: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            id,
            order_id,
            product: product.into(),
            quantity,
            unit_price,
        }
    }

    pub fn id(&self) -> LineItemId {
        self.id
    }

    /// Returns the owning order.
    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Returns the total price for this item (quantity * unit_price).
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// A persisted order and its line items.
///
/// Items are fixed at creation. Only the customer and the order date can
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer: String,
    order_date: NaiveDate,
    items: Vec<LineItem>,
}

impl Order {
    /// Rebuilds an order from storage. Items are kept in the given order.
    pub fn restore(
        id: OrderId,
        customer: impl Into<String>,
        order_date: NaiveDate,
        items: Vec<LineItem>,
    ) -> Self {
        Self {
            id,
            customer: customer.into(),
            order_date,
            items,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn order_date(&self) -> NaiveDate {
        self.order_date
    }

    /// Returns all items in the order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns the number of items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Returns the order total, derived from the items.
    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::total_price).sum()
    }

    /// Replaces the customer. Rejects a blank or overlong name and leaves
    /// the order untouched in that case.
    pub fn rename_customer(&mut self, customer: &str) -> Result<(), ValidationError> {
        self.customer = validate_customer(customer)?;
        Ok(())
    }

    /// Moves the order to a new date.
    pub fn reschedule(&mut self, order_date: NaiveDate) {
        self.order_date = order_date;
    }
}
