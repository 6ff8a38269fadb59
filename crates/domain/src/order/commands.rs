//! Order commands.

use chrono::NaiveDate;
use common::OrderId;

use super::NewLineItem;

/// Command to create an order together with its items.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    /// The customer placing the order.
    pub customer: String,

    /// Order date; storage uses the current date when absent.
    pub order_date: Option<NaiveDate>,

    /// Items to create with the order.
    pub items: Vec<NewLineItem>,
}

impl CreateOrder {
    /// Creates a new CreateOrder command dated by storage.
    pub fn new(customer: impl Into<String>, items: Vec<NewLineItem>) -> Self {
        Self {
            customer: customer.into(),
            order_date: None,
            items,
        }
    }

    /// Sets an explicit order date.
    pub fn with_date(mut self, order_date: NaiveDate) -> Self {
        self.order_date = Some(order_date);
        self
    }
}

/// Command to change an order's customer and/or date.
///
/// `None` means "leave the field as it is".
#[derive(Debug, Clone)]
pub struct UpdateOrder {
    /// The order to update.
    pub order_id: OrderId,

    /// New customer, if it should change.
    pub customer: Option<String>,

    /// New order date, if it should change.
    pub order_date: Option<NaiveDate>,
}

impl UpdateOrder {
    /// Creates an update that changes nothing yet.
    pub fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            customer: None,
            order_date: None,
        }
    }

    /// Sets the new customer.
    pub fn customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    /// Sets the new order date.
    pub fn order_date(mut self, order_date: NaiveDate) -> Self {
        self.order_date = Some(order_date);
        self
    }

    /// Returns true if no field would change.
    pub fn is_empty(&self) -> bool {
        self.customer.is_none() && self.order_date.is_none()
    }
}
