//! Transport-facing facade over [`OrderService`].
//!
//! The controller turns request shapes into commands, calls the service, and
//! projects the resulting [`Order`]s into response shapes. Failures come back
//! as [`ApiError`]s ready to be rendered.

use chrono::NaiveDate;
use common::{Money, OrderId};
use domain::{CreateOrder, LineItem, NewLineItem, Order, UpdateOrder};
use serde::{Deserialize, Serialize};
use service::OrderService;
use store::OrderRepository;

use crate::error::ApiError;
use crate::view;

// -- Request types --

/// Body of `POST /orders`.
///
/// Missing `customer` or `items` deserialize as empty so that the service
/// reports them as validation failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub order_date: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<LineItemRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineItemRequest {
    pub product: String,
    pub quantity: u32,
    /// Decimal price, e.g. `9.99`.
    pub unit_price: f64,
}

/// Body of `PUT`/`PATCH /orders/{id}`. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub order_date: Option<NaiveDate>,
}

// -- Response types --

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderResponse {
    pub id: i64,
    pub customer: String,
    pub order_date: NaiveDate,
    pub items: Vec<LineItemResponse>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItemResponse {
    pub id: i64,
    pub product: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl From<&LineItem> for LineItemResponse {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id().as_i64(),
            product: item.product().to_string(),
            quantity: item.quantity(),
            unit_price: item.unit_price().as_decimal(),
        }
    }
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id().as_i64(),
            customer: order.customer().to_string(),
            order_date: order.order_date(),
            items: order.items().iter().map(LineItemResponse::from).collect(),
            total: order.total().as_decimal(),
        }
    }
}

impl CreateOrderRequest {
    fn into_command(self) -> Result<CreateOrder, ApiError> {
        let items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let unit_price = Money::from_decimal(item.unit_price).ok_or_else(|| {
                    ApiError::BadRequest(format!(
                        "Item {index}: invalid unit price {}",
                        item.unit_price
                    ))
                })?;
                Ok(NewLineItem::new(item.product, item.quantity, unit_price))
            })
            .collect::<Result<Vec<_>, ApiError>>()?;

        let cmd = CreateOrder::new(self.customer, items);
        Ok(match self.order_date {
            Some(date) => cmd.with_date(date),
            None => cmd,
        })
    }
}

impl UpdateOrderRequest {
    fn into_command(self, order_id: OrderId) -> UpdateOrder {
        let mut cmd = UpdateOrder::new(order_id);
        if let Some(customer) = self.customer {
            cmd = cmd.customer(customer);
        }
        if let Some(order_date) = self.order_date {
            cmd = cmd.order_date(order_date);
        }
        cmd
    }
}

/// Order endpoints independent of any HTTP framework.
pub struct OrderController<R: OrderRepository> {
    service: OrderService<R>,
}

impl<R: OrderRepository> OrderController<R> {
    pub fn new(service: OrderService<R>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &OrderService<R> {
        &self.service
    }

    pub async fn create(&self, request: CreateOrderRequest) -> Result<OrderResponse, ApiError> {
        let cmd = request.into_command()?;
        let order = self.service.create_order(cmd).await?;
        Ok(OrderResponse::from(&order))
    }

    pub async fn get(&self, id: i64) -> Result<OrderResponse, ApiError> {
        let order = self.service.read_order_by_id(OrderId::new(id)).await?;
        Ok(OrderResponse::from(&order))
    }

    pub async fn list(&self) -> Result<Vec<OrderResponse>, ApiError> {
        let orders = self.service.read_all_orders().await?;
        Ok(orders.iter().map(OrderResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateOrderRequest,
    ) -> Result<OrderResponse, ApiError> {
        let cmd = request.into_command(OrderId::new(id));
        let order = self.service.update_order(cmd).await?;
        Ok(OrderResponse::from(&order))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.service.delete_order(OrderId::new(id)).await?;
        Ok(())
    }

    /// Renders one order as plain text.
    pub async fn summary(&self, id: i64) -> Result<String, ApiError> {
        let order = self.service.read_order_by_id(OrderId::new(id)).await?;
        Ok(view::render_order(&order))
    }

    /// Renders every order as plain text.
    pub async fn summary_all(&self) -> Result<String, ApiError> {
        let orders = self.service.read_all_orders().await?;
        Ok(view::render_orders(&orders))
    }
}
