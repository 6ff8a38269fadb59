//! Unpersisted order input, validated at construction.

use chrono::NaiveDate;
use common::Money;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Longest customer name storage accepts.
pub const MAX_CUSTOMER_LEN: usize = 100;

/// Longest product name storage accepts.
pub const MAX_PRODUCT_LEN: usize = 100;

/// Largest quantity a single line item may carry.
pub const MAX_QUANTITY: u32 = 1_000_000;

/// Largest unit price a line item may carry, 99,999,999.99.
pub const MAX_UNIT_PRICE: Money = Money::from_cents(9_999_999_999);

/// A line item as submitted by a client, before any validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLineItem {
    /// Product description.
    pub product: String,

    /// Quantity ordered.
    pub quantity: u32,

    /// Price per unit.
    pub unit_price: Money,
}

impl NewLineItem {
    /// Creates a new line item input record.
    pub fn new(product: impl Into<String>, quantity: u32, unit_price: Money) -> Self {
        Self {
            product: product.into(),
            quantity,
            unit_price,
        }
    }

    /// Returns the total price for this item (quantity * unit_price).
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }

    fn validate(&self, index: usize) -> Result<(), ValidationError> {
        let product = self.product.trim();
        if product.is_empty() {
            return Err(ValidationError::ProductRequired { index });
        }
        if product.chars().count() > MAX_PRODUCT_LEN {
            return Err(ValidationError::ProductTooLong {
                index,
                max: MAX_PRODUCT_LEN,
            });
        }
        if self.quantity == 0 {
            return Err(ValidationError::InvalidQuantity {
                index,
                quantity: self.quantity,
            });
        }
        if self.quantity > MAX_QUANTITY {
            return Err(ValidationError::QuantityTooLarge {
                index,
                quantity: self.quantity,
                max: MAX_QUANTITY,
            });
        }
        if self.unit_price.is_negative() {
            return Err(ValidationError::InvalidUnitPrice {
                index,
                price: self.unit_price,
            });
        }
        if self.unit_price > MAX_UNIT_PRICE {
            return Err(ValidationError::UnitPriceTooLarge {
                index,
                price: self.unit_price,
                max: MAX_UNIT_PRICE,
            });
        }
        Ok(())
    }
}

/// An order that satisfies every creation invariant but has not been
/// persisted yet, so it has no id.
///
/// The only way to obtain one is [`NewOrder::new`], which rejects input
/// violating an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    customer: String,
    order_date: Option<NaiveDate>,
    items: Vec<NewLineItem>,
}

impl NewOrder {
    /// Validates the input and builds an order ready for persistence.
    ///
    /// Checks run customer first, then the item list, then each item in
    /// order; the first violation is returned. Customer and product names
    /// are stored trimmed. A missing `order_date` is filled in by storage.
    pub fn new(
        customer: impl Into<String>,
        order_date: Option<NaiveDate>,
        items: Vec<NewLineItem>,
    ) -> Result<Self, ValidationError> {
        let customer = validate_customer(&customer.into())?;

        if items.is_empty() {
            return Err(ValidationError::NoItems);
        }

        let items = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                item.validate(index)?;
                Ok(NewLineItem {
                    product: item.product.trim().to_string(),
                    ..item
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        items
            .iter()
            .try_fold(Money::zero(), |total, item| {
                item.unit_price
                    .checked_multiply(item.quantity)
                    .and_then(|line| total.checked_add(line))
            })
            .ok_or(ValidationError::TotalTooLarge)?;

        Ok(Self {
            customer,
            order_date,
            items,
        })
    }

    /// Returns the customer.
    pub fn customer(&self) -> &str {
        &self.customer
    }

    /// Returns the requested order date, if one was given.
    pub fn order_date(&self) -> Option<NaiveDate> {
        self.order_date
    }

    /// Returns the line items in submission order.
    pub fn items(&self) -> &[NewLineItem] {
        &self.items
    }

    /// Returns the order total.
    pub fn total(&self) -> Money {
        self.items.iter().map(NewLineItem::total_price).sum()
    }
}

/// Checks a customer name and returns it trimmed.
pub(crate) fn validate_customer(customer: &str) -> Result<String, ValidationError> {
    let customer = customer.trim();
    if customer.is_empty() {
        return Err(ValidationError::CustomerRequired);
    }
    if customer.chars().count() > MAX_CUSTOMER_LEN {
        return Err(ValidationError::CustomerTooLong {
            max: MAX_CUSTOMER_LEN,
        });
    }
    Ok(customer.to_string())
}
