//! Domain error types.

use common::Money;
use thiserror::Error;

/// An order or line item input violates an aggregate invariant.
///
/// Item variants carry the zero-based position of the offending item in the
/// submitted list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Customer is missing or blank.
    #[error("Customer is required")]
    CustomerRequired,

    /// Customer exceeds the storable length.
    #[error("Customer must be at most {max} characters")]
    CustomerTooLong { max: usize },

    /// Order has no items.
    #[error("At least one item is required")]
    NoItems,

    /// Item product is missing or blank.
    #[error("Item {index}: product is required")]
    ProductRequired { index: usize },

    /// Item product exceeds the storable length.
    #[error("Item {index}: product must be at most {max} characters")]
    ProductTooLong { index: usize, max: usize },

    /// Item quantity is not positive.
    #[error("Item {index}: invalid quantity {quantity} (must be greater than 0)")]
    InvalidQuantity { index: usize, quantity: u32 },

    /// Item quantity exceeds the storable maximum.
    #[error("Item {index}: invalid quantity {quantity} (must be at most {max})")]
    QuantityTooLarge { index: usize, quantity: u32, max: u32 },

    /// Item unit price is negative.
    #[error("Item {index}: invalid unit price {price} (must not be negative)")]
    InvalidUnitPrice { index: usize, price: Money },

    /// Item unit price exceeds the storable maximum.
    #[error("Item {index}: invalid unit price {price} (must be at most {max})")]
    UnitPriceTooLarge { index: usize, price: Money, max: Money },

    /// The order total does not fit in the money representation.
    #[error("Order total is too large")]
    TotalTooLarge,
}
