//! Commerce error types.

use crate::ids::ProductId;
use thiserror::Error;

/// Errors that can occur in cart domain operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(ProductId),

    /// A line item for this product already exists.
    #[error("Duplicate line item for product {0}")]
    DuplicateLineItem(ProductId),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Product payload has no `price`.
    #[error("Product {0} has no price")]
    MissingPrice(ProductId),

    /// Product `price` is not a non-negative number.
    #[error("Product {0} has an invalid price")]
    InvalidPrice(ProductId),

    /// Unknown currency code.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in cart calculation")]
    Overflow,
}
