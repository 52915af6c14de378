//! Cart summary calculations.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Totals for a cart, as shown in a storefront header and cart page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartSummary {
    /// Number of distinct products (the header badge count).
    pub distinct_items: usize,
    /// Sum of all line item amounts.
    pub total_quantity: u64,
    /// Per-line-item breakdown, in cart order.
    pub lines: Vec<LineSubtotal>,
    /// Sum of all line subtotals.
    pub total: Money,
}

impl CartSummary {
    /// Subtotal for a product, if it is in the cart.
    pub fn subtotal_for(&self, product_id: ProductId) -> Option<Money> {
        self.lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map(|l| l.subtotal)
    }
}

/// Subtotal for a single line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineSubtotal {
    /// Product ID.
    pub product_id: ProductId,
    /// Unit price.
    pub unit_price: Money,
    /// Amount in cart.
    pub amount: u32,
    /// unit_price * amount.
    pub subtotal: Money,
}
