//! Stock level reported by the inventory API.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Available quantity for a product at the time it was queried.
///
/// Fetched per operation and never stored; stock may change between the
/// query and its use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    /// Product the stock belongs to.
    pub product_id: ProductId,
    /// Units available.
    pub amount: u32,
}

impl StockInfo {
    /// Create a stock reading.
    pub fn new(product_id: ProductId, amount: u32) -> Self {
        Self { product_id, amount }
    }

    /// Check if at least one unit is available.
    pub fn is_available(&self) -> bool {
        self.amount >= 1
    }

    /// Check if a specific quantity can be held in a cart.
    pub fn can_fulfill(&self, quantity: u32) -> bool {
        quantity <= self.amount
    }
}
