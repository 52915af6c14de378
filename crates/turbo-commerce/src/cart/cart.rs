//! Cart and line item types.

use crate::cart::{CartSummary, LineSubtotal};
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A shopping cart.
///
/// An ordered list of line items, in the order products were first added.
/// Holds at most one line item per product and never an item with a zero
/// amount. Serializes as a bare JSON array of line items; deserializing an
/// array that breaks either rule fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from line items, validating uniqueness and amounts.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CommerceError> {
        let mut cart = Self::new();
        for item in items {
            cart.push(item)?;
        }
        Ok(cart)
    }

    /// Append a line item.
    ///
    /// Returns an error if the product is already in the cart or the item
    /// has a zero amount (possible only for deserialized items).
    pub fn push(&mut self, item: LineItem) -> Result<(), CommerceError> {
        if item.amount == 0 {
            return Err(CommerceError::InvalidQuantity(0));
        }
        if self.contains(item.id()) {
            return Err(CommerceError::DuplicateLineItem(item.id()));
        }
        self.items.push(item);
        Ok(())
    }

    /// Increase a line item's amount by one.
    pub fn increment(&mut self, product_id: ProductId) -> Result<&LineItem, CommerceError> {
        let item = self.get_mut(product_id)?;
        item.amount = item.amount.checked_add(1).ok_or(CommerceError::Overflow)?;
        Ok(&*item)
    }

    /// Set a line item's amount.
    ///
    /// Zero is rejected; remove the item instead.
    pub fn set_amount(
        &mut self,
        product_id: ProductId,
        amount: u32,
    ) -> Result<&LineItem, CommerceError> {
        if amount == 0 {
            return Err(CommerceError::InvalidQuantity(0));
        }
        let item = self.get_mut(product_id)?;
        item.amount = amount;
        Ok(&*item)
    }

    /// Remove a line item, returning it if it was present.
    pub fn remove(&mut self, product_id: ProductId) -> Option<LineItem> {
        let index = self.position(product_id)?;
        Some(self.items.remove(index))
    }

    /// Get an item by product ID.
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id() == product_id)
    }

    fn get_mut(&mut self, product_id: ProductId) -> Result<&mut LineItem, CommerceError> {
        self.items
            .iter_mut()
            .find(|i| i.id() == product_id)
            .ok_or(CommerceError::ItemNotInCart(product_id))
    }

    /// Index of a product's line item.
    pub fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|i| i.id() == product_id)
    }

    /// Check if a product is in the cart.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.position(product_id).is_some()
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over line items.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total item count (sum of amounts).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.amount)).sum()
    }

    /// Amount in cart per product, for product listings.
    pub fn amounts(&self) -> HashMap<ProductId, u32> {
        self.items.iter().map(|i| (i.id(), i.amount)).collect()
    }

    /// Calculate the cart summary, reading prices in `currency`.
    ///
    /// Fails if a product has no usable price or on arithmetic overflow.
    pub fn summary(&self, currency: Currency) -> Result<CartSummary, CommerceError> {
        let lines = self
            .items
            .iter()
            .map(|item| -> Result<LineSubtotal, CommerceError> {
                let unit_price = item.product.price(currency)?;
                Ok(LineSubtotal {
                    product_id: item.id(),
                    unit_price,
                    amount: item.amount,
                    subtotal: item.subtotal(currency)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total = Money::try_sum(lines.iter().map(|l| &l.subtotal), currency)
            .ok_or(CommerceError::Overflow)?;

        Ok(CartSummary {
            distinct_items: self.items.len(),
            total_quantity: self.item_count(),
            lines,
            total,
        })
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CommerceError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A line item in the cart: a product plus the requested amount.
///
/// Serialized flat, with the product's fields and `amount` side by side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// The product being purchased.
    #[serde(flatten)]
    pub product: Product,
    amount: u32,
}

impl LineItem {
    /// Create a new line item.
    ///
    /// Returns an error if `amount` is zero.
    pub fn new(mut product: Product, amount: u32) -> Result<Self, CommerceError> {
        if amount == 0 {
            return Err(CommerceError::InvalidQuantity(0));
        }
        // `amount` is ours; a stray copy in the payload would serialize twice.
        product.attributes.remove("amount");
        Ok(Self { product, amount })
    }

    /// Product ID.
    pub fn id(&self) -> ProductId {
        self.product.id
    }

    /// Requested amount, always at least one.
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// Unit price times amount.
    pub fn subtotal(&self, currency: Currency) -> Result<Money, CommerceError> {
        self.product
            .price(currency)?
            .try_multiply(i64::from(self.amount))
            .ok_or(CommerceError::Overflow)
    }
}
