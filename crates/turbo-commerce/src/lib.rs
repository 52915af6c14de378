//! Cart domain types for TurboCommerce.
//!
//! This crate provides the value types shared by the cart store and its
//! collaborators:
//!
//! - **Catalog**: Product payloads as served by the product API, stock levels
//! - **Cart**: Line items, the ordered cart, and its summary
//! - **Money**: Minor-unit monetary amounts
//!
//! # Example
//!
//! ```rust
//! use turbo_commerce::prelude::*;
//!
//! let product = Product::new(ProductId::new(1))
//!     .with_title("Running Shoe")
//!     .with_price(139.9);
//!
//! let mut cart = Cart::new();
//! cart.push(LineItem::new(product, 1).unwrap()).unwrap();
//! cart.increment(ProductId::new(1)).unwrap();
//!
//! let summary = cart.summary(Currency::USD).unwrap();
//! assert_eq!(summary.total.display(), "$279.80");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;

pub use error::CommerceError;
pub use ids::ProductId;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::ProductId;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Product, StockInfo};

    // Cart
    pub use crate::cart::{Cart, CartSummary, LineItem, LineSubtotal};
}
