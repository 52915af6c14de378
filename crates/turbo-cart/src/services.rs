//! Collaborator interfaces the cart store depends on.

use async_trait::async_trait;
use turbo_commerce::{catalog::Product, catalog::StockInfo, ProductId};

use crate::error::CollaboratorError;

/// Reports how many units of a product are available.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Current stock for a product.
    async fn stock(&self, product_id: ProductId) -> Result<StockInfo, CollaboratorError>;
}

/// Serves canonical product data.
#[async_trait]
pub trait ProductService: Send + Sync {
    /// Product data for a product id.
    async fn product(&self, product_id: ProductId) -> Result<Product, CollaboratorError>;
}
