//! HTTP-backed stock and product services.

use async_trait::async_trait;
use serde::Deserialize;
use turbo_commerce::{catalog::Product, catalog::StockInfo, ProductId};
use turbo_data::FetchClient;

use crate::error::CollaboratorError;
use crate::services::{ProductService, StockService};

/// Client for the storefront inventory API.
///
/// - `GET /stock/{id}` → `{ "amount": n }`
/// - `GET /products/{id}` → product
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: FetchClient,
}

#[derive(Deserialize)]
struct StockPayload {
    amount: u32,
}

impl CatalogClient {
    /// Wrap a fetch client whose base URL points at the API.
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StockService for CatalogClient {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn stock(&self, product_id: ProductId) -> Result<StockInfo, CollaboratorError> {
        let payload: StockPayload = self
            .client
            .get_json(&format!("/stock/{product_id}"))
            .await?;
        Ok(StockInfo::new(product_id, payload.amount))
    }
}

#[async_trait]
impl ProductService for CatalogClient {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn product(&self, product_id: ProductId) -> Result<Product, CollaboratorError> {
        let product: Product = self
            .client
            .get_json(&format!("/products/{product_id}"))
            .await?;
        if product.id != product_id {
            return Err(CollaboratorError::Malformed(format!(
                "requested product {product_id}, got {}",
                product.id
            )));
        }
        Ok(product)
    }
}
