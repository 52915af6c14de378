//! CLI command implementations.

pub mod add;
pub mod remove;
pub mod show;
pub mod summary;
pub mod update;

use clap::Args;
use turbo_commerce::catalog::Product;
use turbo_commerce::ProductId;

/// Arguments for commands that take a single product.
#[derive(Args)]
pub struct ProductArgs {
    /// Product ID.
    pub id: ProductId,
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Product ID.
    pub id: ProductId,

    /// New amount. Zero or less leaves the cart unchanged.
    #[arg(allow_negative_numbers = true)]
    pub amount: i64,
}

/// Name to print for a product; payloads without a title fall back to the id.
pub fn display_name(product: &Product) -> String {
    product
        .title()
        .map(str::to_string)
        .unwrap_or_else(|| format!("product {}", product.id))
}
