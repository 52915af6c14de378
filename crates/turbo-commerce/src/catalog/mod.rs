//! Product catalog module.
//!
//! Contains the product shape served by the product API and the stock
//! level served by the inventory API.

mod inventory;
mod product;

pub use inventory::StockInfo;
pub use product::Product;
