//! Client-side shopping cart store for TurboCommerce.
//!
//! [`CartStore`] owns the shopper's cart: it checks stock with the inventory
//! API before adding or raising quantities, writes every change through to
//! local Key-Value storage, and publishes each new cart to subscribers.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use turbo_cache::Cache;
//! use turbo_cart::{CartStore, CatalogClient, UpdateProductAmount};
//! use turbo_commerce::ProductId;
//! use turbo_data::FetchClient;
//!
//! let catalog = Arc::new(CatalogClient::new(
//!     FetchClient::new()?.with_base_url("http://localhost:3333"),
//! ));
//! let store = CartStore::builder(Cache::open_dir("./data")?, catalog.clone(), catalog).build();
//!
//! let mut updates = store.subscribe();
//!
//! store.add_product(ProductId::new(1)).await?;
//! store
//!     .update_product_amount(UpdateProductAmount::new(ProductId::new(1), 3))
//!     .await?;
//!
//! updates.changed().await?;
//! println!("{} items", updates.borrow().item_count());
//! ```

mod catalog;
mod config;
mod error;
mod notice;
mod services;
mod store;

pub use catalog::CatalogClient;
pub use config::{
    ApiConfig, CartConfig, CartSettings, ConfigError, StorageBackend, StorageConfig, ENV_API_URL,
    ENV_STORAGE_DIR,
};
pub use error::{CartError, CartOperation, CollaboratorError};
pub use notice::{CartNotice, ChannelNotifier, NotificationSink, TracingNotifier};
pub use services::{ProductService, StockService};
pub use store::{CartStore, CartStoreBuilder, UpdateProductAmount, DEFAULT_NAMESPACE};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CartError, CartNotice, CartStore, NotificationSink, ProductService, StockService,
        UpdateProductAmount,
    };
    pub use turbo_commerce::prelude::*;
}
