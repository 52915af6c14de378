//! Type-safe Key-Value storage layer for TurboCommerce.
//!
//! Provides a simple, ergonomic API for keeping client state in a local
//! Key-Value store with automatic JSON serialization. Storage is pluggable
//! through [`KvBackend`]; an in-memory and a file-backed store ship with the
//! crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_cache::{cache_key, Cache};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct CartItem {
//!     id: u64,
//!     amount: u32,
//! }
//!
//! let cache = Cache::open_dir("/var/lib/storefront")?;
//! let key = cache_key!("@TurboCommerce", "cart");
//!
//! // Store a value
//! cache.set(&key, &vec![CartItem { id: 1, amount: 2 }])?;
//!
//! // Retrieve a value
//! let cart: Option<Vec<CartItem>> = cache.get(&key)?;
//! ```

mod backend;
mod error;
mod kv;

pub use backend::{FileBackend, KvBackend, MemoryBackend};
pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, KvBackend};
}
