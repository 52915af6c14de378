//! Key-Value store wrapper with automatic serialization.

use crate::backend::{FileBackend, KvBackend, MemoryBackend};
use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Type-safe cache over a [`KvBackend`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`. Cloning is cheap; clones share the
/// same backend.
#[derive(Clone)]
pub struct Cache {
    backend: Arc<dyn KvBackend>,
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

impl Cache {
    /// Wrap a backend.
    pub fn new(backend: impl KvBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Wrap an already shared backend.
    pub fn from_shared(backend: Arc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    /// Open an in-memory cache.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::memory();
    /// ```
    pub fn memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Open a file-backed cache rooted at `dir`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open_dir("/var/lib/storefront")?;
    /// ```
    pub fn open_dir(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        Ok(Self::new(FileBackend::open(dir)?))
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist, and an error if the stored
    /// bytes don't deserialize into `T`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cart: Option<Cart> = cache.get("cart:user123")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.backend.get(key)? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.set("cart:user123", &cart)?;
    /// ```
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.set(key, &bytes)
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// use turbo_cache::cache_key;
///
/// let key = cache_key!("@TurboCommerce", "cart");
/// assert_eq!(key, "@TurboCommerce:cart");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: u64,
        amount: u32,
    }

    #[test]
    fn test_typed_roundtrip() {
        let cache = Cache::memory();
        let items = vec![Item { id: 1, amount: 2 }, Item { id: 3, amount: 1 }];

        cache.set("cart", &items).unwrap();
        let loaded: Option<Vec<Item>> = cache.get("cart").unwrap();
        assert_eq!(loaded, Some(items));
    }

    #[test]
    fn test_missing_key() {
        let cache = Cache::memory();
        let loaded: Option<Vec<Item>> = cache.get("nope").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let backend = MemoryBackend::new();
        backend.set("cart", b"{not json").unwrap();
        let cache = Cache::new(backend);

        let result = cache.get::<Vec<Item>>("cart");
        assert!(matches!(result, Err(CacheError::SerializeError(_))));

        cache.set("wrong", &"a string").unwrap();
        assert!(cache.get::<Vec<Item>>("wrong").is_err());
    }

    #[test]
    fn test_clones_share_backend() {
        let cache = Cache::memory();
        let clone = cache.clone();
        clone.set("k", &1u32).unwrap();
        assert_eq!(cache.get::<u32>("k").unwrap(), Some(1));
    }

    #[test]
    fn test_cache_key_macro() {
        let user = 123;
        assert_eq!(cache_key!("cart", user), "cart:123");
        assert_eq!(cache_key!("a", "b", 7), "a:b:7");
    }
}
