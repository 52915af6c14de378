//! Cart store configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use turbo_cache::{Cache, CacheError};
use turbo_commerce::Currency;
use turbo_data::{FetchClient, FetchError, FetchPolicy, RetryPolicy, TimeoutConfig};

use crate::catalog::CatalogClient;
use crate::notice::NotificationSink;
use crate::store::{CartStore, DEFAULT_NAMESPACE};

/// Overrides `api.base_url`.
pub const ENV_API_URL: &str = "TURBO_CART_API_URL";
/// Overrides `storage.dir`.
pub const ENV_STORAGE_DIR: &str = "TURBO_CART_STORAGE_DIR";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse JSON config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] CacheError),

    #[error("HTTP client error: {0}")]
    Client(#[from] FetchError),
}

/// Cart store configuration file.
///
/// ```toml
/// [api]
/// base_url = "http://localhost:3333"
/// timeout_ms = 10000
///
/// [storage]
/// namespace = "@TurboCommerce"
/// backend = "file"
/// dir = "./.turbo-cart"
///
/// [cart]
/// currency = "USD"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Inventory API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Local storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Cart display settings.
    #[serde(default)]
    pub cart: CartSettings,
}

/// Cart display settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSettings {
    /// Currency the API's prices are in. Only totals use it.
    #[serde(default)]
    pub currency: Currency,
}

/// Inventory API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the stock and product API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-attempt timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Retries after the first attempt on 5xx, timeouts and connection
    /// failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_connect_timeout_ms() -> u64 {
    2_000
}

fn default_max_retries() -> u32 {
    2
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

/// Where the cart is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory; the cart is lost on exit.
    Memory,
    /// One file per key under `storage.dir`.
    #[default]
    File,
}

/// Local storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Prefix of the storage key.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Storage backend.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend. Defaults to the user data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            backend: StorageBackend::default(),
            dir: None,
        }
    }
}

impl StorageConfig {
    /// Directory the file backend writes to.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(default_data_dir)
    }
}

/// `$XDG_DATA_HOME/turbo-cart`, falling back to `~/.local/share/turbo-cart`.
fn default_data_dir() -> PathBuf {
    let base = std::env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("turbo-cart")
}

impl CartConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        } else {
            toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Apply `TURBO_CART_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.api.base_url = url;
        }
        if let Some(dir) = lookup(ENV_STORAGE_DIR).filter(|v| !v.is_empty()) {
            self.storage.dir = Some(PathBuf::from(dir));
        }
        self
    }

    /// Fetch policy built from the `[api]` settings.
    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy::new(
            TimeoutConfig::new(
                Duration::from_millis(self.api.connect_timeout_ms),
                Duration::from_millis(self.api.timeout_ms),
            ),
            RetryPolicy::new(self.api.max_retries),
        )
    }

    /// HTTP client for the inventory API.
    pub fn fetch_client(&self) -> Result<FetchClient, ConfigError> {
        Ok(FetchClient::with_policy(self.fetch_policy())?.with_base_url(&self.api.base_url))
    }

    /// Open the configured storage backend.
    pub fn open_cache(&self) -> Result<Cache, ConfigError> {
        match self.storage.backend {
            StorageBackend::Memory => Ok(Cache::memory()),
            StorageBackend::File => Ok(Cache::open_dir(self.storage.resolved_dir())?),
        }
    }

    /// Build a store wired to the configured API and storage.
    pub fn open_store(
        &self,
        notifier: Arc<dyn NotificationSink>,
    ) -> Result<CartStore, ConfigError> {
        let catalog = Arc::new(CatalogClient::new(self.fetch_client()?));
        let store = CartStore::builder(self.open_cache()?, catalog.clone(), catalog)
            .with_namespace(self.storage.namespace.as_str())
            .with_currency(self.cart.currency)
            .with_notifier(notifier)
            .build();

        tracing::debug!(
            api = %self.api.base_url,
            backend = ?self.storage.backend,
            currency = %self.cart.currency,
            key = store.storage_key(),
            "cart store opened"
        );
        Ok(store)
    }
}
