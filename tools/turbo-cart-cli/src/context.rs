//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use turbo_cart::{CartConfig, CartStore};

use crate::output::{CliNotifier, Output};

/// Execution context for CLI commands.
pub struct Context {
    /// Cart configuration, with environment overrides applied.
    pub config: CartConfig,
    /// Output handler.
    pub output: Output,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let config = if let Some(path) = config_path {
            CartConfig::load(path)?
        } else {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some(path) => {
                    output.debug(&format!("Using config {}", path.display()));
                    CartConfig::load(&path)?
                }
                None => CartConfig::default(),
            }
        };

        Ok(Self {
            config: config.with_env_overrides(),
            output,
        })
    }

    /// Find a config file in the directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        let config_names = ["turbo-cart.toml", ".turbo-cart.toml", "turbo-cart.json"];

        start.ancestors().find_map(|dir| {
            config_names
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.is_file())
        })
    }

    /// Open the cart store described by the config.
    pub fn open_store(&self) -> Result<CartStore> {
        let store = self
            .config
            .open_store(Arc::new(CliNotifier::new(self.output)))
            .context("Failed to open cart storage")?;
        self.output
            .debug(&format!("Cart key {} at {}", store.storage_key(), self.config.api.base_url));
        Ok(store)
    }
}
