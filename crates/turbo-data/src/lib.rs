//! HTTP client utilities for TurboCommerce.
//!
//! Provides a small async client for JSON APIs with a base URL, per-attempt
//! timeouts and retry with backoff.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_data::FetchClient;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Stock {
//!     amount: u32,
//! }
//!
//! let client = FetchClient::new()?.with_base_url("http://localhost:3333");
//!
//! let stock: Stock = client.get_json("/stock/1").await?;
//! ```

mod error;
mod retry;

pub use error::FetchError;
pub use retry::{BackoffStrategy, FetchPolicy, RetryCondition, RetryPolicy, TimeoutConfig};

use serde::de::DeserializeOwned;

/// HTTP client for making outbound requests.
///
/// A thin wrapper around `reqwest::Client` that joins paths onto a base URL
/// and retries according to its [`FetchPolicy`].
/// Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: Option<String>,
    policy: FetchPolicy,
}

impl FetchClient {
    /// Create a new HTTP client with the default policy.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_policy(FetchPolicy::default())
    }

    /// Create a new HTTP client with an explicit policy.
    pub fn with_policy(policy: FetchPolicy) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .connect_timeout(policy.timeout.connect)
            .timeout(policy.timeout.total)
            .build()
            .map_err(|e| FetchError::RequestError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: None,
            policy,
        })
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// The policy this client applies.
    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Resolve a path against the base URL.
    ///
    /// Absolute `http(s)://` URLs are returned unchanged.
    pub fn url(&self, path: &str) -> String {
        match &self.base_url {
            Some(base) if !path.starts_with("http://") && !path.starts_with("https://") => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    path.trim_start_matches('/')
                )
            }
            _ => path.to_string(),
        }
    }

    /// GET a JSON resource, retrying according to the client's policy.
    ///
    /// Non-2xx responses are returned as [`FetchError::HttpError`] and bodies
    /// that don't parse as `T` as [`FetchError::ParseError`].
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.url(path);
        let mut attempt = 0;

        loop {
            match self.get_once(&url).await {
                Ok(value) => return Ok(value),
                Err(err) if self.policy.retry.should_retry(&err, attempt) => {
                    let delay = self.policy.retry.backoff.delay_for_attempt(attempt);
                    tracing::debug!(%url, attempt, ?delay, error = %err, "retrying fetch");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::debug!(%url, attempt, error = %err, "fetch failed");
                    return Err(err);
                }
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::HttpError {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, FetchPolicy, RetryPolicy, TimeoutConfig};
}
