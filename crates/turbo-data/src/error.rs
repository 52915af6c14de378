//! HTTP client error types.

use thiserror::Error;

/// Errors that can occur when making HTTP requests.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Failed to build or send the request.
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Could not reach the server.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// HTTP error response.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,
}

impl FetchError {
    /// HTTP status code, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the server answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::ConnectionError(e.to_string())
        } else if e.is_decode() {
            FetchError::ParseError(e.to_string())
        } else {
            FetchError::RequestError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::ParseError(e.to_string())
    }
}
