//! Retry and timeout policies for fetch operations.

use crate::FetchError;
use std::time::Duration;

/// Backoff strategy between retry attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// No delay between retries.
    None,
    /// Fixed delay between retries.
    Fixed(Duration),
    /// Exponential backoff with base and max.
    Exponential {
        /// Initial delay.
        base: Duration,
        /// Maximum delay.
        max: Duration,
    },
}

impl BackoffStrategy {
    /// Calculate delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed(d) => *d,
            Self::Exponential { base, max } => {
                let multiplier = 2u32.saturating_pow(attempt);
                let delay = base.saturating_mul(multiplier);
                std::cmp::min(delay, *max)
            }
        }
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(100),
            max: Duration::from_secs(2),
        }
    }
}

/// Conditions that trigger a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCondition {
    /// Retry on specific HTTP status code.
    StatusCode(u16),
    /// Retry on any 5xx status.
    ServerError,
    /// Retry on timeout.
    Timeout,
    /// Retry on connection error.
    ConnectionError,
}

impl RetryCondition {
    /// Check if an error matches this condition.
    pub fn matches(&self, error: &FetchError) -> bool {
        match (self, error) {
            (Self::StatusCode(code), FetchError::HttpError { status, .. }) => status == code,
            (Self::ServerError, FetchError::HttpError { status, .. }) => {
                (500..600).contains(status)
            }
            (Self::Timeout, FetchError::Timeout) => true,
            (Self::ConnectionError, FetchError::ConnectionError(_)) => true,
            _ => false,
        }
    }
}

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first try.
    pub max_attempts: u32,
    /// Backoff strategy.
    pub backoff: BackoffStrategy,
    /// Conditions that trigger retry.
    pub retry_on: Vec<RetryCondition>,
}

impl RetryPolicy {
    /// Create a new retry policy.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: BackoffStrategy::default(),
            retry_on: vec![
                RetryCondition::ServerError,
                RetryCondition::Timeout,
                RetryCondition::ConnectionError,
            ],
        }
    }

    /// Create a policy with no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 0,
            backoff: BackoffStrategy::None,
            retry_on: Vec::new(),
        }
    }

    /// Set backoff strategy.
    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff = strategy;
        self
    }

    /// Set retry conditions.
    pub fn with_conditions(mut self, conditions: Vec<RetryCondition>) -> Self {
        self.retry_on = conditions;
        self
    }

    /// Check if a failed attempt (0-indexed) should be retried.
    pub fn should_retry(&self, error: &FetchError, attempt: u32) -> bool {
        if attempt >= self.max_attempts {
            return false;
        }
        self.retry_on.iter().any(|c| c.matches(error))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Timeout configuration for a fetch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Connection timeout.
    pub connect: Duration,
    /// Total time for a single attempt, including reading the body.
    pub total: Duration,
}

impl TimeoutConfig {
    /// Create a new timeout configuration.
    pub fn new(connect: Duration, total: Duration) -> Self {
        Self { connect, total }
    }

    /// Create from a single total timeout.
    pub fn from_total(total: Duration) -> Self {
        Self {
            connect: total / 4,
            total,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(2),
            total: Duration::from_secs(10),
        }
    }
}

/// Fetch policy combining timeout and retry configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Timeout configuration.
    pub timeout: TimeoutConfig,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl FetchPolicy {
    /// Create a new fetch policy.
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }
}
