//! Error types for tile fetching.

use thiserror::Error;

/// Errors from tile fetches, classified for retry policy.
///
/// The fetcher only classifies; the capture orchestrator is the sole
/// component that decides retry versus abort.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Provider timeout, rate limit, or 5xx-equivalent. Eligible for a
    /// bounded retry.
    #[error("transient fetch error: {0}")]
    Transient(String),

    /// Invalid point or provider-side rejection. Never retried; aborts
    /// the capture run.
    #[error("permanent fetch error: {0}")]
    Permanent(String),
}

impl FetchError {
    /// Builds a transient (retryable) error.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient(message.into())
    }

    /// Builds a permanent (non-retryable) error.
    pub fn permanent(message: impl Into<String>) -> Self {
        Self::Permanent(message.into())
    }

    /// Whether the orchestrator may retry this failure.
    #[inline]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
