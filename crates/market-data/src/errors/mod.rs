//! Error types and retry classification for the market data pipeline.
//!
//! This module provides:
//! - [`MarketDataError`]: The error enum for every pipeline operation
//! - [`RetryClass`]: Classification callers use to decide on retries

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while building snapshots or fetching history.
///
/// Callers must be able to tell "the upstream failed" apart from "we do not
/// support this coin" and from "the upstream answered with nothing", so each
/// case has its own variant.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The upstream API could not be reached, timed out, returned a non-2xx
    /// status, or returned a body that does not match the expected shape.
    #[error("Upstream unavailable: {provider} - {message}")]
    UpstreamUnavailable {
        /// The upstream that failed
        provider: String,
        /// What went wrong
        message: String,
    },

    /// History was requested for a symbol absent from the symbol map.
    /// No network call is made for these.
    #[error("Symbol not supported: {0}")]
    SymbolUnsupported(String),

    /// The upstream returned zero listings, so no snapshot means exist.
    #[error("Degenerate snapshot: upstream returned no listings")]
    DegenerateSnapshot,

    /// Configuration is missing or invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl MarketDataError {
    /// Shorthand for an [`UpstreamUnavailable`](Self::UpstreamUnavailable) error.
    pub fn upstream(provider: &str, message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use coinpulse_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::upstream("COINGECKO", "HTTP 503");
    /// assert_eq!(error.retry_class(), RetryClass::CallerMayRetry);
    ///
    /// let error = MarketDataError::SymbolUnsupported("PEPE".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::UpstreamUnavailable { .. } => RetryClass::CallerMayRetry,
            Self::SymbolUnsupported(_) | Self::DegenerateSnapshot | Self::Config(_) => {
                RetryClass::Never
            }
        }
    }
}
