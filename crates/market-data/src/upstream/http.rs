//! Shared request plumbing for the upstream clients.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use tracing::debug;

use crate::errors::MarketDataError;

pub(crate) fn build_client(timeout: Duration) -> Result<Client, MarketDataError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| MarketDataError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Send a request and return the body of a 2xx response.
///
/// `describe_error` gets a chance to pull a readable message out of a
/// non-2xx body before the raw status is used.
pub(crate) async fn send_for_text(
    provider: &'static str,
    request: RequestBuilder,
    describe_error: fn(&str) -> Option<String>,
) -> Result<String, MarketDataError> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            MarketDataError::upstream(provider, "Request timed out")
        } else {
            MarketDataError::upstream(provider, format!("Request failed: {}", e))
        }
    })?;

    let status = response.status();
    debug!("{} responded with {}", provider, status);

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = describe_error(&body)
            .map(|detail| format!("HTTP {} - {}", status, detail))
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(MarketDataError::upstream(provider, message));
    }

    response.text().await.map_err(|e| {
        if e.is_timeout() {
            MarketDataError::upstream(provider, "Timed out reading response")
        } else {
            MarketDataError::upstream(provider, format!("Failed to read response: {}", e))
        }
    })
}
