//! Seams between the providers and the HTTP upstreams.
//!
//! Providers only ever talk to these traits, which keeps caching and
//! derivation testable without a network.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{HistoryPoint, ListingQuote};

/// Source of the top-N market listings.
#[async_trait]
pub trait ListingsSource: Send + Sync {
    /// Constant identifier such as "COINMARKETCAP", used in logs and errors.
    fn id(&self) -> &'static str;

    /// Quote currency the listings are expressed in.
    fn currency(&self) -> &str;

    /// Identity of the request this source issues: endpoint plus query
    /// parameters. Used as the cache key.
    fn request_key(&self) -> String;

    /// One request, no retries. Any transport, status or parse failure is
    /// reported as [`MarketDataError::UpstreamUnavailable`].
    async fn fetch_listings(&self) -> Result<Vec<ListingQuote>, MarketDataError>;
}

/// Source of short price histories keyed by history-API coin id.
#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    fn id(&self) -> &'static str;

    fn currency(&self) -> &str;

    /// Length of the requested window in days.
    fn days(&self) -> u32;

    /// Points must come back strictly ascending by timestamp.
    async fn fetch_price_history(&self, coin_id: &str)
        -> Result<Vec<HistoryPoint>, MarketDataError>;
}
