use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::quote::{CoinQuote, ListingQuote};
use super::signal::MarketRegime;
use super::types::Currency;
use crate::analytics::{classify_regime, SnapshotAggregates};
use crate::errors::MarketDataError;

/// Immutable point-in-time table of every tracked coin.
///
/// Rows keep the upstream ranking order. A snapshot is never mutated; a
/// refresh builds a new one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub fetched_at: DateTime<Utc>,
    pub currency: Currency,
    pub regime: MarketRegime,
    pub aggregates: SnapshotAggregates,
    pub quotes: Vec<CoinQuote>,
}

impl Snapshot {
    /// Build a snapshot from raw listings.
    ///
    /// Aggregates are computed once and shared by every row's signal
    /// classification. Zero listings yield [`MarketDataError::DegenerateSnapshot`].
    pub fn from_listings(
        listings: Vec<ListingQuote>,
        currency: impl Into<Currency>,
        fetched_at: DateTime<Utc>,
    ) -> Result<Self, MarketDataError> {
        let aggregates = SnapshotAggregates::compute(&listings)?;
        let regime = classify_regime(
            aggregates.mean_percent_change_24h,
            aggregates.mean_volatility_score,
        );
        let quotes = listings
            .into_iter()
            .map(|listing| CoinQuote::derive(listing, &aggregates))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            fetched_at,
            currency: currency.into(),
            regime,
            aggregates,
            quotes,
        })
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Find a row by ticker symbol, ignoring case.
    pub fn find(&self, symbol: &str) -> Option<&CoinQuote> {
        self.quotes
            .iter()
            .find(|q| q.symbol.eq_ignore_ascii_case(symbol))
    }
}
