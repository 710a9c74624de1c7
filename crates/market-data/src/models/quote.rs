use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::signal::MarketSignal;
use crate::analytics::{metrics, out_of_range, SnapshotAggregates};
use crate::errors::MarketDataError;

/// One coin exactly as the listings upstream reported it, already narrowed to
/// the configured quote currency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuote {
    pub name: String,
    pub symbol: String,
    pub price: Decimal,
    pub market_cap: Decimal,
    pub volume_24h: Decimal,
    pub percent_change_24h: Decimal,
}

/// One row of a market snapshot: the fetched fields plus everything derived
/// from them.
///
/// Derived fields are pure functions of the fetched ones and are recomputed
/// every time a snapshot is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinQuote {
    pub name: String,
    pub symbol: String,
    pub price: Decimal,
    pub market_cap: Decimal,
    pub volume_24h: Decimal,
    pub percent_change_24h: Decimal,

    /// `price * (1 + change / 100)`
    pub high_24h: Decimal,
    /// `price * (1 - |change| / 100)`
    pub low_24h: Decimal,
    /// `volume_24h / 1e6`
    pub volume_millions: Decimal,
    /// `|change|`
    pub volatility_score: Decimal,
    pub market_signal: MarketSignal,
}

impl CoinQuote {
    /// Derive a snapshot row from a listing.
    ///
    /// `aggregates` must describe the snapshot the listing belongs to; the
    /// market signal compares this coin against the snapshot mean volume.
    /// A synthetic high or low that overflows fails the row.
    pub fn derive(
        listing: ListingQuote,
        aggregates: &SnapshotAggregates,
    ) -> Result<Self, MarketDataError> {
        let change = listing.percent_change_24h;
        let volume_millions = metrics::volume_millions(listing.volume_24h);
        let volatility_score = metrics::volatility_score(change);
        let market_signal = crate::analytics::classify_signal(
            change,
            volume_millions,
            volatility_score,
            aggregates.mean_volume_millions,
        );

        let high_24h = metrics::high_24h(listing.price, change)
            .ok_or_else(|| out_of_range(&format!("{} 24h high", listing.symbol)))?;
        let low_24h = metrics::low_24h(listing.price, change)
            .ok_or_else(|| out_of_range(&format!("{} 24h low", listing.symbol)))?;

        Ok(Self {
            high_24h,
            low_24h,
            volume_millions,
            volatility_score,
            market_signal,
            name: listing.name,
            symbol: listing.symbol,
            price: listing.price,
            market_cap: listing.market_cap,
            volume_24h: listing.volume_24h,
            percent_change_24h: change,
        })
    }
}
