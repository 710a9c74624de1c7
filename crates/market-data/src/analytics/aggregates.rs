use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::metrics;
use crate::errors::MarketDataError;
use crate::models::ListingQuote;

const LISTINGS_SOURCE: &str = "LISTINGS";

/// Snapshot-wide figures computed once per snapshot and shared by every
/// per-row classification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotAggregates {
    pub count: usize,
    pub mean_percent_change_24h: Decimal,
    pub mean_volatility_score: Decimal,
    pub mean_volume_millions: Decimal,
    pub mean_price: Decimal,
    pub mean_market_cap: Decimal,
    pub mean_volume_24h: Decimal,
    pub total_market_cap: Decimal,
    pub total_volume_millions: Decimal,
}

impl SnapshotAggregates {
    /// Means over zero rows are undefined, so an empty table is reported as
    /// [`MarketDataError::DegenerateSnapshot`] instead of dividing by zero.
    pub fn compute(listings: &[ListingQuote]) -> Result<Self, MarketDataError> {
        if listings.is_empty() {
            return Err(MarketDataError::DegenerateSnapshot);
        }

        let count = listings.len();
        let n = Decimal::from(count as u64);

        let total_change = checked_total(listings, "percent change", |l| l.percent_change_24h)?;
        let total_volatility = checked_total(listings, "volatility", |l| {
            metrics::volatility_score(l.percent_change_24h)
        })?;
        let total_volume = checked_total(listings, "24h volume", |l| l.volume_24h)?;
        let total_price = checked_total(listings, "price", |l| l.price)?;
        let total_market_cap = checked_total(listings, "market cap", |l| l.market_cap)?;
        let total_volume_millions = checked_total(listings, "24h volume", |l| {
            metrics::volume_millions(l.volume_24h)
        })?;

        Ok(Self {
            count,
            mean_percent_change_24h: checked_mean(total_change, n)?,
            mean_volatility_score: checked_mean(total_volatility, n)?,
            mean_volume_millions: checked_mean(total_volume_millions, n)?,
            mean_price: checked_mean(total_price, n)?,
            mean_market_cap: checked_mean(total_market_cap, n)?,
            mean_volume_24h: checked_mean(total_volume, n)?,
            total_market_cap,
            total_volume_millions,
        })
    }
}

/// Values that do not fit in a `Decimal` can only come from the listings
/// payload, so overflow is reported against it.
pub(crate) fn out_of_range(what: &str) -> MarketDataError {
    MarketDataError::upstream(LISTINGS_SOURCE, format!("Listing {} is out of range", what))
}

fn checked_total(
    listings: &[ListingQuote],
    what: &str,
    field: impl Fn(&ListingQuote) -> Decimal,
) -> Result<Decimal, MarketDataError> {
    listings
        .iter()
        .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(field(l)))
        .ok_or_else(|| out_of_range(&format!("total {}", what)))
}

fn checked_mean(total: Decimal, n: Decimal) -> Result<Decimal, MarketDataError> {
    total.checked_div(n).ok_or_else(|| out_of_range("mean"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn listing(change: Decimal, volume: Decimal, market_cap: Decimal) -> ListingQuote {
        ListingQuote {
            name: "Coin".to_string(),
            symbol: "COIN".to_string(),
            price: dec!(10),
            market_cap,
            volume_24h: volume,
            percent_change_24h: change,
        }
    }

    #[test]
    fn test_compute_means_and_totals() {
        let listings = vec![
            listing(dec!(4), dec!(1000000), dec!(100)),
            listing(dec!(-2), dec!(2000000), dec!(200)),
            listing(dec!(1), dec!(3000000), dec!(300)),
        ];
        let agg = SnapshotAggregates::compute(&listings).unwrap();

        assert_eq!(agg.count, 3);
        assert_eq!(agg.mean_percent_change_24h, dec!(1));
        assert_eq!(agg.mean_volatility_score, dec!(7) / dec!(3));
        assert_eq!(agg.mean_volume_millions, dec!(2));
        assert_eq!(agg.mean_volume_24h, dec!(2000000));
        assert_eq!(agg.mean_market_cap, dec!(200));
        assert_eq!(agg.total_market_cap, dec!(600));
        assert_eq!(agg.total_volume_millions, dec!(6));
        assert_eq!(agg.mean_price, dec!(10));
    }

    #[test]
    fn test_compute_overflowing_totals_is_an_error() {
        let huge = Decimal::from_scientific("5e27").unwrap();
        let listings: Vec<ListingQuote> = (0..20)
            .map(|_| listing(dec!(1), dec!(1000000), huge))
            .collect();

        let err = SnapshotAggregates::compute(&listings).unwrap_err();
        assert!(matches!(err, MarketDataError::UpstreamUnavailable { .. }));
        assert!(err.to_string().contains("total market cap"));
    }

    #[test]
    fn test_compute_empty_is_degenerate() {
        let result = SnapshotAggregates::compute(&[]);
        assert!(matches!(result, Err(MarketDataError::DegenerateSnapshot)));
    }
}
