use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::classify::volatility_level;
use crate::models::{CoinQuote, Snapshot, VolatilityLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonMetric {
    Price,
    MarketCap,
    Volume,
    PercentChange24h,
}

/// One coin's figure next to the snapshot mean.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub metric: ComparisonMetric,
    pub coin: Decimal,
    pub market_average: Decimal,
}

/// Everything the single-coin view shows about one row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinInsight {
    pub coin: CoinQuote,
    pub volatility_level: VolatilityLevel,
    /// 1-based position by market cap within the snapshot.
    pub market_cap_rank: usize,
    pub comparison: Vec<ComparisonRow>,
}

impl CoinInsight {
    /// `None` when the symbol is not part of the snapshot.
    pub fn from_snapshot(snapshot: &Snapshot, symbol: &str) -> Option<Self> {
        let coin = snapshot.find(symbol)?;
        let agg = &snapshot.aggregates;

        let market_cap_rank = 1 + snapshot
            .quotes
            .iter()
            .filter(|q| q.market_cap > coin.market_cap)
            .count();

        let comparison = vec![
            ComparisonRow {
                metric: ComparisonMetric::Price,
                coin: coin.price,
                market_average: agg.mean_price,
            },
            ComparisonRow {
                metric: ComparisonMetric::MarketCap,
                coin: coin.market_cap,
                market_average: agg.mean_market_cap,
            },
            ComparisonRow {
                metric: ComparisonMetric::Volume,
                coin: coin.volume_24h,
                market_average: agg.mean_volume_24h,
            },
            ComparisonRow {
                metric: ComparisonMetric::PercentChange24h,
                coin: coin.percent_change_24h,
                market_average: agg.mean_percent_change_24h,
            },
        ];

        Some(Self {
            volatility_level: volatility_level(coin.volatility_score),
            market_cap_rank,
            comparison,
            coin: coin.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingQuote;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn snapshot() -> Snapshot {
        let listings = vec![
            ListingQuote {
                name: "Bitcoin".to_string(),
                symbol: "BTC".to_string(),
                price: dec!(5000000),
                market_cap: dec!(900),
                volume_24h: dec!(3000000),
                percent_change_24h: dec!(1.5),
            },
            ListingQuote {
                name: "Ethereum".to_string(),
                symbol: "ETH".to_string(),
                price: dec!(250000),
                market_cap: dec!(300),
                volume_24h: dec!(1000000),
                percent_change_24h: dec!(-6.5),
            },
        ];
        Snapshot::from_listings(listings, "INR", Utc::now()).unwrap()
    }

    #[test]
    fn test_insight_for_known_coin() {
        let snap = snapshot();
        let insight = CoinInsight::from_snapshot(&snap, "eth").unwrap();

        assert_eq!(insight.coin.symbol, "ETH");
        assert_eq!(insight.volatility_level, VolatilityLevel::High);
        assert_eq!(insight.market_cap_rank, 2);
        assert_eq!(insight.comparison.len(), 4);

        let change = &insight.comparison[3];
        assert_eq!(change.metric, ComparisonMetric::PercentChange24h);
        assert_eq!(change.coin, dec!(-6.5));
        assert_eq!(change.market_average, dec!(-2.5));

        let price = &insight.comparison[0];
        assert_eq!(price.market_average, dec!(2625000));
    }

    #[test]
    fn test_insight_for_unknown_coin() {
        assert!(CoinInsight::from_snapshot(&snapshot(), "DOGE").is_none());
    }
}
