use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{CoinId, Currency, Symbol};

/// A single price observation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

/// Short price history for one coin, strictly ascending by timestamp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySeries {
    pub symbol: Symbol,
    pub coin_id: CoinId,
    pub currency: Currency,
    pub days: u32,
    pub fetched_at: DateTime<Utc>,
    pub points: Vec<HistoryPoint>,
}

impl HistorySeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&HistoryPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&HistoryPoint> {
        self.points.last()
    }

    /// Percent change from the first to the last point of the window.
    ///
    /// `None` with fewer than two points, a zero opening price, or a result
    /// that does not fit in a `Decimal`.
    pub fn change_percent(&self) -> Option<Decimal> {
        let first = self.first()?;
        let last = self.last()?;
        if self.points.len() < 2 || first.price.is_zero() {
            return None;
        }
        last.price
            .checked_sub(first.price)?
            .checked_div(first.price)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }
}
