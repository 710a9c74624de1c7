//! Pearson correlation between the numeric snapshot columns.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CoinQuote, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationField {
    Price,
    MarketCap,
    Volume24h,
    PercentChange24h,
    VolatilityScore,
}

impl CorrelationField {
    pub const ALL: [CorrelationField; 5] = [
        Self::Price,
        Self::MarketCap,
        Self::Volume24h,
        Self::PercentChange24h,
        Self::VolatilityScore,
    ];

    fn value(&self, quote: &CoinQuote) -> Decimal {
        match self {
            Self::Price => quote.price,
            Self::MarketCap => quote.market_cap,
            Self::Volume24h => quote.volume_24h,
            Self::PercentChange24h => quote.percent_change_24h,
            Self::VolatilityScore => quote.volatility_score,
        }
    }
}

/// Square matrix indexed by [`CorrelationField::ALL`] order.
///
/// A cell is `None` when the correlation is undefined: fewer than two rows
/// or a column with zero variance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub fields: Vec<CorrelationField>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let columns: Vec<Vec<f64>> = CorrelationField::ALL
            .iter()
            .map(|field| {
                snapshot
                    .quotes
                    .iter()
                    .map(|q| field.value(q).to_f64().unwrap_or(f64::NAN))
                    .collect()
            })
            .collect();

        let values = columns
            .iter()
            .map(|xs| columns.iter().map(|ys| pearson(xs, ys)).collect())
            .collect();

        Self {
            fields: CorrelationField::ALL.to_vec(),
            values,
        }
    }

    pub fn get(&self, a: CorrelationField, b: CorrelationField) -> Option<f64> {
        let i = self.fields.iter().position(|f| *f == a)?;
        let j = self.fields.iter().position(|f| *f == b)?;
        self.values.get(i)?.get(j).copied().flatten()
    }
}

pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if r.is_finite() {
        Some(r.clamp(-1.0, 1.0))
    } else {
        None
    }
}
