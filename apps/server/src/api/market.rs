use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use coinpulse_market_data::{
    analytics::{by_market_cap, DEFAULT_TOP_MOVERS},
    CoinQuote, CorrelationMatrix, MarketRegime, MarketSignal, MarketSummary, SnapshotAggregates,
    SnapshotFilter,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const MAX_TOP_MOVERS: usize = 50;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotQuery {
    min_change: Option<String>,
    max_change: Option<String>,
    /// Comma-separated signal labels, e.g. `Bullish,Neutral`.
    signals: Option<String>,
}

fn parse_change(name: &str, raw: Option<&str>) -> ApiResult<Option<Decimal>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => Decimal::from_str(raw)
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("Invalid {}: {}", name, raw))),
    }
}

impl SnapshotQuery {
    fn to_filter(&self) -> ApiResult<SnapshotFilter> {
        let min = parse_change("minChange", self.min_change.as_deref())?;
        let max = parse_change("maxChange", self.max_change.as_deref())?;
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ApiError::BadRequest(format!(
                    "minChange {} is greater than maxChange {}",
                    min, max
                )));
            }
        }

        let mut filter = SnapshotFilter::unbounded().with_change_range(min, max);
        if let Some(raw) = self.signals.as_deref() {
            let signals = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(MarketSignal::from_str)
                .collect::<Result<Vec<_>, _>>()
                .map_err(ApiError::BadRequest)?;
            filter = filter.with_signals(signals);
        }
        Ok(filter)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotView {
    fetched_at: DateTime<Utc>,
    currency: String,
    regime: MarketRegime,
    aggregates: SnapshotAggregates,
    filter: SnapshotFilter,
    total_count: usize,
    quotes: Vec<CoinQuote>,
}

async fn get_snapshot(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SnapshotQuery>,
) -> ApiResult<Json<SnapshotView>> {
    let filter = query.to_filter()?;
    let snapshot = state.snapshot_provider.get_snapshot().await?;
    let quotes = filter.apply(&snapshot).into_iter().cloned().collect();
    Ok(Json(SnapshotView {
        fetched_at: snapshot.fetched_at,
        currency: snapshot.currency.clone(),
        regime: snapshot.regime,
        aggregates: snapshot.aggregates.clone(),
        total_count: snapshot.len(),
        filter,
        quotes,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    movers: Option<usize>,
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<MarketSummary>> {
    let movers = query
        .movers
        .unwrap_or(DEFAULT_TOP_MOVERS)
        .min(MAX_TOP_MOVERS);
    let snapshot = state.snapshot_provider.get_snapshot().await?;
    Ok(Json(MarketSummary::from_snapshot(&snapshot, movers)))
}

async fn get_liquidity(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<CoinQuote>>> {
    let snapshot = state.snapshot_provider.get_snapshot().await?;
    Ok(Json(by_market_cap(&snapshot).into_iter().cloned().collect()))
}

async fn get_correlation(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CorrelationMatrix>> {
    let snapshot = state.snapshot_provider.get_snapshot().await?;
    Ok(Json(CorrelationMatrix::from_snapshot(&snapshot)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/market/snapshot", get(get_snapshot))
        .route("/market/summary", get(get_summary))
        .route("/market/liquidity", get(get_liquidity))
        .route("/market/correlation", get(get_correlation))
}
