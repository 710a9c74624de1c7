use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use coinpulse_market_data::{CoinInsight, HistorySeries};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinView {
    #[serde(flatten)]
    insight: CoinInsight,
    history_supported: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    #[serde(flatten)]
    series: Arc<HistorySeries>,
    /// First-to-last change over the window, when defined.
    change_percent: Option<Decimal>,
}

/// Symbols with a price-history mapping, sorted.
async fn list_supported(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let mut symbols: Vec<String> = state
        .history_provider
        .symbol_map()
        .symbols()
        .map(String::from)
        .collect();
    symbols.sort();
    Json(symbols)
}

async fn get_coin(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CoinView>> {
    let snapshot = state.snapshot_provider.get_snapshot().await?;
    let insight = CoinInsight::from_snapshot(&snapshot, &symbol).ok_or_else(|| {
        ApiError::NotFound(format!("{} is not in the current market snapshot", symbol))
    })?;
    let history_supported = state.history_provider.supports(&symbol);
    Ok(Json(CoinView {
        insight,
        history_supported,
    }))
}

async fn get_coin_history(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<HistoryView>> {
    let series = state.history_provider.get_history(&symbol).await?;
    let change_percent = series.change_percent();
    Ok(Json(HistoryView {
        series,
        change_percent,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/coins/supported", get(list_supported))
        .route("/coins/{symbol}", get(get_coin))
        .route("/coins/{symbol}/history", get(get_coin_history))
}
