//! CoinGecko price history client.
//!
//! Uses `/coins/{id}/market_chart`, which answers with `prices` as
//! `[epochMillis, price]` pairs. Granularity is chosen by CoinGecko from the
//! window length (5-minute points for 1 day, hourly for 2-90 days).

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::header::USER_AGENT;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use super::http::{build_client, send_for_text};
use super::traits::PriceHistorySource;
use crate::config::MarketDataConfig;
use crate::errors::MarketDataError;
use crate::models::HistoryPoint;

const PROVIDER_ID: &str = "COINGECKO";
const CLIENT_USER_AGENT: &str = concat!("coinpulse/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Vec<(i64, Decimal)>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
    status: Option<ErrorStatus>,
}

#[derive(Debug, Deserialize)]
struct ErrorStatus {
    error_message: Option<String>,
}

fn describe_error(body: &str) -> Option<String> {
    let response = serde_json::from_str::<ErrorResponse>(body).ok()?;
    response
        .error
        .or_else(|| response.status.and_then(|s| s.error_message))
}

/// Parse a market chart body into strictly ascending points.
///
/// Points are sorted by time; when two share a timestamp the later one in
/// the payload wins. Out-of-range timestamps are skipped.
fn parse_market_chart(body: &str) -> Result<Vec<HistoryPoint>, MarketDataError> {
    let response: MarketChartResponse = serde_json::from_str(body).map_err(|e| {
        MarketDataError::upstream(
            PROVIDER_ID,
            format!("Failed to parse market chart response: {}", e),
        )
    })?;

    let mut points: Vec<HistoryPoint> = Vec::with_capacity(response.prices.len());
    for (i, (millis, price)) in response.prices.into_iter().enumerate() {
        match Utc.timestamp_millis_opt(millis).single() {
            Some(timestamp) => points.push(HistoryPoint { timestamp, price }),
            None => warn!("Invalid timestamp at index {}: {}", i, millis),
        }
    }

    // Stable sort keeps payload order among equal timestamps.
    points.sort_by_key(|p| p.timestamp);
    let mut deduped: Vec<HistoryPoint> = Vec::with_capacity(points.len());
    for point in points {
        match deduped.last_mut() {
            Some(last) if last.timestamp == point.timestamp => *last = point,
            _ => deduped.push(point),
        }
    }

    Ok(deduped)
}

pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    currency: String,
    days: u32,
}

impl CoinGeckoClient {
    pub fn new(config: &MarketDataConfig) -> Result<Self, MarketDataError> {
        Ok(Self {
            client: build_client(config.request_timeout)?,
            base_url: config.history_url.trim_end_matches('/').to_string(),
            currency: config.currency.clone(),
            days: config.history_days,
        })
    }

    fn chart_url(&self, coin_id: &str) -> String {
        format!(
            "{}/coins/{}/market_chart",
            self.base_url,
            urlencoding::encode(coin_id)
        )
    }
}

#[async_trait]
impl PriceHistorySource for CoinGeckoClient {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn currency(&self) -> &str {
        &self.currency
    }

    fn days(&self) -> u32 {
        self.days
    }

    async fn fetch_price_history(
        &self,
        coin_id: &str,
    ) -> Result<Vec<HistoryPoint>, MarketDataError> {
        let url = self.chart_url(coin_id);
        debug!("CoinGecko request: {} ({} days)", url, self.days);

        let request = self
            .client
            .get(&url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .query(&[
                ("vs_currency", self.currency.to_ascii_lowercase()),
                ("days", self.days.to_string()),
            ]);

        let body = send_for_text(PROVIDER_ID, request, describe_error).await?;
        let points = parse_market_chart(&body)?;

        debug!(
            "CoinGecko: fetched {} points for {} over {} days",
            points.len(),
            coin_id,
            self.days
        );
        Ok(points)
    }
}
