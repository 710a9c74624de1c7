//! CoinMarketCap listings client.
//!
//! Fetches the top-N coins from `/v1/cryptocurrency/listings/latest` with the
//! API key sent as the `X-CMC_PRO_API_KEY` header. Each listing carries a
//! `quote` object keyed by currency code; only the configured currency is
//! read.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use super::http::{build_client, send_for_text};
use super::traits::ListingsSource;
use crate::config::MarketDataConfig;
use crate::errors::MarketDataError;
use crate::models::ListingQuote;

const PROVIDER_ID: &str = "COINMARKETCAP";
const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

// ============================================================================
// API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct ListingsResponse {
    data: Vec<ListingItem>,
}

#[derive(Debug, Deserialize)]
struct ListingItem {
    name: String,
    symbol: String,
    quote: HashMap<String, QuoteBlock>,
}

/// Per-currency figures. Price and change are required; cap and volume are
/// `null` for some thinly traded coins.
#[derive(Debug, Deserialize)]
struct QuoteBlock {
    price: Decimal,
    market_cap: Option<Decimal>,
    volume_24h: Option<Decimal>,
    percent_change_24h: Decimal,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    status: Option<ErrorStatus>,
}

#[derive(Debug, Deserialize)]
struct ErrorStatus {
    error_message: Option<String>,
}

fn describe_error(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()?
        .status?
        .error_message
}

/// Parse a listings body into rows for `currency`.
///
/// A listing without a block for `currency` makes the whole body malformed;
/// partial snapshots are never produced.
fn parse_listings(body: &str, currency: &str) -> Result<Vec<ListingQuote>, MarketDataError> {
    let response: ListingsResponse = serde_json::from_str(body).map_err(|e| {
        MarketDataError::upstream(
            PROVIDER_ID,
            format!("Failed to parse listings response: {}", e),
        )
    })?;

    response
        .data
        .into_iter()
        .map(|mut item| {
            let quote = item.quote.remove(currency).ok_or_else(|| {
                MarketDataError::upstream(
                    PROVIDER_ID,
                    format!("Listing {} has no {} quote", item.symbol, currency),
                )
            })?;
            Ok(ListingQuote {
                name: item.name,
                symbol: item.symbol,
                price: quote.price,
                market_cap: quote.market_cap.unwrap_or(Decimal::ZERO),
                volume_24h: quote.volume_24h.unwrap_or(Decimal::ZERO),
                percent_change_24h: quote.percent_change_24h,
            })
        })
        .collect()
}

// ============================================================================
// CoinMarketCapClient
// ============================================================================

pub struct CoinMarketCapClient {
    client: Client,
    url: String,
    api_key: String,
    currency: String,
    start: u32,
    limit: u32,
}

impl CoinMarketCapClient {
    pub fn new(config: &MarketDataConfig) -> Result<Self, MarketDataError> {
        if config.api_key.trim().is_empty() {
            return Err(MarketDataError::Config(
                "CoinMarketCap API key is empty".to_string(),
            ));
        }

        Ok(Self {
            client: build_client(config.request_timeout)?,
            url: config.listings_url.clone(),
            api_key: config.api_key.clone(),
            currency: config.currency.clone(),
            start: config.page_start,
            limit: config.page_size,
        })
    }

    fn query(&self) -> [(&'static str, String); 3] {
        [
            ("start", self.start.to_string()),
            ("limit", self.limit.to_string()),
            ("convert", self.currency.clone()),
        ]
    }
}

#[async_trait]
impl ListingsSource for CoinMarketCapClient {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn currency(&self) -> &str {
        &self.currency
    }

    fn request_key(&self) -> String {
        let params = self
            .query()
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("GET {}?{}", self.url, params)
    }

    async fn fetch_listings(&self) -> Result<Vec<ListingQuote>, MarketDataError> {
        debug!(
            "CoinMarketCap request: top {} from {} in {}",
            self.limit, self.start, self.currency
        );

        let request = self
            .client
            .get(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
            .query(&self.query());

        let body = send_for_text(PROVIDER_ID, request, describe_error).await?;
        let listings = parse_listings(&body, &self.currency)?;

        info!(
            "CoinMarketCap: fetched {} listings in {}",
            listings.len(),
            self.currency
        );
        Ok(listings)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::stub_server::serve_once;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    const BODY: &str = r#"{
        "status": {"error_code": 0, "error_message": null},
        "data": [
            {
                "id": 1,
                "name": "Bitcoin",
                "symbol": "BTC",
                "quote": {
                    "INR": {
                        "price": 5000000.5,
                        "volume_24h": 2500000000,
                        "percent_change_1h": 0.1,
                        "percent_change_24h": -1.25,
                        "market_cap": 98000000000000
                    }
                }
            },
            {
                "id": 2,
                "name": "Tiny Coin",
                "symbol": "TINY",
                "quote": {
                    "INR": {
                        "price": 0.0000123,
                        "volume_24h": null,
                        "percent_change_24h": 12,
                        "market_cap": null
                    }
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_listings() {
        let listings = parse_listings(BODY, "INR").unwrap();
        assert_eq!(listings.len(), 2);

        let btc = &listings[0];
        assert_eq!(btc.name, "Bitcoin");
        assert_eq!(btc.symbol, "BTC");
        assert_eq!(btc.price, dec!(5000000.5));
        assert_eq!(btc.volume_24h, dec!(2500000000));
        assert_eq!(btc.percent_change_24h, dec!(-1.25));
        assert_eq!(btc.market_cap, dec!(98000000000000));
    }

    #[test]
    fn test_parse_listings_null_cap_and_volume_are_zero() {
        let listings = parse_listings(BODY, "INR").unwrap();
        let tiny = &listings[1];
        assert_eq!(tiny.market_cap, Decimal::ZERO);
        assert_eq!(tiny.volume_24h, Decimal::ZERO);
        assert_eq!(tiny.price, dec!(0.0000123));
    }

    #[test]
    fn test_parse_listings_missing_currency_block() {
        let err = parse_listings(BODY, "USD").unwrap_err();
        assert!(matches!(err, MarketDataError::UpstreamUnavailable { .. }));
        assert!(err.to_string().contains("no USD quote"));
    }

    #[test]
    fn test_parse_listings_empty_data() {
        let listings = parse_listings(r#"{"data": []}"#, "INR").unwrap();
        assert!(listings.is_empty());
    }

    #[test]
    fn test_parse_listings_malformed() {
        for body in [
            "not json",
            r#"{"status": {}}"#,
            r#"{"data": [{"name": "X", "symbol": "X", "quote": {"INR": {"price": null, "percent_change_24h": 1}}}]}"#,
        ] {
            let err = parse_listings(body, "INR").unwrap_err();
            assert!(
                matches!(err, MarketDataError::UpstreamUnavailable { .. }),
                "body {:?} gave {:?}",
                body,
                err
            );
        }
    }

    #[test]
    fn test_describe_error() {
        let body = r#"{"status": {"error_code": 1002, "error_message": "API key missing."}}"#;
        assert_eq!(describe_error(body), Some("API key missing.".to_string()));
        assert_eq!(describe_error("<html>bad gateway</html>"), None);
    }

    #[test]
    fn test_request_key_includes_params() {
        let config = MarketDataConfig::new("secret");
        let client = CoinMarketCapClient::new(&config).unwrap();
        assert_eq!(client.id(), "COINMARKETCAP");
        assert_eq!(client.currency(), "INR");
        assert_eq!(
            client.request_key(),
            "GET https://pro-api.coinmarketcap.com/v1/cryptocurrency/listings/latest?start=1&limit=50&convert=INR"
        );
        assert!(!client.request_key().contains("secret"));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let config = MarketDataConfig::new(" ");
        assert!(matches!(
            CoinMarketCapClient::new(&config),
            Err(MarketDataError::Config(_))
        ));
    }

    fn client_for(addr: std::net::SocketAddr) -> CoinMarketCapClient {
        let mut config = MarketDataConfig::new("secret");
        config.listings_url = format!("http://{}/v1/cryptocurrency/listings/latest", addr);
        config.request_timeout = Duration::from_secs(1);
        CoinMarketCapClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_listings_from_server() {
        let body = r#"{"data": [{"name": "Bitcoin", "symbol": "BTC", "quote": {"INR": {"price": 10, "volume_24h": 5, "percent_change_24h": 1, "market_cap": 100}}}]}"#;
        let addr = serve_once(200, body, Duration::ZERO).await;

        let listings = client_for(addr).fetch_listings().await.unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].symbol, "BTC");
        assert_eq!(listings[0].market_cap, dec!(100));
    }

    #[tokio::test]
    async fn test_fetch_listings_server_error_uses_status_message() {
        let body = r#"{"status": {"error_code": 500, "error_message": "boom"}}"#;
        let addr = serve_once(500, body, Duration::ZERO).await;

        let err = client_for(addr).fetch_listings().await.unwrap_err();
        assert!(matches!(err, MarketDataError::UpstreamUnavailable { .. }));
        let message = err.to_string();
        assert!(message.contains("COINMARKETCAP"), "{}", message);
        assert!(message.contains("HTTP 500"), "{}", message);
        assert!(message.contains("boom"), "{}", message);
    }

    #[tokio::test]
    async fn test_fetch_listings_timeout() {
        let addr = serve_once(200, r#"{"data": []}"#, Duration::from_secs(3)).await;

        let err = client_for(addr).fetch_listings().await.unwrap_err();
        assert!(matches!(err, MarketDataError::UpstreamUnavailable { .. }));
        assert!(err.to_string().contains("timed out"), "{}", err);
    }

    #[tokio::test]
    async fn test_fetch_listings_malformed_body() {
        let addr = serve_once(200, r#"{"data": "nope"}"#, Duration::ZERO).await;

        let err = client_for(addr).fetch_listings().await.unwrap_err();
        assert!(matches!(err, MarketDataError::UpstreamUnavailable { .. }));
        assert!(err.to_string().contains("Failed to parse"), "{}", err);
    }
}
