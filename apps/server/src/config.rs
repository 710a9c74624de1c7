use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use coinpulse_market_data::MarketDataConfig;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub market_data: MarketDataConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("COINPULSE_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid COINPULSE_LISTEN_ADDR")?;
        let cors_allow = std::env::var("COINPULSE_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("COINPULSE_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let market_data = MarketDataConfig::from_env()?;
        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            market_data,
        })
    }
}
