//! Binance REST client: candle history plus the auxiliary futures-market
//! inputs (funding rate, open interest, order-book depth).

use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::{Candle, MarketDepth};

/// Binance ticker price response.
#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

/// Binance futures premium-index response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PremiumIndex {
    last_funding_rate: String,
}

/// Binance futures open-interest response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenInterest {
    open_interest: String,
}

/// Binance order-book depth response. Levels are [price, quantity] pairs.
#[derive(Debug, Deserialize)]
struct DepthSnapshot {
    bids: Vec<(String, String)>,
    asks: Vec<(String, String)>,
}

/// Binance REST client.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    spot_url: String,
    futures_url: String,
}

impl BinanceClient {
    /// Create a new Binance client.
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .user_agent("Augury/1.0")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            spot_url: config.binance_spot_url.clone(),
            futures_url: config.binance_futures_url.clone(),
        }
    }

    /// Fetch the candle window for a symbol (chronological order).
    pub async fn fetch_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>> {
        let url = format!(
            "{}/klines?symbol={}&interval={}&limit={}",
            self.spot_url, symbol, interval, limit
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Binance klines returned {}",
                response.status()
            )));
        }

        // Each kline row is a heterogeneous array:
        // [openTime, open, high, low, close, volume, closeTime, ...]
        let rows: Vec<Vec<serde_json::Value>> = response.json().await?;
        let mut candles = Vec::with_capacity(rows.len());

        for row in &rows {
            if row.len() < 6 {
                warn!("skipping malformed kline row with {} fields", row.len());
                continue;
            }
            candles.push(Candle {
                time: row[0].as_i64().unwrap_or(0),
                open: value_as_f64(&row[1]),
                high: value_as_f64(&row[2]),
                low: value_as_f64(&row[3]),
                close: value_as_f64(&row[4]),
                volume: value_as_f64(&row[5]),
            });
        }

        if candles.is_empty() {
            return Err(AppError::ExternalApi(format!(
                "Binance returned no candles for {}",
                symbol
            )));
        }

        Ok(candles)
    }

    /// Fetch the latest trade price for a symbol.
    pub async fn fetch_price(&self, symbol: &str) -> Result<f64> {
        let url = format!("{}/ticker/price?symbol={}", self.spot_url, symbol);
        let ticker: TickerPrice = self.get_json(&url).await?;
        Ok(ticker.price.parse().unwrap_or(0.0))
    }

    /// Fetch the current funding rate as a percentage.
    pub async fn fetch_funding_rate(&self, symbol: &str) -> Result<f64> {
        let url = format!("{}/premiumIndex?symbol={}", self.futures_url, symbol);
        let index: PremiumIndex = self.get_json(&url).await?;
        Ok(index.last_funding_rate.parse::<f64>().unwrap_or(0.0) * 100.0)
    }

    /// Fetch open interest in contracts.
    pub async fn fetch_open_interest(&self, symbol: &str) -> Result<f64> {
        let url = format!("{}/openInterest?symbol={}", self.futures_url, symbol);
        let oi: OpenInterest = self.get_json(&url).await?;
        Ok(oi.open_interest.parse().unwrap_or(0.0))
    }

    /// Fetch order-book depth and reduce it to buy/sell notional pressure.
    pub async fn fetch_market_depth(&self, symbol: &str, limit: u32) -> Result<MarketDepth> {
        let url = format!("{}/depth?symbol={}&limit={}", self.spot_url, symbol, limit);
        let depth: DepthSnapshot = self.get_json(&url).await?;

        Ok(MarketDepth {
            buy_pressure: notional_sum(&depth.bids),
            sell_pressure: notional_sum(&depth.asks),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(
                "Binance API returned {}: {}",
                status,
                &text[..text.len().min(200)]
            );
            return Err(AppError::ExternalApi(format!("Binance API error: {}", status)));
        }

        Ok(response.json().await?)
    }
}

/// Sum price * quantity over order-book levels.
fn notional_sum(levels: &[(String, String)]) -> f64 {
    levels
        .iter()
        .map(|(price, quantity)| {
            price.parse::<f64>().unwrap_or(0.0) * quantity.parse::<f64>().unwrap_or(0.0)
        })
        .sum()
}

/// Binance encodes most numbers as strings; accept either form.
fn value_as_f64(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::String(s) => s.parse().unwrap_or(0.0),
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    }
}
