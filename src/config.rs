use std::env;

use crate::types::AdviceSource;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Binance spot REST base URL.
    pub binance_spot_url: String,
    /// Binance futures REST base URL (funding rate, open interest).
    pub binance_futures_url: String,
    /// Default trading pair when a request doesn't name one.
    pub default_symbol: String,
    /// Candle interval requested from the exchange.
    pub kline_interval: String,
    /// Candle window length requested from the exchange.
    pub kline_limit: u32,
    /// Order-book depth levels summed into buy/sell pressure.
    pub depth_limit: u32,
    /// Which engine answers advice requests by default.
    pub advice_source: AdviceSource,
    /// OpenAI-compatible API key (language-model advice disabled when absent).
    pub openai_api_key: Option<String>,
    /// Chat model used for language-model advice.
    pub openai_model: String,
    /// OpenAI-compatible API base URL.
    pub openai_base_url: String,
    /// How long a computed advice stays cached (ms).
    pub advice_cache_ttl_ms: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3001);

        Self {
            host,
            port,
            binance_spot_url: env::var("BINANCE_SPOT_URL")
                .unwrap_or_else(|_| "https://api.binance.com/api/v3".to_string()),
            binance_futures_url: env::var("BINANCE_FUTURES_URL")
                .unwrap_or_else(|_| "https://fapi.binance.com/fapi/v1".to_string()),
            default_symbol: env::var("DEFAULT_SYMBOL")
                .unwrap_or_else(|_| "BTCUSDT".to_string()),
            kline_interval: env::var("KLINE_INTERVAL").unwrap_or_else(|_| "30m".to_string()),
            kline_limit: env::var("KLINE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(48),
            depth_limit: env::var("DEPTH_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            advice_source: env::var("ADVICE_SOURCE")
                .ok()
                .and_then(|v| AdviceSource::from_str(&v))
                .unwrap_or_default(),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            advice_cache_ttl_ms: env::var("ADVICE_CACHE_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60_000),
        }
    }

    /// Milliseconds per candle for the configured interval.
    pub fn kline_step_ms(&self) -> i64 {
        interval_ms(&self.kline_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Parse a Binance-style interval string ("30m", "1h", "4h", "1d") into
/// milliseconds. Unknown strings fall back to 30 minutes.
fn interval_ms(interval: &str) -> i64 {
    let (number, unit) = interval.split_at(interval.len().saturating_sub(1));
    let count: i64 = number.parse().unwrap_or(30);
    match unit {
        "m" => count * 60_000,
        "h" => count * 3_600_000,
        "d" => count * 86_400_000,
        _ => 30 * 60_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_parsing() {
        assert_eq!(interval_ms("30m"), 30 * 60_000);
        assert_eq!(interval_ms("1h"), 3_600_000);
        assert_eq!(interval_ms("4h"), 4 * 3_600_000);
        assert_eq!(interval_ms("1d"), 86_400_000);
        assert_eq!(interval_ms("junk"), 30 * 60_000);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config {
            host: "0.0.0.0".to_string(),
            port: 3001,
            binance_spot_url: "https://api.binance.com/api/v3".to_string(),
            binance_futures_url: "https://fapi.binance.com/fapi/v1".to_string(),
            default_symbol: "BTCUSDT".to_string(),
            kline_interval: "30m".to_string(),
            kline_limit: 48,
            depth_limit: 100,
            advice_source: AdviceSource::RuleBased,
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            advice_cache_ttl_ms: 60_000,
        };

        assert_eq!(config.kline_limit, 48);
        assert_eq!(config.kline_step_ms(), 30 * 60_000);
        assert_eq!(config.advice_source, AdviceSource::RuleBased);
    }
}
