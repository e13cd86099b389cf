//! Advice orchestration: assembles market snapshots, routes them to the
//! configured advice engine, and caches the result.
//!
//! The rule-based strategy engine and the language-model endpoint are two
//! equally valid providers behind this service. The request (or config)
//! picks one; a language-model failure falls back to the rule-based engine
//! and the response reports which engine actually answered.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::analysis;
use crate::config::Config;
use crate::error::Result;
use crate::sources::{BinanceClient, OpenAiClient};
use crate::types::{
    closes, volumes, AdviceResponse, AdviceSource, Bands, Candle, CandlePatterns,
    FibonacciLevels, HistoricalPoint, MarketDepth, MarketSnapshot, Pattern,
    StochasticSnapshot, SupportResistance, TradingAdvice, VolumeProfile, WaveAnalysis,
};

/// Everything the charting endpoint needs in one computation pass.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorBundle {
    pub current_price: f64,
    pub ma50: f64,
    pub ma200: f64,
    pub rsi: Vec<f64>,
    pub macd: f64,
    pub bands: Bands,
    pub stochastic_k: Vec<f64>,
    pub obv: Vec<f64>,
    pub rate_of_change: Vec<f64>,
    pub support_resistance: SupportResistance,
    pub fibonacci_levels: FibonacciLevels,
    pub pivots: Vec<crate::types::Pivot>,
    pub waves: Option<WaveAnalysis>,
    pub volume_profile: VolumeProfile,
    pub patterns: Vec<Pattern>,
    pub candle_patterns: CandlePatterns,
    pub market_sentiment: f64,
}

/// Cache entry for a computed advice.
struct CachedAdvice {
    response: AdviceResponse,
    computed_at: i64,
}

/// Service producing trading advice and chart indicators.
pub struct AdvisorService {
    config: Arc<Config>,
    binance: BinanceClient,
    openai: Option<OpenAiClient>,
    /// Cache key format: "{symbol}:{source}"
    cache: DashMap<String, CachedAdvice>,
}

impl AdvisorService {
    /// Create a new advisor service.
    pub fn new(config: Arc<Config>) -> Arc<Self> {
        let binance = BinanceClient::new(&config);
        let openai = OpenAiClient::from_config(&config);

        if openai.is_none() {
            debug!("no language-model key configured; advice is rule-based only");
        }

        Arc::new(Self {
            config,
            binance,
            openai,
            cache: DashMap::new(),
        })
    }

    /// Fetch the configured candle window for a symbol.
    pub async fn fetch_candles(&self, symbol: &str) -> Result<Vec<Candle>> {
        self.binance
            .fetch_klines(symbol, &self.config.kline_interval, self.config.kline_limit)
            .await
    }

    /// Compute the full indicator bundle for a candle window.
    pub fn indicators(&self, candles: &[Candle]) -> IndicatorBundle {
        indicator_bundle(candles, self.config.kline_step_ms())
    }

    /// Produce trading advice for a symbol, honoring an optional source
    /// override from the request.
    pub async fn get_advice(
        &self,
        symbol: &str,
        source_override: Option<AdviceSource>,
    ) -> Result<AdviceResponse> {
        let requested = source_override.unwrap_or(self.config.advice_source);
        let cache_key = format!("{}:{}", symbol.to_uppercase(), requested.label());
        let now = chrono::Utc::now().timestamp_millis();

        if let Some(cached) = self.cache.get(&cache_key) {
            if now - cached.computed_at < self.config.advice_cache_ttl_ms {
                return Ok(cached.response.clone());
            }
        }

        let response = self.compute_advice(symbol, requested).await?;
        self.cache.insert(
            cache_key,
            CachedAdvice {
                response: response.clone(),
                computed_at: now,
            },
        );

        Ok(response)
    }

    /// Drop cached advice for a symbol (all sources).
    pub fn invalidate(&self, symbol: &str) {
        let prefix = symbol.to_uppercase();
        self.cache.retain(|k, _| !k.starts_with(&prefix));
    }

    async fn compute_advice(
        &self,
        symbol: &str,
        requested: AdviceSource,
    ) -> Result<AdviceResponse> {
        let candles = self.fetch_candles(symbol).await?;

        let current_price = match self.binance.fetch_price(symbol).await {
            Ok(price) if price > 0.0 => price,
            Ok(_) | Err(_) => {
                // The last close is a serviceable stand-in for the ticker.
                candles.last().map(|c| c.close).unwrap_or(0.0)
            }
        };

        let step_ms = self.config.kline_step_ms();

        let (advice, actual_source) = match (requested, &self.openai) {
            (AdviceSource::LanguageModel, Some(client)) => {
                let snapshot = self.assemble_snapshot(symbol, &candles, current_price).await;
                match client.advise(&snapshot).await {
                    Ok(advice) => (advice, AdviceSource::LanguageModel),
                    Err(e) => {
                        warn!("language-model advice failed, falling back: {}", e);
                        (
                            rule_based_advice(&candles, current_price, step_ms),
                            AdviceSource::RuleBased,
                        )
                    }
                }
            }
            (AdviceSource::LanguageModel, None) => {
                warn!("language-model advice requested but not configured");
                (
                    rule_based_advice(&candles, current_price, step_ms),
                    AdviceSource::RuleBased,
                )
            }
            (AdviceSource::RuleBased, _) => (
                rule_based_advice(&candles, current_price, step_ms),
                AdviceSource::RuleBased,
            ),
        };

        Ok(AdviceResponse {
            symbol: symbol.to_uppercase(),
            source: actual_source,
            advice,
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
    }

    /// Assemble the advice payload, fetching the auxiliary futures-market
    /// inputs concurrently. Each input independently defaults to zero when
    /// its fetch fails.
    async fn assemble_snapshot(
        &self,
        symbol: &str,
        candles: &[Candle],
        current_price: f64,
    ) -> MarketSnapshot {
        let (funding_rate, open_interest, market_depth) = tokio::join!(
            self.binance.fetch_funding_rate(symbol),
            self.binance.fetch_open_interest(symbol),
            self.binance.fetch_market_depth(symbol, self.config.depth_limit),
        );

        let funding_rate = funding_rate.unwrap_or_else(|e| {
            warn!("funding rate unavailable: {}", e);
            0.0
        });
        let open_interest = open_interest.unwrap_or_else(|e| {
            warn!("open interest unavailable: {}", e);
            0.0
        });
        let market_depth = market_depth.unwrap_or_else(|e| {
            warn!("market depth unavailable: {}", e);
            MarketDepth::default()
        });

        build_snapshot(
            symbol,
            candles,
            current_price,
            market_depth,
            funding_rate,
            open_interest,
        )
    }
}

/// Run the rule-based strategy engine over a candle window.
///
/// Pure given its inputs: pattern timestamps derive from the final candle,
/// not the wall clock.
pub fn rule_based_advice(candles: &[Candle], current_price: f64, step_ms: i64) -> TradingAdvice {
    let prices = closes(candles);
    let vols = volumes(candles);

    let rsi_values = analysis::default_rsi(&prices);
    let macd_value = analysis::macd(&prices);
    let bands = analysis::default_bollinger_bands(&prices);
    let patterns = analysis::price_patterns(&prices, series_end_time(candles, step_ms), step_ms);

    analysis::analyze_trading_strategy(
        current_price,
        &rsi_values,
        macd_value,
        bands,
        &patterns,
        &vols,
    )
}

/// Compute every chart indicator for a candle window in one pass.
pub fn indicator_bundle(candles: &[Candle], step_ms: i64) -> IndicatorBundle {
    let prices = closes(candles);
    let vols = volumes(candles);
    let end_time = series_end_time(candles, step_ms);

    let current_price = prices.last().copied().unwrap_or(0.0);
    let rsi_values = analysis::default_rsi(&prices);
    let macd_value = analysis::macd(&prices);
    let bands = analysis::default_bollinger_bands(&prices);
    let last_rsi = rsi_values.last().copied().unwrap_or(50.0);

    IndicatorBundle {
        current_price,
        ma50: analysis::moving_average(&prices, 50),
        ma200: analysis::moving_average(&prices, 200),
        macd: macd_value,
        stochastic_k: analysis::stochastic_k(&prices, 14),
        obv: analysis::on_balance_volume(&prices, &vols),
        rate_of_change: analysis::rate_of_change(&prices, 14),
        support_resistance: analysis::support_resistance(&prices),
        fibonacci_levels: analysis::fibonacci_levels(&prices).unwrap_or_default(),
        pivots: analysis::find_pivots(&prices),
        waves: analysis::elliott_waves(&prices),
        volume_profile: analysis::volume_profile(&prices, &vols),
        patterns: analysis::price_patterns(&prices, end_time, step_ms),
        candle_patterns: analysis::candle_patterns(candles),
        market_sentiment: analysis::market_sentiment(
            last_rsi,
            macd_value,
            current_price,
            bands.upper,
            bands.lower,
        ),
        rsi: rsi_values,
        bands,
    }
}

/// Build the advice payload from a candle window and the auxiliary inputs.
pub fn build_snapshot(
    symbol: &str,
    candles: &[Candle],
    current_price: f64,
    market_depth: MarketDepth,
    funding_rate: f64,
    open_interest: f64,
) -> MarketSnapshot {
    let prices = closes(candles);
    let vols = volumes(candles);

    let rsi_values = analysis::default_rsi(&prices);
    let macd_value = analysis::macd(&prices);
    let bands = analysis::default_bollinger_bands(&prices);
    let last_rsi = rsi_values.last().copied().unwrap_or(50.0);

    let stochastic_values = analysis::stochastic_k(&prices, 14);
    let k = stochastic_values.last().copied().unwrap_or(50.0);
    let d = if stochastic_values.is_empty() {
        50.0
    } else {
        let start = stochastic_values.len().saturating_sub(3);
        let tail = &stochastic_values[start..];
        tail.iter().sum::<f64>() / tail.len() as f64
    };

    let obv_values = analysis::on_balance_volume(&prices, &vols);

    let first_price = prices.first().copied().unwrap_or(0.0);
    let price_change_24h = if first_price > 0.0 {
        (current_price - first_price) / first_price * 100.0
    } else {
        0.0
    };

    let latest_volume = vols.last().copied().unwrap_or(0.0);
    let first_volume = vols.first().copied().unwrap_or(0.0);
    let volume_change_24h = if first_volume > 0.0 {
        (latest_volume - first_volume) / first_volume * 100.0
    } else {
        0.0
    };

    let historical = candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            let prefix = &prices[..=i];
            let point_bands = analysis::default_bollinger_bands(prefix);
            HistoricalPoint {
                time: candle.time,
                price: candle.close,
                volume: candle.volume,
                rsi: rsi_values.get(i).copied().unwrap_or(50.0),
                macd: analysis::macd(prefix),
                bollinger_upper: point_bands.upper,
                bollinger_lower: point_bands.lower,
            }
        })
        .collect();

    MarketSnapshot {
        symbol: symbol.to_uppercase(),
        price: current_price,
        price_change_24h,
        volume: latest_volume,
        volume_change_24h,
        rsi: last_rsi,
        macd: macd_value,
        ma50: analysis::moving_average(&prices, 50),
        ma200: analysis::moving_average(&prices, 200),
        bands,
        market_sentiment: analysis::market_sentiment(
            last_rsi,
            macd_value,
            current_price,
            bands.upper,
            bands.lower,
        ),
        stochastic: StochasticSnapshot { k, d },
        obv: obv_values.last().copied().unwrap_or(0.0),
        price_patterns: analysis::candle_patterns(candles),
        pattern_confidence: analysis::pattern_strength(&prices),
        market_depth,
        funding_rate,
        open_interest,
        fibonacci_levels: analysis::fibonacci_levels(&prices).unwrap_or_default(),
        historical,
    }
}

/// Timestamp of the slot after the final candle, used to reconstruct
/// per-sample pattern times.
fn series_end_time(candles: &[Candle], step_ms: i64) -> i64 {
    candles.last().map(|c| c.time + step_ms).unwrap_or(0)
}
