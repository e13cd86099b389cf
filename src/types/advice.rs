use serde::{Deserialize, Serialize};

use super::{Bands, CandlePatterns, FibonacciLevels, MarketDepth};

/// Which engine produces the trading advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceSource {
    /// Local deterministic strategy engine.
    #[default]
    RuleBased,
    /// External language-model endpoint (falls back to rule-based on error).
    LanguageModel,
}

impl AdviceSource {
    /// Parse from a query/env string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rule_based" | "rule" | "local" => Some(Self::RuleBased),
            "language_model" | "llm" | "gpt" => Some(Self::LanguageModel),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::RuleBased => "rule_based",
            Self::LanguageModel => "language_model",
        }
    }
}

/// Narrative sections of a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub trend: String,
    pub technical: String,
    pub volume: String,
    pub conclusion: String,
}

/// The externally consumed recommendation.
///
/// Prices are formatted strings so the rule-based engine and the
/// language-model endpoint produce the same wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingAdvice {
    pub buy_target: String,
    pub stop_loss: String,
    pub take_profit: String,
    pub analysis: MarketAnalysis,
}

impl TradingAdvice {
    /// Shape check for advice parsed from an external endpoint.
    pub fn is_complete(&self) -> bool {
        !self.buy_target.is_empty()
            && !self.stop_loss.is_empty()
            && !self.take_profit.is_empty()
            && !self.analysis.conclusion.is_empty()
    }
}

/// Fast %K / slow %D pair of the stochastic oscillator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StochasticSnapshot {
    pub k: f64,
    pub d: f64,
}

/// One row of the historical window sent to the advice endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPoint {
    pub time: i64,
    pub price: f64,
    pub volume: f64,
    pub rsi: f64,
    pub macd: f64,
    pub bollinger_upper: f64,
    pub bollinger_lower: f64,
}

/// Full indicator snapshot handed to an advice engine.
///
/// Mirrors what the dashboard assembles before requesting advice: current
/// market state, derived indicators, and the auxiliary futures-market inputs
/// (each already defaulted to zero if its fetch failed).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub symbol: String,
    pub price: f64,
    pub price_change_24h: f64,
    pub volume: f64,
    pub volume_change_24h: f64,
    pub rsi: f64,
    pub macd: f64,
    pub ma50: f64,
    pub ma200: f64,
    pub bands: Bands,
    pub market_sentiment: f64,
    pub stochastic: StochasticSnapshot,
    pub obv: f64,
    pub price_patterns: CandlePatterns,
    /// Weighted confidence (0-100) that the latest pattern is meaningful.
    pub pattern_confidence: f64,
    pub market_depth: MarketDepth,
    pub funding_rate: f64,
    pub open_interest: f64,
    pub fibonacci_levels: FibonacciLevels,
    pub historical: Vec<HistoricalPoint>,
}

/// API envelope for an advice computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceResponse {
    pub symbol: String,
    /// The engine that actually produced the advice (after any fallback).
    pub source: AdviceSource,
    pub advice: TradingAdvice,
    /// Unix milliseconds when computed.
    pub timestamp: i64,
}
