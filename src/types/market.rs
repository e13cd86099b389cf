use serde::{Deserialize, Serialize};

/// A single OHLCV sample as returned by the market-data collaborator.
///
/// Candles arrive chronologically ordered; `time` is unix milliseconds for
/// the open of the interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Extract the closing-price series from a candle window.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Extract the volume series from a candle window.
pub fn volumes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.volume).collect()
}

/// Buy/sell notional pressure aggregated from order-book depth.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDepth {
    pub buy_pressure: f64,
    pub sell_pressure: f64,
}
