//! Horizontal price levels: pivot-point support/resistance and Fibonacci
//! retracement/extension levels.

use crate::types::{FibonacciLevels, SupportResistance};

/// Classic pivot-point support/resistance over the most recent 100 samples:
/// pivot = (high + low + close) / 3, resistance mirrors the low around the
/// pivot, support mirrors the high. Returns zeros when fewer than 10 samples
/// are available.
pub fn support_resistance(prices: &[f64]) -> SupportResistance {
    if prices.len() < 10 {
        return SupportResistance::default();
    }

    let start = prices.len().saturating_sub(100);
    let recent = &prices[start..];

    let high = recent.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = recent.iter().copied().fold(f64::INFINITY, f64::min);
    let close = recent[recent.len() - 1];

    let pivot = (high + low + close) / 3.0;

    SupportResistance {
        support: pivot - (high - pivot),
        resistance: pivot + (pivot - low),
    }
}

/// Fibonacci levels anchored on the window's high (0%) and low (100%), with
/// extensions projected below the low. Returns None when fewer than 2
/// samples are available; callers substitute `FibonacciLevels::default()`.
pub fn fibonacci_levels(prices: &[f64]) -> Option<FibonacciLevels> {
    if prices.len() < 2 {
        return None;
    }

    let high = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let diff = high - low;

    Some(FibonacciLevels {
        level0: high,
        level236: high - diff * 0.236,
        level382: high - diff * 0.382,
        level500: high - diff * 0.5,
        level618: high - diff * 0.618,
        level786: high - diff * 0.786,
        level1000: low,
        level1128: low - diff * 0.128,
        level1236: low - diff * 0.236,
        level1382: low - diff * 0.382,
        level1500: low - diff * 0.5,
    })
}
