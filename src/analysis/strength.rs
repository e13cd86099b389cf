//! Heuristic 0-100 strength scores used to annotate advice payloads.

/// Fraction of consecutive price deltas that keep the previous delta's
/// direction, scaled to 0-100.
pub fn trend_strength(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }

    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let consistent = deltas
        .windows(2)
        .filter(|pair| pair[1].signum() == pair[0].signum())
        .count()
        + 1;

    consistent as f64 / deltas.len() as f64 * 100.0
}

/// Standard deviation of per-sample percent returns, scaled by 10 and capped
/// at 100.
pub fn volatility_strength(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = prices
        .windows(2)
        .map(|w| if w[0] == 0.0 { 0.0 } else { (w[1] - w[0]) / w[0] * 100.0 })
        .collect();

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;

    (variance.sqrt() * 10.0).min(100.0)
}

/// Magnitude of the average signed delta relative to the latest price,
/// scaled by 1000 and capped at 100.
pub fn impulse_strength(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }

    let last = prices[prices.len() - 1];
    if last == 0.0 {
        return 0.0;
    }

    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let avg_change = (deltas.iter().sum::<f64>() / deltas.len() as f64).abs();

    (avg_change / last * 1000.0).min(100.0)
}

/// Absolute full-window rate of change, doubled and capped at 100.
pub fn momentum_strength(prices: &[f64]) -> f64 {
    if prices.len() < 2 || prices[0] == 0.0 {
        return 0.0;
    }

    let roc = (prices[prices.len() - 1] - prices[0]) / prices[0] * 100.0;
    (roc.abs() * 2.0).min(100.0)
}

/// Weighted confidence that the window's latest pattern is meaningful:
/// 40% volatility, 30% impulse, 30% momentum.
pub fn pattern_strength(prices: &[f64]) -> f64 {
    volatility_strength(prices) * 0.4
        + impulse_strength(prices) * 0.3
        + momentum_strength(prices) * 0.3
}
