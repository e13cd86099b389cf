//! Series primitives: moving averages, momentum scalar, volatility bands.
//!
//! Every function degrades to a documented neutral default when the window is
//! shorter than its period. Callers must treat those defaults (0, zeroed
//! bands) as "insufficient data", not as real values.

use crate::types::Bands;

/// Arithmetic mean of the last `period` samples. Returns 0 when fewer than
/// `period` samples are available.
pub fn moving_average(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period {
        return 0.0;
    }
    prices[prices.len() - period..].iter().sum::<f64>() / period as f64
}

/// Exponential moving average over the last `period` samples, smoothing
/// constant k = 2/(period+1), seeded from the sample immediately preceding
/// the window (0 when the window spans the whole series). Returns 0 when
/// fewer than `period` samples are available.
pub fn exponential_moving_average(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period {
        return 0.0;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let seed = if prices.len() > period {
        prices[prices.len() - period - 1]
    } else {
        0.0
    };
    prices[prices.len() - period..]
        .iter()
        .fold(seed, |ema, price| price * k + ema * (1.0 - k))
}

/// Momentum scalar: EMA(12) - EMA(26). Positive = rising momentum.
pub fn macd(prices: &[f64]) -> f64 {
    exponential_moving_average(prices, 12) - exponential_moving_average(prices, 26)
}

/// Bollinger bands: SMA(period) +- multiplier * population standard
/// deviation of the window. Returns zeroed bands when fewer than `period`
/// samples are available.
pub fn bollinger_bands(prices: &[f64], period: usize, std_dev_multiplier: f64) -> Bands {
    if period == 0 || prices.len() < period {
        return Bands::default();
    }

    let window = &prices[prices.len() - period..];
    let middle = window.iter().sum::<f64>() / period as f64;
    let std = std_dev(window, middle);

    Bands {
        upper: middle + std * std_dev_multiplier,
        middle,
        lower: middle - std * std_dev_multiplier,
    }
}

/// Bollinger bands with the standard 20/2 parameters.
pub fn default_bollinger_bands(prices: &[f64]) -> Bands {
    bollinger_bands(prices, 20, 2.0)
}

/// Rate of change: percent move versus `period` samples earlier, one value
/// per input sample. Warm-up indices (and zero baselines) yield 0.
pub fn rate_of_change(prices: &[f64], period: usize) -> Vec<f64> {
    prices
        .iter()
        .enumerate()
        .map(|(i, price)| {
            if i < period || prices[i - period] == 0.0 {
                0.0
            } else {
                (price - prices[i - period]) / prices[i - period] * 100.0
            }
        })
        .collect()
}

/// Population standard deviation around a precomputed mean.
pub(crate) fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average_basic() {
        let prices = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((moving_average(&prices, 3) - 4.0).abs() < 1e-9);
        assert!((moving_average(&prices, 5) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_moving_average_insufficient_data() {
        let prices = vec![1.0, 2.0];
        assert_eq!(moving_average(&prices, 3), 0.0);
        assert_eq!(moving_average(&[], 3), 0.0);
    }

    #[test]
    fn test_ema_insufficient_data() {
        assert_eq!(exponential_moving_average(&[1.0, 2.0], 12), 0.0);
    }

    #[test]
    fn test_ema_tracks_recent_prices() {
        // Constant series seeded from the preceding constant sample must
        // reproduce the constant.
        let prices = vec![100.0; 30];
        let ema = exponential_moving_average(&prices, 12);
        assert!((ema - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_macd_sign_follows_trend() {
        let rising: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        assert!(macd(&rising) > 0.0);

        let falling: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        assert!(macd(&falling) < 0.0);
    }

    #[test]
    fn test_bollinger_insufficient_data() {
        let prices = vec![1.0; 10];
        assert_eq!(bollinger_bands(&prices, 20, 2.0), Bands::default());
    }

    #[test]
    fn test_bollinger_flat_series() {
        let prices = vec![50.0; 25];
        let bands = default_bollinger_bands(&prices);
        assert!((bands.upper - 50.0).abs() < 1e-9);
        assert!((bands.middle - 50.0).abs() < 1e-9);
        assert!((bands.lower - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_bollinger_idempotence() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let first = default_bollinger_bands(&prices);
        let second = default_bollinger_bands(&prices);
        assert_eq!(first, second);
    }

    #[test]
    fn test_bollinger_band_ordering() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + (i % 5) as f64).collect();
        let bands = default_bollinger_bands(&prices);
        assert!(bands.upper > bands.middle);
        assert!(bands.middle > bands.lower);
    }

    #[test]
    fn test_rate_of_change_warmup_and_values() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let roc = rate_of_change(&prices, 14);

        assert_eq!(roc.len(), prices.len());
        for value in roc.iter().take(14) {
            assert_eq!(*value, 0.0);
        }
        // index 14: (114 - 100) / 100 * 100 = 14%
        assert!((roc[14] - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_rate_of_change_zero_baseline() {
        let prices = vec![0.0; 20];
        let roc = rate_of_change(&prices, 14);
        assert!(roc.iter().all(|v| v.is_finite()));
    }
}
