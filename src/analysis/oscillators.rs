//! Bounded oscillators: RSI, stochastic %K, on-balance volume.

/// Wilder-smoothed Relative Strength Index, one value per input sample.
///
/// Indices before `period` samples of history carry the neutral seed 50, and
/// a window shorter than `period + 1` returns an all-50 sequence. A zero
/// average loss substitutes 1 as the denominator, so output stays in
/// [0, 100] and never becomes NaN.
pub fn rsi(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period + 1 {
        return vec![50.0; prices.len()];
    }

    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let gains: Vec<f64> = deltas.iter().map(|d| if *d > 0.0 { *d } else { 0.0 }).collect();
    let losses: Vec<f64> = deltas.iter().map(|d| if *d < 0.0 { -*d } else { 0.0 }).collect();

    let mut avg_gain = gains.iter().take(period).sum::<f64>() / period as f64;
    let mut avg_loss = losses.iter().take(period).sum::<f64>() / period as f64;

    let mut values = Vec::with_capacity(prices.len());
    values.push(50.0);

    for i in 1..prices.len() {
        if i < period {
            values.push(50.0);
            continue;
        }

        avg_gain = (avg_gain * (period - 1) as f64 + gains[i - 1]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i - 1]) / period as f64;

        let denominator = if avg_loss == 0.0 { 1.0 } else { avg_loss };
        let rs = avg_gain / denominator;
        values.push(100.0 - 100.0 / (1.0 + rs));
    }

    values
}

/// RSI with the standard 14-sample period.
pub fn default_rsi(prices: &[f64]) -> Vec<f64> {
    rsi(prices, 14)
}

/// Stochastic %K series: each sample's position inside its rolling
/// high/low range, scaled to [0, 100]. The rolling window trims to the
/// available history at the start of the series; a flat window yields the
/// neutral 50.
pub fn stochastic_k(prices: &[f64], period: usize) -> Vec<f64> {
    prices
        .iter()
        .enumerate()
        .map(|(i, price)| {
            let start = (i + 1).saturating_sub(period);
            let window = &prices[start..=i];
            let high = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let low = window.iter().copied().fold(f64::INFINITY, f64::min);
            if high == low {
                50.0
            } else {
                (price - low) / (high - low) * 100.0
            }
        })
        .collect()
}

/// On-balance volume: cumulative sum seeded with the first volume sample,
/// adding volume on an up-tick, subtracting on a down-tick, holding flat
/// when the price is unchanged. Series must be index-aligned.
pub fn on_balance_volume(prices: &[f64], volumes: &[f64]) -> Vec<f64> {
    let len = prices.len().min(volumes.len());
    if len == 0 {
        return Vec::new();
    }

    let mut obv = Vec::with_capacity(len);
    obv.push(volumes[0]);

    for i in 1..len {
        let last = obv[i - 1];
        let next = if prices[i] > prices[i - 1] {
            last + volumes[i]
        } else if prices[i] < prices[i - 1] {
            last - volumes[i]
        } else {
            last
        };
        obv.push(next);
    }

    obv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_insufficient_data_all_neutral() {
        let prices = vec![100.0, 101.0, 102.0];
        let values = rsi(&prices, 14);
        assert_eq!(values, vec![50.0, 50.0, 50.0]);
    }

    #[test]
    fn test_rsi_length_matches_input() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64).sin()).collect();
        assert_eq!(rsi(&prices, 14).len(), prices.len());
    }

    #[test]
    fn test_rsi_bounded() {
        let prices: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 1.3).sin() * 20.0)
            .collect();
        for value in rsi(&prices, 14) {
            assert!((0.0..=100.0).contains(&value), "rsi out of range: {}", value);
        }
    }

    #[test]
    fn test_rsi_uptrend_overbought() {
        // Strictly increasing 20-sample series must end deep in the
        // overbought zone.
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let values = default_rsi(&prices);
        assert!(
            *values.last().unwrap() > 70.0,
            "expected overbought, got {}",
            values.last().unwrap()
        );
    }

    #[test]
    fn test_rsi_downtrend_oversold() {
        let prices: Vec<f64> = (0..20).map(|i| 200.0 - i as f64).collect();
        let values = default_rsi(&prices);
        assert!(*values.last().unwrap() < 30.0);
    }

    #[test]
    fn test_stochastic_range_and_length() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.9).cos() * 10.0).collect();
        let k = stochastic_k(&prices, 14);
        assert_eq!(k.len(), prices.len());
        for value in k {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_stochastic_trimmed_start() {
        // First sample's window is just itself: flat, so neutral.
        let prices = vec![100.0, 110.0, 90.0];
        let k = stochastic_k(&prices, 14);
        assert_eq!(k[0], 50.0);
        assert!((k[1] - 100.0).abs() < 1e-9);
        assert!((k[2] - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_stochastic_flat_window_neutral() {
        let prices = vec![100.0; 20];
        assert!(stochastic_k(&prices, 14).iter().all(|v| *v == 50.0));
    }

    #[test]
    fn test_obv_seed_and_direction() {
        let prices = vec![10.0, 11.0, 11.0, 10.0];
        let volumes = vec![5.0, 3.0, 2.0, 4.0];
        let obv = on_balance_volume(&prices, &volumes);

        assert_eq!(obv[0], volumes[0]);
        assert_eq!(obv, vec![5.0, 8.0, 8.0, 4.0]);
    }

    #[test]
    fn test_obv_delta_sign_tracks_price_sign() {
        let prices: Vec<f64> = (0..25).map(|i| 100.0 + (i as f64 * 1.1).sin() * 8.0).collect();
        let volumes = vec![7.0; 25];
        let obv = on_balance_volume(&prices, &volumes);

        for i in 1..prices.len() {
            let price_delta = prices[i] - prices[i - 1];
            let obv_delta = obv[i] - obv[i - 1];
            if price_delta > 0.0 {
                assert!(obv_delta > 0.0);
            } else if price_delta < 0.0 {
                assert!(obv_delta < 0.0);
            } else {
                assert_eq!(obv_delta, 0.0);
            }
        }
    }

    #[test]
    fn test_obv_empty_input() {
        assert!(on_balance_volume(&[], &[]).is_empty());
    }
}
