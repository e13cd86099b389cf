//! Elliott-wave segmentation over the trailing analysis window.

use tracing::warn;

use super::pivots::find_pivots;
use crate::types::{Pivot, PivotKind, WaveAnalysis, WaveSegment};

/// Samples the segmentation operates on (the trailing window).
pub const WAVE_WINDOW: usize = 50;

/// Maximum number of impulse waves labeled.
const MAX_WAVES: u8 = 5;

/// Minimum pivot-to-pivot move as a fraction of the window maximum.
const WAVE_NOISE_PCT: f64 = 0.005;

/// Segment the trailing 50 samples into up to five impulse waves.
///
/// Walks consecutive pivots and opens a new wave whenever the price delta
/// between them clears 0.5% of the window maximum, labeling every index in
/// the wave's span with its wave number (0 = unlabeled). The window's first
/// and last samples are included as anchor pivots so a strong one-way trend
/// still registers as wave 1.
///
/// Returns None when fewer than 50 samples are available. Internal
/// inconsistencies degrade to an empty result rather than an error.
pub fn elliott_waves(prices: &[f64]) -> Option<WaveAnalysis> {
    if prices.len() < WAVE_WINDOW {
        return None;
    }

    let window = &prices[prices.len() - WAVE_WINDOW..];
    let pivots = anchored_pivots(window);

    Some(identify_waves(window, &pivots))
}

/// Interior pivots plus the window endpoints as anchors.
fn anchored_pivots(window: &[f64]) -> Vec<Pivot> {
    let mut pivots = Vec::new();

    let first = window[0];
    let second = window[1];
    pivots.push(Pivot {
        index: 0,
        kind: if second >= first { PivotKind::Low } else { PivotKind::High },
        price: first,
    });

    pivots.extend(find_pivots(window));

    let last_index = window.len() - 1;
    let last = window[last_index];
    let before_last = window[last_index - 1];
    pivots.push(Pivot {
        index: last_index,
        kind: if last >= before_last { PivotKind::High } else { PivotKind::Low },
        price: last,
    });

    pivots
}

/// Walk consecutive pivots and label qualifying spans with wave numbers.
fn identify_waves(window: &[f64], pivots: &[Pivot]) -> WaveAnalysis {
    let mut wave_labels = vec![0u8; window.len()];
    let mut waves = Vec::new();
    let mut current_wave = 0u8;

    let min_price_change =
        window.iter().copied().fold(f64::NEG_INFINITY, f64::max) * WAVE_NOISE_PCT;

    for pair in pivots.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let price_change = end.price - start.price;

        if price_change.abs() < min_price_change {
            continue;
        }

        if current_wave >= MAX_WAVES {
            break;
        }

        if start.index > end.index || end.index >= window.len() {
            // Pivot ordering is violated; give up rather than mislabel.
            warn!(
                start = start.index,
                end = end.index,
                "inconsistent pivot span during wave segmentation"
            );
            return WaveAnalysis::empty();
        }

        current_wave += 1;
        waves.push(WaveSegment {
            start,
            end,
            wave_number: current_wave,
        });

        for label in &mut wave_labels[start.index..=end.index] {
            *label = current_wave;
        }
    }

    WaveAnalysis {
        wave_labels,
        current_wave,
        waves,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_samples() {
        let prices = vec![100.0; 49];
        assert!(elliott_waves(&prices).is_none());
    }

    #[test]
    fn test_monotonic_trend_registers_first_wave() {
        // 60 samples rising 100 -> 160: no interior extremum, but the anchor
        // pivots span the whole move.
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * (60.0 / 59.0)).collect();
        let analysis = elliott_waves(&prices).unwrap();

        assert_eq!(analysis.wave_labels.len(), WAVE_WINDOW);
        assert!(analysis.current_wave >= 1 && analysis.current_wave <= 5);
        assert!(analysis.wave_labels.iter().any(|&l| l > 0));
    }

    #[test]
    fn test_flat_series_opens_no_wave() {
        let prices = vec![100.0; 60];
        let analysis = elliott_waves(&prices).unwrap();
        assert_eq!(analysis.current_wave, 0);
        assert!(analysis.waves.is_empty());
        assert!(analysis.wave_labels.iter().all(|&l| l == 0));
    }

    #[test]
    fn test_zigzag_labels_multiple_waves() {
        // Asymmetric triangle wave with single-sample peaks and troughs,
        // legs far above the noise floor.
        let prices: Vec<f64> = (0..60)
            .map(|i| {
                let phase = (i % 20) as i64;
                let x = if phase < 10 { phase } else { 18 - phase };
                100.0 + x as f64 * 3.0
            })
            .collect();

        let analysis = elliott_waves(&prices).unwrap();
        assert!(analysis.current_wave >= 2);
        assert!(analysis.current_wave <= 5);
        assert_eq!(analysis.waves.len() as u8, analysis.current_wave);

        // Wave numbers are assigned sequentially.
        for (i, wave) in analysis.waves.iter().enumerate() {
            assert_eq!(wave.wave_number as usize, i + 1);
            assert!(wave.start.index <= wave.end.index);
        }
    }

    #[test]
    fn test_wave_labels_within_range() {
        let prices: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 10.0)
            .collect();
        let analysis = elliott_waves(&prices).unwrap();
        assert!(analysis.wave_labels.iter().all(|&l| l <= 5));
    }
}
