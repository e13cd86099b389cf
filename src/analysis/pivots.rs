//! Local-extremum detection used by wave segmentation and level analysis.

use crate::types::{Pivot, PivotKind};

/// Half-window compared on each side of a candidate extremum.
const PIVOT_WINDOW: usize = 3;

/// Noise threshold as a fraction of the window's maximum price.
const PIVOT_THRESHOLD_PCT: f64 = 0.002;

/// Find local price extrema.
///
/// A sample is a pivot high when it exceeds both neighboring 3-sample
/// sub-windows and clears the surrounding range by more than 0.2% of the
/// window maximum (symmetric rule for pivot lows). Results are ordered by
/// index.
pub fn find_pivots(prices: &[f64]) -> Vec<Pivot> {
    let mut pivots = Vec::new();
    if prices.len() < PIVOT_WINDOW * 2 + 1 {
        return pivots;
    }

    let threshold =
        prices.iter().copied().fold(f64::NEG_INFINITY, f64::max) * PIVOT_THRESHOLD_PCT;

    for i in PIVOT_WINDOW..prices.len() - PIVOT_WINDOW {
        let left = &prices[i - PIVOT_WINDOW..i];
        let right = &prices[i + 1..i + PIVOT_WINDOW + 1];

        let left_max = left.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let right_max = right.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let left_min = left.iter().copied().fold(f64::INFINITY, f64::min);
        let right_min = right.iter().copied().fold(f64::INFINITY, f64::min);

        let neighborhood_min = left_min.min(right_min);
        let neighborhood_max = left_max.max(right_max);

        if prices[i] > left_max
            && prices[i] > right_max
            && prices[i] - neighborhood_min > threshold
        {
            pivots.push(Pivot {
                index: i,
                kind: PivotKind::High,
                price: prices[i],
            });
        }

        if prices[i] < left_min
            && prices[i] < right_min
            && neighborhood_max - prices[i] > threshold
        {
            pivots.push(Pivot {
                index: i,
                kind: PivotKind::Low,
                price: prices[i],
            });
        }
    }

    pivots
}
