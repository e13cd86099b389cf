use serde::{Deserialize, Serialize};

/// Bollinger band triple.
///
/// `Bands::default()` (all zero) is the documented insufficient-data result;
/// callers must treat it as "no bands", not as a real price level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl Bands {
    /// Band width as a percentage of the middle band (volatility proxy).
    /// Returns 0 when the middle band is zero (insufficient data).
    pub fn width_pct(&self) -> f64 {
        if self.middle == 0.0 {
            return 0.0;
        }
        (self.upper - self.lower) / self.middle * 100.0
    }
}

/// Classic pivot-point support/resistance pair.
///
/// Both zero when the window held fewer than 10 samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    pub support: f64,
    pub resistance: f64,
}

/// Fibonacci retracement/extension levels anchored on the window's high (0%)
/// and low (100%). Extension levels project below the low.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FibonacciLevels {
    pub level0: f64,
    pub level236: f64,
    pub level382: f64,
    pub level500: f64,
    pub level618: f64,
    pub level786: f64,
    pub level1000: f64,
    pub level1128: f64,
    pub level1236: f64,
    pub level1382: f64,
    pub level1500: f64,
}

/// Kind of local price extremum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotKind {
    High,
    Low,
}

/// A local extremum inside an analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pivot {
    /// Position inside the analysis window.
    pub index: usize,
    pub kind: PivotKind,
    pub price: f64,
}

/// One impulse-wave segment between two pivots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveSegment {
    pub start: Pivot,
    pub end: Pivot,
    pub wave_number: u8,
}

/// Elliott-wave segmentation of the trailing analysis window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveAnalysis {
    /// Wave number (1-5) for every index in the window; 0 = unlabeled.
    pub wave_labels: Vec<u8>,
    /// Highest wave number opened so far (0 when no wave qualified).
    pub current_wave: u8,
    pub waves: Vec<WaveSegment>,
}

impl WaveAnalysis {
    /// Best-effort empty result used when segmentation cannot proceed.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Volume-by-price histogram over a fixed number of equal buckets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeProfile {
    /// Accumulated volume per price bucket.
    pub profile: Vec<f64>,
    /// Lower-bound price of each bucket, same length as `profile`.
    pub price_points: Vec<f64>,
}
