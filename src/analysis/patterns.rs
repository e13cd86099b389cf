//! Price-action pattern detection.
//!
//! One capability, two output contracts:
//! - [`price_patterns`]: event-list variant, a backward 10-sample scan over
//!   closing prices emitting reversal/continuation events newest-first.
//! - [`candle_patterns`]: boolean-flags variant (doji / morning-star /
//!   hammer) over the trailing OHLC candles.

use crate::types::{Candle, CandlePatterns, Pattern, PatternDirection, PatternKind};

/// Sliding window length for the reversal/continuation scan.
const SCAN_WINDOW: usize = 10;

/// Reversal requires the latest delta to exceed 1% of the window average.
const REVERSAL_DELTA_PCT: f64 = 0.01;

/// Continuation requires the latest delta to exceed 0.5% of the window average.
const CONTINUATION_DELTA_PCT: f64 = 0.005;

/// Scan the series backward from the most recent sample, emitting one
/// pattern event per qualifying window position. Results are ordered
/// newest-first because the scan proceeds backward.
///
/// `end_time` is the unix-millisecond timestamp of the sample after the last
/// one in the series; `step_ms` is the sampling interval, used to reconstruct
/// each event's timestamp.
pub fn price_patterns(prices: &[f64], end_time: i64, step_ms: i64) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    if prices.len() <= SCAN_WINDOW {
        return patterns;
    }

    for i in (SCAN_WINDOW..prices.len()).rev() {
        let segment = &prices[i - SCAN_WINDOW..=i];
        let current = prices[i];
        let previous = prices[i - 1];
        let time = end_time - (prices.len() - i) as i64 * step_ms;

        let direction = if current > previous {
            PatternDirection::Bullish
        } else {
            PatternDirection::Bearish
        };

        if is_reversal(segment) {
            patterns.push(Pattern {
                kind: PatternKind::Reversal,
                direction,
                price: current,
                time,
                description: match direction {
                    PatternDirection::Bullish => {
                        "Downtrend may be reversing to the upside".to_string()
                    }
                    PatternDirection::Bearish => {
                        "Uptrend may be reversing to the downside".to_string()
                    }
                },
            });
        }

        if is_continuation(segment) {
            patterns.push(Pattern {
                kind: PatternKind::Continuation,
                direction,
                price: current,
                time,
                description: match direction {
                    PatternDirection::Bullish => {
                        "Current uptrend is likely to continue".to_string()
                    }
                    PatternDirection::Bearish => {
                        "Current downtrend is likely to continue".to_string()
                    }
                },
            });
        }
    }

    patterns
}

/// Strong latest delta moving against the segment's net trend.
fn is_reversal(segment: &[f64]) -> bool {
    let last = segment[segment.len() - 1];
    let prev = segment[segment.len() - 2];
    let avg = segment.iter().sum::<f64>() / segment.len() as f64;
    let trending_up = last > segment[0];

    (last - prev).abs() > (avg * REVERSAL_DELTA_PCT).abs()
        && ((trending_up && last < prev) || (!trending_up && last > prev))
}

/// Meaningful latest delta moving with the segment's net trend.
fn is_continuation(segment: &[f64]) -> bool {
    let last = segment[segment.len() - 1];
    let prev = segment[segment.len() - 2];
    let avg = segment.iter().sum::<f64>() / segment.len() as f64;
    let trending_up = last > segment[0];

    (last - prev).abs() > (avg * CONTINUATION_DELTA_PCT).abs()
        && ((trending_up && last > prev) || (!trending_up && last < prev))
}

/// Evaluate the trailing candles for the three classic candle patterns.
pub fn candle_patterns(candles: &[Candle]) -> CandlePatterns {
    CandlePatterns {
        is_doji: is_doji(candles),
        is_morning_star: is_morning_star(candles),
        is_hammer: is_hammer(candles),
    }
}

/// Doji: the last candle's body is under 0.1% of its average price.
fn is_doji(candles: &[Candle]) -> bool {
    let Some(last) = candles.last() else {
        return false;
    };
    let body = (last.close - last.open).abs();
    let average = (last.close + last.open) / 2.0;
    average > 0.0 && body / average < 0.001
}

/// Morning star: a bearish candle, a small-bodied candle, then a bullish
/// candle closing above the small body.
fn is_morning_star(candles: &[Candle]) -> bool {
    if candles.len() < 3 {
        return false;
    }
    let &[first, second, third] = &candles[candles.len() - 3..] else {
        return false;
    };

    let first_body = (first.close - first.open).abs();
    let second_body = (second.close - second.open).abs();

    first.close < first.open
        && second_body < first_body * 0.3
        && third.close > third.open
        && third.close > second.close
}

/// Hammer: lower shadow more than twice the body, closing bullish.
fn is_hammer(candles: &[Candle]) -> bool {
    let Some(last) = candles.last() else {
        return false;
    };
    let body = (last.close - last.open).abs();
    let lower_shadow = last.open.min(last.close) - last.low;
    lower_shadow > body * 2.0 && last.close >= last.open
}
