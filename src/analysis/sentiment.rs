//! Composite market-sentiment score.

/// Combine RSI, MACD sign, and Bollinger-band position into a 0-100 score.
///
/// Three independent contributions are summed:
/// - RSI up to 40: full 40 at/below 30, zero at/above 70, linear between.
/// - MACD flat 30 when positive, otherwise 0.
/// - Band position up to 30: full 30 below 0.3 of the band width, zero
///   above 0.7, linear between. A zero-width band counts as mid-band.
pub fn market_sentiment(
    rsi: f64,
    macd: f64,
    current_price: f64,
    bollinger_upper: f64,
    bollinger_lower: f64,
) -> f64 {
    let rsi_score = if rsi > 70.0 {
        0.0
    } else if rsi < 30.0 {
        40.0
    } else {
        (70.0 - rsi) / 40.0 * 40.0
    };

    let macd_score = if macd > 0.0 { 30.0 } else { 0.0 };

    let band_width = bollinger_upper - bollinger_lower;
    let position = if band_width > 0.0 {
        (current_price - bollinger_lower) / band_width
    } else {
        0.5
    };
    let bb_score = if position < 0.3 {
        30.0
    } else if position > 0.7 {
        0.0
    } else {
        (0.7 - position) / 0.4 * 30.0
    };

    rsi_score + macd_score + bb_score
}
