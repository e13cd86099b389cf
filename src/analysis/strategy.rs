//! Rule-based trading-strategy engine.
//!
//! Single-shot evaluation: consumes the current price, the RSI series, the
//! MACD scalar, Bollinger bands, detected patterns, and the volume series,
//! and produces entry/stop/target prices plus four narrative sections. Pure
//! function of its inputs - identical inputs always produce identical
//! advice, narrative text included.

use crate::types::{
    Bands, MarketAnalysis, Pattern, PatternDirection, PatternKind, TradingAdvice,
};

/// Volume lookback for the trend comparison.
const VOLUME_LOOKBACK: usize = 5;

/// Band width above this percentage counts as a volatile regime in the
/// technical narrative.
const HIGH_VOLATILITY_PCT: f64 = 30.0;

/// Evaluate the strategy and produce a recommendation.
///
/// Callers should supply at least ~50 samples of history; analyzers that ran
/// short degrade to their neutral defaults upstream, and this function still
/// returns a well-typed result. The suggested entry never exceeds the
/// current price.
pub fn analyze_trading_strategy(
    current_price: f64,
    rsi_values: &[f64],
    macd_value: f64,
    bands: Bands,
    patterns: &[Pattern],
    volumes: &[f64],
) -> TradingAdvice {
    let last_rsi = rsi_values.last().copied().unwrap_or(50.0);
    let trend_up = macd_value > 0.0;
    let volatility = bands.width_pct();

    let latest_pattern = patterns.first();
    let reversal_expected =
        latest_pattern.map(|p| p.kind == PatternKind::Reversal).unwrap_or(false);
    let bullish_reversal = reversal_expected
        && latest_pattern.map(|p| p.direction == PatternDirection::Bullish).unwrap_or(false);

    let (volume_rising, volume_change_pct) = volume_trend(volumes);

    let risk_multiplier = if volatility < 20.0 {
        1.5
    } else if volatility < 40.0 {
        2.0
    } else {
        2.5
    };

    let (buy_target, stop_loss, take_profit) = if bullish_reversal {
        // Reversal up: anchor the entry at the band floor, never above the
        // current price.
        let buy = current_price.min(bands.lower * 1.01);
        let stop = (current_price * 0.99).min(bands.lower);
        let take = current_price + (current_price - stop) * risk_multiplier;
        (buy, stop, take)
    } else if reversal_expected {
        // Reversal down: bias the entry toward the band floor with a tight
        // stop underneath, targeting the middle band.
        let buy = (bands.lower * 1.01).max(current_price * 0.98).min(current_price);
        let stop = buy * 0.98;
        let take = bands.middle;
        (buy, stop, take)
    } else {
        // No pattern: band-floor entry with a wider stop.
        let buy = current_price.min(bands.lower * 1.01);
        let stop = (current_price * 0.985).min(bands.lower);
        let take = current_price + (current_price - stop) * 2.0;
        (buy, stop, take)
    };

    let high_volatility = volatility > HIGH_VOLATILITY_PCT;
    let variant = narrative_variant(trend_up, high_volatility, volume_rising, reversal_expected);

    let analysis = MarketAnalysis {
        trend: trend_narrative(variant, trend_up, last_rsi, macd_value, current_price, bands),
        technical: technical_narrative(variant, high_volatility, volatility, current_price, bands),
        volume: volume_narrative(variant, volume_rising, volume_change_pct, trend_up),
        conclusion: conclusion_narrative(
            variant,
            latest_pattern.filter(|_| reversal_expected),
            trend_up,
            last_rsi,
            macd_value,
            current_price,
            bands,
            buy_target,
            stop_loss,
            take_profit,
        ),
    };

    TradingAdvice {
        buy_target: format!("{:.2}", buy_target),
        stop_loss: format!("{:.2}", stop_loss),
        take_profit: format!("{:.2}", take_profit),
        analysis,
    }
}

/// Latest volume versus the 5-sample average: rising flag and percent change.
fn volume_trend(volumes: &[f64]) -> (bool, f64) {
    if volumes.is_empty() {
        return (false, 0.0);
    }

    let start = volumes.len().saturating_sub(VOLUME_LOOKBACK);
    let recent = &volumes[start..];
    let average = recent.iter().sum::<f64>() / recent.len() as f64;
    let latest = recent[recent.len() - 1];

    if average == 0.0 {
        return (false, 0.0);
    }

    (latest > average, (latest - average) / average * 100.0)
}

/// Deterministic phrasing variant from the computed feature buckets.
fn narrative_variant(
    trend_up: bool,
    high_volatility: bool,
    volume_rising: bool,
    reversal_expected: bool,
) -> usize {
    let key = trend_up as usize
        | (high_volatility as usize) << 1
        | (volume_rising as usize) << 2
        | (reversal_expected as usize) << 3;
    key % 3
}

/// RSI zone description for the trend narrative.
fn rsi_status(rsi: f64) -> &'static str {
    if rsi > 70.0 {
        "has entered the overbought zone"
    } else if rsi < 30.0 {
        "sits in oversold territory where a bounce becomes likely"
    } else if rsi > 60.0 {
        "is tracking through bullish territory"
    } else if rsi < 40.0 {
        "is tracking through bearish territory"
    } else {
        "is moving steadily through the neutral zone"
    }
}

/// Which band the price currently sits closest to.
fn band_position(price: f64, bands: Bands) -> &'static str {
    let upper_dist = (price - bands.upper).abs();
    let middle_dist = (price - bands.middle).abs();
    let lower_dist = (price - bands.lower).abs();

    if upper_dist < middle_dist && upper_dist < lower_dist {
        "upper band"
    } else if lower_dist < middle_dist && lower_dist < upper_dist {
        "lower band"
    } else {
        "middle band"
    }
}

fn trend_narrative(
    variant: usize,
    trend_up: bool,
    rsi: f64,
    macd: f64,
    price: f64,
    bands: Bands,
) -> String {
    if trend_up {
        match variant {
            0 => format!(
                "The market is in an uptrend. RSI at {:.1} {}, while MACD at {:.2} confirms rising momentum with price working toward the upper band (${:.2}).",
                rsi, rsi_status(rsi), macd, bands.upper
            ),
            1 => format!(
                "Technical readings point upward: the current price (${:.2}) is holding above the middle band (${:.2}), RSI {:.1} keeps buying pressure intact, and the MACD reading of {:.2} supports the move.",
                price, bands.middle, rsi, macd
            ),
            _ => format!(
                "The uptrend remains in force. RSI ({:.1}) and MACD ({:.2}) are both constructive, leaving room for further upside.",
                rsi, macd
            ),
        }
    } else {
        match variant {
            0 => format!(
                "The market is in a downtrend. RSI at {:.1} {}, while MACD at {:.2} shows persistent downside momentum with price drifting toward the lower band (${:.2}).",
                rsi, rsi_status(rsi), macd, bands.lower
            ),
            1 => format!(
                "Technical readings favor the downside: the current price (${:.2}) is trading below the middle band (${:.2}), RSI {:.1} reflects sustained selling pressure, and the MACD reading of {:.2} confirms it.",
                price, bands.middle, rsi, macd
            ),
            _ => format!(
                "The downtrend is still developing. RSI ({:.1}) and MACD ({:.2}) both lean bearish, pointing to further downside risk.",
                rsi, macd
            ),
        }
    }
}

fn technical_narrative(
    variant: usize,
    high_volatility: bool,
    volatility: f64,
    price: f64,
    bands: Bands,
) -> String {
    if high_volatility {
        match variant {
            0 => format!(
                "Volatility is elevated at {:.1}%. The bands have widened between ${:.2} and ${:.2}, so sharp swings in either direction are possible; risk management matters most in this regime.",
                volatility, bands.upper, bands.lower
            ),
            1 => format!(
                "Indicators describe a volatile regime: band width sits at {:.1}% and the current price (${:.2}) is trading near the {}. Be prepared for abrupt direction changes.",
                volatility, price, band_position(price, bands)
            ),
            _ => format!(
                "Market volatility of {:.1}% is high, and momentum readings are swinging with it. A firm stop is essential before any entry.",
                volatility
            ),
        }
    } else {
        match variant {
            0 => format!(
                "Volatility is contained at {:.1}%. The bands are tracking a steady channel between ${:.2} and ${:.2}, favoring orderly price movement.",
                volatility, bands.upper, bands.lower
            ),
            1 => format!(
                "Indicators describe a calm regime: band width holds near {:.1}% and the current price (${:.2}) is sitting near the {}.",
                volatility, price, band_position(price, bands)
            ),
            _ => format!(
                "The market has settled into a low-volatility phase ({:.1}%), which suits gradual, trend-following entries.",
                volatility
            ),
        }
    }
}

fn volume_narrative(
    variant: usize,
    volume_rising: bool,
    change_pct: f64,
    trend_up: bool,
) -> String {
    let trend_word = if trend_up { "rising" } else { "falling" };
    if volume_rising {
        match variant {
            0 => format!(
                "Volume is running {:.1}% above its five-sample average, adding credibility to the current move.",
                change_pct
            ),
            1 => format!(
                "Participation is increasing: the latest volume prints {:.1}% over the recent average, suggesting conviction behind the {} trend.",
                change_pct, trend_word
            ),
            _ => format!(
                "Turnover has picked up by {:.1}% versus the five-sample average, which supports trend persistence.",
                change_pct
            ),
        }
    } else {
        match variant {
            0 => format!(
                "Volume is running {:.1}% below its five-sample average, so the market is treating the current move with caution.",
                change_pct.abs()
            ),
            1 => format!(
                "Participation is thinning: the latest volume prints {:.1}% under the recent average, a sign of hesitation around the {} trend.",
                change_pct.abs(), trend_word
            ),
            _ => format!(
                "Turnover has faded by {:.1}% versus the five-sample average; wait for volume confirmation before committing.",
                change_pct.abs()
            ),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn conclusion_narrative(
    variant: usize,
    reversal_pattern: Option<&Pattern>,
    trend_up: bool,
    rsi: f64,
    macd: f64,
    price: f64,
    bands: Bands,
    buy_target: f64,
    stop_loss: f64,
    take_profit: f64,
) -> String {
    if let Some(pattern) = reversal_pattern {
        let label = format!("{} {}", pattern.direction.label(), pattern.kind.label());
        match variant {
            0 => format!(
                "A {} pattern suggests the trend may turn. RSI ({:.1}) and MACD ({:.2}) support the setup; manage risk around entry ${:.2}, stop ${:.2}, and target ${:.2}.",
                label, rsi, macd, buy_target, stop_loss, take_profit
            ),
            1 => format!(
                "A {} signal has fired and the indicators back a change of direction. Respect the stop (${:.2}) and target (${:.2}) around the suggested entry (${:.2}).",
                label, stop_loss, take_profit, buy_target
            ),
            _ => format!(
                "A {} setup is in place with price near the {}. Approach the entry at ${:.2} cautiously, with the stop at ${:.2} and the profit objective at ${:.2}.",
                label, band_position(price, bands), buy_target, stop_loss, take_profit
            ),
        }
    } else {
        let trend_word = if trend_up { "rising" } else { "falling" };
        match variant {
            0 => format!(
                "The prevailing trend looks set to continue. RSI ({:.1}) and MACD ({:.2}) agree; work orders around entry ${:.2}, stop ${:.2}, and target ${:.2}.",
                rsi, macd, buy_target, stop_loss, take_profit
            ),
            1 => format!(
                "The existing {} trend remains valid and the band structure confirms it. Use the suggested zone - entry ${:.2}, stop ${:.2}, target ${:.2} - and keep risk controlled.",
                trend_word, buy_target, stop_loss, take_profit
            ),
            _ => format!(
                "Trend health is confirmed by the momentum readings, with price near the {}. Consider entries near ${:.2}, with the stop at ${:.2} and the target at ${:.2}.",
                band_position(price, bands), buy_target, stop_loss, take_profit
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_bands() -> Bands {
        Bands {
            upper: 51000.0,
            middle: 50000.0,
            lower: 49000.0,
        }
    }

    fn pattern(kind: PatternKind, direction: PatternDirection) -> Pattern {
        Pattern {
            kind,
            direction,
            price: 50000.0,
            time: 1_700_000_000_000,
            description: String::new(),
        }
    }

    #[test]
    fn test_buy_target_never_exceeds_price_default_branch() {
        let advice =
            analyze_trading_strategy(50000.0, &[55.0], 10.0, test_bands(), &[], &[10.0; 10]);
        let buy: f64 = advice.buy_target.parse().unwrap();
        assert!(buy <= 50000.0);
    }

    #[test]
    fn test_buy_target_never_exceeds_price_bullish_reversal() {
        let patterns = vec![pattern(PatternKind::Reversal, PatternDirection::Bullish)];
        let advice =
            analyze_trading_strategy(50000.0, &[25.0], 5.0, test_bands(), &patterns, &[10.0; 10]);
        let buy: f64 = advice.buy_target.parse().unwrap();
        assert!(buy <= 50000.0);
    }

    #[test]
    fn test_buy_target_never_exceeds_price_bearish_reversal() {
        // Band floor above the current price: the clamp must still hold.
        let bands = Bands {
            upper: 52000.0,
            middle: 51000.0,
            lower: 49900.0,
        };
        let patterns = vec![pattern(PatternKind::Reversal, PatternDirection::Bearish)];
        let advice =
            analyze_trading_strategy(50000.0, &[45.0], -5.0, bands, &patterns, &[10.0; 10]);
        let buy: f64 = advice.buy_target.parse().unwrap();
        assert!(buy <= 50000.0);
    }

    #[test]
    fn test_bullish_reversal_prices() {
        let patterns = vec![pattern(PatternKind::Reversal, PatternDirection::Bullish)];
        let advice =
            analyze_trading_strategy(50000.0, &[25.0], 5.0, test_bands(), &patterns, &[10.0; 10]);

        // Volatility (51000-49000)/50000 = 4% -> risk multiplier 1.5.
        let buy: f64 = advice.buy_target.parse().unwrap();
        let stop: f64 = advice.stop_loss.parse().unwrap();
        let take: f64 = advice.take_profit.parse().unwrap();

        assert!((buy - 49490.0).abs() < 0.01); // min(50000, 49000*1.01)
        assert!((stop - 49000.0).abs() < 0.01); // min(49500, 49000)
        assert!((take - (50000.0 + 1000.0 * 1.5)).abs() < 0.01);
    }

    #[test]
    fn test_bearish_reversal_targets_middle_band() {
        let patterns = vec![pattern(PatternKind::Reversal, PatternDirection::Bearish)];
        let advice =
            analyze_trading_strategy(50000.0, &[45.0], -5.0, test_bands(), &patterns, &[10.0; 10]);

        let buy: f64 = advice.buy_target.parse().unwrap();
        let stop: f64 = advice.stop_loss.parse().unwrap();
        let take: f64 = advice.take_profit.parse().unwrap();

        assert!((buy - 49490.0).abs() < 0.01); // max(49490, 49000) clamped to price
        assert!((stop - buy * 0.98).abs() < 0.01);
        assert_eq!(take, 50000.0);
    }

    #[test]
    fn test_default_branch_uses_wider_stop() {
        let advice =
            analyze_trading_strategy(50000.0, &[55.0], 10.0, test_bands(), &[], &[10.0; 10]);

        let stop: f64 = advice.stop_loss.parse().unwrap();
        let take: f64 = advice.take_profit.parse().unwrap();

        assert!((stop - 49000.0).abs() < 0.01); // min(49250, 49000)
        assert!((take - (50000.0 + 1000.0 * 2.0)).abs() < 0.01);
    }

    #[test]
    fn test_deterministic_output() {
        let volumes: Vec<f64> = (0..10).map(|i| 10.0 + i as f64).collect();
        let patterns = vec![pattern(PatternKind::Reversal, PatternDirection::Bullish)];

        let a = analyze_trading_strategy(50000.0, &[28.0], 3.0, test_bands(), &patterns, &volumes);
        let b = analyze_trading_strategy(50000.0, &[28.0], 3.0, test_bands(), &patterns, &volumes);

        assert_eq!(a, b);
    }

    #[test]
    fn test_narratives_report_required_facts() {
        let volumes = vec![10.0, 10.0, 10.0, 10.0, 15.0];
        let advice =
            analyze_trading_strategy(50000.0, &[65.0], 12.0, test_bands(), &[], &volumes);

        // Trend narrative carries the RSI reading.
        assert!(advice.analysis.trend.contains("65.0"));
        // Volume narrative carries the percent change vs the 5-sample average:
        // avg = 11, latest 15 -> +36.4%.
        assert!(advice.analysis.volume.contains("36.4"));
        // Conclusion restates all three prices.
        assert!(advice.analysis.conclusion.contains(&advice.buy_target));
        assert!(advice.analysis.conclusion.contains(&advice.stop_loss));
        assert!(advice.analysis.conclusion.contains(&advice.take_profit));
    }

    #[test]
    fn test_volume_trend_flat_average() {
        let (rising, change) = volume_trend(&[0.0; 5]);
        assert!(!rising);
        assert_eq!(change, 0.0);
    }

    #[test]
    fn test_empty_inputs_still_produce_advice() {
        let advice = analyze_trading_strategy(50000.0, &[], 0.0, Bands::default(), &[], &[]);
        assert!(!advice.buy_target.is_empty());
        assert!(!advice.analysis.conclusion.is_empty());
    }

    #[test]
    fn test_risk_multiplier_scales_with_volatility() {
        let patterns = vec![pattern(PatternKind::Reversal, PatternDirection::Bullish)];
        // Wide bands: volatility 50% -> multiplier 2.5.
        let wide = Bands {
            upper: 62500.0,
            middle: 50000.0,
            lower: 37500.0,
        };
        let advice =
            analyze_trading_strategy(50000.0, &[30.0], 5.0, wide, &patterns, &[10.0; 10]);

        let stop: f64 = advice.stop_loss.parse().unwrap();
        let take: f64 = advice.take_profit.parse().unwrap();
        assert!((take - (50000.0 + (50000.0 - stop) * 2.5)).abs() < 0.01);
    }
}
