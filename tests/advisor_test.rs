//! Advice pipeline tests over synthetic candle windows (no network).

use augury::services::{build_snapshot, indicator_bundle, rule_based_advice};
use augury::types::{Candle, MarketDepth};

const STEP_MS: i64 = 30 * 60 * 1000;

/// A 30-minute candle window sweeping up then pulling back.
fn swing_window(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let trend = if i < count * 2 / 3 {
                i as f64 * 1.5
            } else {
                (count * 2 / 3) as f64 * 1.5 - (i - count * 2 / 3) as f64 * 2.0
            };
            let base = 50000.0 + trend * 200.0;
            Candle {
                time: 1_700_000_000_000 + i as i64 * STEP_MS,
                open: base - 5.0,
                high: base + 25.0,
                low: base - 30.0,
                close: base,
                volume: 200.0 + (i % 11) as f64 * 15.0,
            }
        })
        .collect()
}

#[test]
fn advice_pipeline_produces_complete_result() {
    let candles = swing_window(48);
    let price = candles.last().unwrap().close;

    let advice = rule_based_advice(&candles, price, STEP_MS);

    assert!(advice.is_complete());
    let buy: f64 = advice.buy_target.parse().unwrap();
    let stop: f64 = advice.stop_loss.parse().unwrap();
    assert!(buy <= price);
    assert!(stop <= buy);
}

#[test]
fn advice_is_reproducible_for_identical_windows() {
    let candles = swing_window(48);
    let price = candles.last().unwrap().close;

    let first = rule_based_advice(&candles, price, STEP_MS);
    let second = rule_based_advice(&candles, price, STEP_MS);

    assert_eq!(first, second);
    assert_eq!(first.analysis.conclusion, second.analysis.conclusion);
}

#[test]
fn snapshot_degrades_gracefully_without_futures_data() {
    // All auxiliary fetches failed upstream: zeros flow through and the
    // payload still carries the full indicator set.
    let candles = swing_window(48);
    let price = candles.last().unwrap().close;

    let snapshot = build_snapshot(
        "btcusdt",
        &candles,
        price,
        MarketDepth::default(),
        0.0,
        0.0,
    );

    assert_eq!(snapshot.symbol, "BTCUSDT");
    assert_eq!(snapshot.funding_rate, 0.0);
    assert_eq!(snapshot.open_interest, 0.0);
    assert_eq!(snapshot.market_depth.buy_pressure, 0.0);
    assert_eq!(snapshot.historical.len(), 48);
    assert!(snapshot.fibonacci_levels.level0 > snapshot.fibonacci_levels.level1000);
    assert!((0.0..=100.0).contains(&snapshot.market_sentiment));
}

#[test]
fn snapshot_serializes_with_camel_case_wire_names() {
    let candles = swing_window(48);
    let price = candles.last().unwrap().close;
    let snapshot = build_snapshot("btcusdt", &candles, price, MarketDepth::default(), 0.0, 0.0);

    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"priceChange24h\""));
    assert!(json.contains("\"marketSentiment\""));
    assert!(json.contains("\"fibonacciLevels\""));
    assert!(json.contains("\"pricePatterns\""));
}

#[test]
fn indicator_bundle_covers_every_chart_series() {
    let candles = swing_window(60);
    let bundle = indicator_bundle(&candles, STEP_MS);

    assert_eq!(bundle.rsi.len(), 60);
    assert_eq!(bundle.stochastic_k.len(), 60);
    assert_eq!(bundle.obv.len(), 60);
    assert_eq!(bundle.rate_of_change.len(), 60);
    assert_eq!(bundle.volume_profile.profile.len(), 20);
    assert_eq!(bundle.volume_profile.price_points.len(), 20);
    assert!(bundle.waves.is_some());
    assert!(bundle.fibonacci_levels.level0 >= bundle.fibonacci_levels.level1000);

    // The pullback leg of the window leaves detectable patterns.
    assert!(!bundle.patterns.is_empty());
    for pair in bundle.patterns.windows(2) {
        assert!(pair[0].time >= pair[1].time, "patterns must be newest-first");
    }
}

#[test]
fn indicator_bundle_handles_minimal_window() {
    let candles = swing_window(2);
    let bundle = indicator_bundle(&candles, STEP_MS);

    assert!(bundle.waves.is_none());
    assert!(bundle.patterns.is_empty());
    assert_eq!(bundle.ma50, 0.0);
    assert_eq!(bundle.rsi, vec![50.0, 50.0]);
    assert!(bundle.market_sentiment.is_finite());
}
