//! Indicator computation and trading-signal core.
//!
//! Every function here is a pure transformation of the price/volume window
//! it is handed: no I/O, no shared state, no cross-call memory. Analyzers
//! called with less history than they need return documented neutral
//! defaults instead of failing (see each function's docs), so the layer
//! above always receives a well-typed result.

pub mod levels;
pub mod oscillators;
pub mod patterns;
pub mod pivots;
pub mod primitives;
pub mod sentiment;
pub mod strategy;
pub mod strength;
pub mod volume;
pub mod waves;

pub use levels::{fibonacci_levels, support_resistance};
pub use oscillators::{default_rsi, on_balance_volume, rsi, stochastic_k};
pub use patterns::{candle_patterns, price_patterns};
pub use pivots::find_pivots;
pub use primitives::{
    bollinger_bands, default_bollinger_bands, exponential_moving_average, macd,
    moving_average, rate_of_change,
};
pub use sentiment::market_sentiment;
pub use strategy::analyze_trading_strategy;
pub use strength::pattern_strength;
pub use volume::volume_profile;
pub use waves::elliott_waves;
