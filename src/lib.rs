//! Augury - technical-analysis and trading-advice engine for a crypto
//! dashboard.
//!
//! The heart of the crate is [`analysis`]: a pure-function indicator and
//! strategy library over price/volume windows. [`services`] wires that core
//! to the external collaborators in [`sources`] (exchange market data, an
//! optional language-model advice endpoint) and [`api`] exposes the result
//! over HTTP for the dashboard.

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use std::sync::Arc;

use config::Config;
use services::AdvisorService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub advisor: Arc<AdvisorService>,
}

impl AppState {
    /// Build the application state from configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let advisor = AdvisorService::new(config.clone());
        Self { config, advisor }
    }
}

// Re-export commonly used types
pub use error::{AppError, Result};
pub use types::{AdviceResponse, AdviceSource, Candle, MarketSnapshot, TradingAdvice};
