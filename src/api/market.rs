//! Market data endpoints: candles and the chart indicator bundle.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::Result;
use crate::services::IndicatorBundle;
use crate::types::Candle;
use crate::AppState;

/// API response wrapper.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ApiMeta,
}

#[derive(Serialize)]
pub struct ApiMeta {
    pub symbol: String,
    pub timestamp: i64,
}

impl<T> ApiResponse<T> {
    pub fn new(symbol: &str, data: T) -> Self {
        Self {
            data,
            meta: ApiMeta {
                symbol: symbol.to_uppercase(),
                timestamp: chrono::Utc::now().timestamp_millis(),
            },
        }
    }
}

/// Create the market router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:symbol/candles", get(get_candles))
        .route("/:symbol/indicators", get(get_indicators))
}

/// Get the raw candle window for a symbol.
async fn get_candles(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<Vec<Candle>>>> {
    let candles = state.advisor.fetch_candles(&symbol).await?;
    Ok(Json(ApiResponse::new(&symbol, candles)))
}

/// Get the full indicator bundle for a symbol.
async fn get_indicators(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<IndicatorBundle>>> {
    let candles = state.advisor.fetch_candles(&symbol).await?;
    let bundle = state.advisor.indicators(&candles);
    Ok(Json(ApiResponse::new(&symbol, bundle)))
}
