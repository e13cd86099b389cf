//! Trading-advice endpoint.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::types::{AdviceResponse, AdviceSource};
use crate::AppState;

/// Query parameters for the advice endpoint.
#[derive(Debug, Deserialize)]
pub struct AdviceQuery {
    /// Advice engine: rule_based (default) or language_model.
    pub source: Option<String>,
}

/// Create the advice router.
pub fn router() -> Router<AppState> {
    Router::new().route("/:symbol", get(get_advice))
}

/// Get trading advice for a symbol.
async fn get_advice(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<AdviceQuery>,
) -> Result<Json<AdviceResponse>> {
    let source = match query.source.as_deref() {
        Some(raw) => Some(
            AdviceSource::from_str(raw)
                .ok_or_else(|| AppError::BadRequest(format!("unknown advice source: {}", raw)))?,
        ),
        None => None,
    };

    let response = state.advisor.get_advice(&symbol, source).await?;
    Ok(Json(response))
}
