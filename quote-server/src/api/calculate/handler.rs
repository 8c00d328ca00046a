//! Calculation API Handlers

use axum::{Json, extract::State};
use shared::quote::{CalculationContext, CalculationResult};

use crate::core::ServerState;
use crate::utils::AppResult;

/// POST /api/calculate - price a proposal, no side effects
pub async fn calculate(
    State(state): State<ServerState>,
    Json(ctx): Json<CalculationContext>,
) -> AppResult<Json<CalculationResult>> {
    let result = state.engine.calculate(&ctx).await?;
    Ok(Json(result))
}

/// POST /api/finalize - recalculate, enforce the approval gate, and
/// commit promo usage and point redemptions exactly once
pub async fn finalize(
    State(state): State<ServerState>,
    Json(ctx): Json<CalculationContext>,
) -> AppResult<Json<CalculationResult>> {
    let result = state.engine.finalize(&ctx).await?;
    Ok(Json(result))
}
