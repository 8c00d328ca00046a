//! Promo Code API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::models::{PromoCode, PromoCodeCreate};
use shared::quote::ValidateCodeResult;
use shared::types::now_millis;
use uuid::Uuid;

use crate::core::ServerState;
use crate::registry::PromoCodeRegistry;
use crate::utils::{AppError, AppResult};

#[derive(Deserialize)]
pub struct OrgQuery {
    pub org_id: String,
}

/// GET /api/promo-codes?org_id=... - list an organization's codes
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrgQuery>,
) -> AppResult<Json<Vec<PromoCode>>> {
    Ok(Json(state.promo_codes.list(&query.org_id)))
}

/// POST /api/promo-codes?org_id=... - create a code
pub async fn create(
    State(state): State<ServerState>,
    Query(query): Query<OrgQuery>,
    Json(payload): Json<PromoCodeCreate>,
) -> AppResult<Json<PromoCode>> {
    if payload.code.trim().is_empty() {
        return Err(AppError::Validation("code cannot be empty".into()));
    }
    if payload.value < 0.0 {
        return Err(AppError::Validation("value cannot be negative".into()));
    }
    if state
        .promo_codes
        .find(&query.org_id, &payload.code)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "code {} already exists",
            payload.code.trim().to_uppercase()
        )));
    }

    let code = PromoCode {
        id: Uuid::new_v4().to_string(),
        org_id: query.org_id,
        code: payload.code.trim().to_uppercase(),
        description: payload.description,
        discount_type: payload.discount_type,
        value: payload.value,
        starts_at: payload.starts_at,
        expires_at: payload.expires_at,
        max_uses: payload.max_uses,
        use_count: 0,
        max_uses_per_customer: payload.max_uses_per_customer,
        min_order_amount: payload.min_order_amount,
        max_discount_amount: payload.max_discount_amount,
        allowed_service_ids: payload.allowed_service_ids,
        allowed_tiers: payload.allowed_tiers,
        is_active: true,
        created_at: now_millis(),
    };
    state.promo_codes.insert(code.clone());
    Ok(Json(code))
}

/// Validate request body
#[derive(Deserialize)]
pub struct ValidateCodeRequest {
    pub org_id: String,
    pub code: String,
    /// Order amount the preview is computed against
    pub order_amount: f64,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
}

/// POST /api/promo-codes/validate - pre-flight code check for the UI
pub async fn validate(
    State(state): State<ServerState>,
    Json(payload): Json<ValidateCodeRequest>,
) -> AppResult<Json<ValidateCodeResult>> {
    let result = state
        .engine
        .validate_code(
            &payload.org_id,
            &payload.code,
            payload.order_amount,
            payload.client_id.as_deref(),
            payload.client_email.as_deref(),
        )
        .await?;
    Ok(Json(result))
}
