//! Approval API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::models::{ApprovalDecision, ApprovalRequest, UserRole};
use shared::quote::ApprovalRequirement;

use crate::core::ServerState;
use crate::utils::AppResult;

/// Create request body: the requirement a provisional calculation
/// reported, plus who is asking
#[derive(Deserialize)]
pub struct CreateApprovalRequest {
    pub org_id: String,
    #[serde(default)]
    pub proposal_id: Option<String>,
    pub requirement: ApprovalRequirement,
    pub order_total: f64,
    pub requested_by: String,
    pub requester_role: UserRole,
}

/// POST /api/approvals - open a pending approval request
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateApprovalRequest>,
) -> AppResult<Json<ApprovalRequest>> {
    let request = state.approvals.create_request(
        &payload.org_id,
        payload.proposal_id,
        &payload.requirement,
        payload.order_total,
        &payload.requested_by,
        payload.requester_role,
    );
    Ok(Json(request))
}

/// GET /api/approvals/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApprovalRequest>> {
    Ok(Json(state.approvals.get(&id)?))
}

/// Review request body
#[derive(Deserialize)]
pub struct ReviewRequest {
    pub reviewer_id: String,
    pub reviewer_role: UserRole,
    pub decision: ApprovalDecision,
    #[serde(default)]
    pub note: Option<String>,
}

/// POST /api/approvals/:id/review - resolve a pending request
///
/// Concurrent reviews are serialized; the loser receives a 409
/// stale-request error and the stored decision is untouched.
pub async fn review(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<Json<ApprovalRequest>> {
    let request = state
        .approvals
        .review(
            &id,
            &payload.reviewer_id,
            payload.reviewer_role,
            payload.decision,
            payload.note,
        )
        .await?;
    Ok(Json(request))
}
