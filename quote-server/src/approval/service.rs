//! Approval Gate
//!
//! Threshold checks against the organization's approval policy, and the
//! pending-request state machine. A request resolves exactly once; the
//! loser of a concurrent review gets a stale-request error rather than a
//! silent overwrite.

use std::sync::Arc;

use dashmap::DashMap;
use rust_decimal::Decimal;
use shared::models::{
    ApprovalDecision, ApprovalPolicy, ApprovalRequest, ApprovalStatus, UserRole,
};
use shared::quote::ApprovalRequirement;
use shared::types::now_millis;
use tracing::info;
use uuid::Uuid;

use crate::pricing::base::{to_decimal, to_f64};
use crate::registry::PolicyProvider;
use crate::utils::{AppError, AppResult};

/// Which ceiling a discount tripped
const EXCEEDED_ROLE_PERCENT: &str = "role-percent";
const EXCEEDED_ROLE_AMOUNT: &str = "role-amount";
const EXCEEDED_ORG_RATIO: &str = "org-ratio";

pub struct ApprovalService {
    policies: Arc<dyn PolicyProvider>,
    requests: DashMap<String, ApprovalRequest>,
}

impl ApprovalService {
    pub fn new(policies: Arc<dyn PolicyProvider>) -> Self {
        Self {
            policies,
            requests: DashMap::new(),
        }
    }

    /// Check a stacked discount against the acting user's authority
    ///
    /// Returns the requirement when any ceiling is exceeded: the role's
    /// percent limit, the role's absolute limit, or the org-wide
    /// discount ratio. No policy on file means no gate.
    pub async fn check_threshold(
        &self,
        org_id: &str,
        role: UserRole,
        subtotal: Decimal,
        discount_total: Decimal,
    ) -> anyhow::Result<Option<ApprovalRequirement>> {
        if discount_total <= Decimal::ZERO {
            return Ok(None);
        }
        let Some(policy) = self.policies.policy(org_id).await? else {
            return Ok(None);
        };

        let percent = if subtotal > Decimal::ZERO {
            discount_total / subtotal * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };

        let exceeded = Self::exceeded_ceiling(&policy, role, percent, discount_total);
        Ok(exceeded.map(|exceeded| ApprovalRequirement {
            discount_percent: to_f64(percent),
            discount_amount: to_f64(discount_total),
            exceeded: exceeded.to_string(),
        }))
    }

    fn exceeded_ceiling(
        policy: &ApprovalPolicy,
        role: UserRole,
        percent: Decimal,
        amount: Decimal,
    ) -> Option<&'static str> {
        if let Some(limit) = policy.limit_for(role) {
            if let Some(max_percent) = limit.max_discount_percent {
                if percent > to_decimal(max_percent) {
                    return Some(EXCEEDED_ROLE_PERCENT);
                }
            }
            if let Some(max_amount) = limit.max_discount_amount {
                if amount > to_decimal(max_amount) {
                    return Some(EXCEEDED_ROLE_AMOUNT);
                }
            }
        }
        if let Some(ratio) = policy.max_discount_ratio {
            if percent > to_decimal(ratio) * Decimal::ONE_HUNDRED {
                return Some(EXCEEDED_ORG_RATIO);
            }
        }
        None
    }

    /// Create a pending request for a discount that exceeded a ceiling
    pub fn create_request(
        &self,
        org_id: &str,
        proposal_id: Option<String>,
        requirement: &ApprovalRequirement,
        order_total: f64,
        requested_by: &str,
        requester_role: UserRole,
    ) -> ApprovalRequest {
        let request = ApprovalRequest {
            id: Uuid::new_v4().to_string(),
            org_id: org_id.to_string(),
            proposal_id,
            requested_percent: requirement.discount_percent,
            requested_amount: requirement.discount_amount,
            order_total,
            requested_by: requested_by.to_string(),
            requester_role,
            status: ApprovalStatus::Pending,
            reviewer_id: None,
            review_note: None,
            created_at: now_millis(),
            decided_at: None,
        };
        info!(
            request_id = %request.id,
            percent = request.requested_percent,
            "Approval request created"
        );
        self.requests.insert(request.id.clone(), request.clone());
        request
    }

    pub fn get(&self, id: &str) -> AppResult<ApprovalRequest> {
        self.requests
            .get(id)
            .map(|r| r.clone())
            .ok_or_else(|| AppError::NotFound(format!("approval request {id}")))
    }

    /// Pending request attached to a proposal, if any
    pub fn find_by_proposal(&self, org_id: &str, proposal_id: &str) -> Option<ApprovalRequest> {
        self.requests
            .iter()
            .filter(|r| r.org_id == org_id && r.proposal_id.as_deref() == Some(proposal_id))
            .max_by_key(|r| r.created_at)
            .map(|r| r.clone())
    }

    /// Resolve a pending request
    ///
    /// The entry lock on the map serializes concurrent reviews; whoever
    /// finds the request already resolved loses with `StaleRequest`.
    pub async fn review(
        &self,
        id: &str,
        reviewer_id: &str,
        reviewer_role: UserRole,
        decision: ApprovalDecision,
        note: Option<String>,
    ) -> AppResult<ApprovalRequest> {
        let min_role = {
            let request = self.get(id)?;
            let policy = self
                .policies
                .policy(&request.org_id)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
            policy.map(|p| p.min_reviewer_role).unwrap_or(UserRole::Manager)
        };

        if !reviewer_role.can_review(min_role) {
            return Err(AppError::Forbidden(format!(
                "role {reviewer_role} cannot review approvals (requires {min_role} or above)"
            )));
        }

        let mut entry = self
            .requests
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("approval request {id}")))?;

        if entry.is_resolved() {
            return Err(AppError::StaleRequest(format!(
                "approval request {id} already resolved"
            )));
        }

        entry.status = match decision {
            ApprovalDecision::Approve => ApprovalStatus::Approved,
            ApprovalDecision::Reject => ApprovalStatus::Rejected,
        };
        entry.reviewer_id = Some(reviewer_id.to_string());
        entry.review_note = note;
        entry.decided_at = Some(now_millis());

        info!(
            request_id = %id,
            status = ?entry.status,
            reviewer = %reviewer_id,
            "Approval request resolved"
        );
        Ok(entry.clone())
    }
}
