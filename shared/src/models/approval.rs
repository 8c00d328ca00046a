//! Approval Request Model
//!
//! State machine record created when a discount exceeds the acting
//! user's authority. Transitions exactly once to approved or rejected;
//! a changed amount requires a new request.

use serde::{Deserialize, Serialize};

use super::role::{RoleLimit, UserRole};

/// Request status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// Reviewer decision
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalDecision {
    Approve,
    Reject,
}

/// Discount approval request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApprovalRequest {
    pub id: String,
    pub org_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<String>,
    /// Requested discount percent relative to the subtotal
    pub requested_percent: f64,
    pub requested_amount: f64,
    /// Order subtotal at request time
    pub order_total: f64,
    pub requested_by: String,
    pub requester_role: UserRole,
    pub status: ApprovalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_note: Option<String>,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<i64>,
}

impl ApprovalRequest {
    pub fn is_resolved(&self) -> bool {
        self.status != ApprovalStatus::Pending
    }
}

/// Organization approval policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApprovalPolicy {
    pub org_id: String,
    /// Lowest role allowed to resolve pending requests
    pub min_reviewer_role: UserRole,
    /// Organization-wide ceiling on discount/subtotal ratio (0.30 = 30%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount_ratio: Option<f64>,
    pub role_limits: Vec<RoleLimit>,
}

impl ApprovalPolicy {
    pub fn limit_for(&self, role: UserRole) -> Option<&RoleLimit> {
        self.role_limits.iter().find(|l| l.role == role)
    }
}
