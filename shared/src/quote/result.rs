//! Calculation Result - the only externally visible output of the
//! pricing engine. Recomputed from scratch on every invocation.

use serde::{Deserialize, Serialize};

use super::candidate::{DiscountCandidate, ReasonCode, TrailEntry};

/// A candidate that actually landed, with its computed amount
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedDiscount {
    #[serde(flatten)]
    pub candidate: DiscountCandidate,
    /// Absolute amount against the pre-discount subtotal
    pub amount: f64,
}

/// Ordered set of discounts applied after stacking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppliedDiscountSet {
    pub applied: Vec<AppliedDiscount>,
    /// Aggregate discount, bounded to [0, subtotal]
    pub discount_total: f64,
    /// Subtotal after discounts
    pub after_discount: f64,
}

/// Approval requirement attached to a provisional result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApprovalRequirement {
    /// Discount percent relative to the subtotal
    pub discount_percent: f64,
    pub discount_amount: f64,
    /// Which ceiling tripped (role-percent, role-amount, org-ratio)
    pub exceeded: String,
}

/// Final calculation output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationResult {
    /// Condition-adjusted subtotal before discounts
    pub subtotal: f64,
    pub discounts: AppliedDiscountSet,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub total: f64,
    /// True when the discount exceeds the acting user's authority and
    /// an approval must reach `approved` before finalization
    pub provisional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_required: Option<ApprovalRequirement>,
    /// One entry per evaluated source, including rejected ones
    pub trail: Vec<TrailEntry>,
}

/// Standalone promo-code validation result (for pre-flight UI checks)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidateCodeResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Discount the code would yield on the given order amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_preview: Option<f64>,
}

impl ValidateCodeResult {
    pub fn valid(discount_preview: f64) -> Self {
        Self {
            valid: true,
            reason: None,
            message: None,
            discount_preview: Some(discount_preview),
        }
    }

    pub fn invalid(reason: ReasonCode, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
            message: Some(message.into()),
            discount_preview: None,
        }
    }
}
