//! Automatic Discount Rule Model

use serde::{Deserialize, Serialize};

use crate::quote::{CalculationContext, DiscountType, QualityTier};

/// Condition that triggers an automatic rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "type")]
pub enum RuleCondition {
    /// First order of a new customer
    NewCustomer,
    /// Subtotal at or above a floor
    SubtotalAtLeast { amount: f64 },
    /// Proposal is for a specific quality tier
    TierIs { tier: QualityTier },
}

impl RuleCondition {
    /// Evaluate against the calculation context
    pub fn matches(&self, ctx: &CalculationContext, subtotal: f64) -> bool {
        match self {
            RuleCondition::NewCustomer => ctx.is_new_customer,
            RuleCondition::SubtotalAtLeast { amount } => subtotal >= *amount,
            RuleCondition::TierIs { tier } => ctx.tier == *tier,
        }
    }
}

/// Organization-configured automatic rule
///
/// Rules are evaluated in ascending `priority` order; the first match
/// wins and no combination happens among auto rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutoRule {
    pub id: String,
    pub org_id: String,
    pub name: String,
    pub condition: RuleCondition,
    pub discount_type: DiscountType,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount_amount: Option<f64>,
    pub priority: i32,
    pub is_active: bool,
    pub created_at: i64,
}
