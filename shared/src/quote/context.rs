//! Calculation Context
//!
//! Immutable input snapshot for one pricing calculation. External
//! collaborators (proposal editor, session layer) build this once per
//! recalculation; the engine never mutates it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::role::UserRole;

/// Quality/pricing tier multiplying base rates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityTier {
    Economy,
    Standard,
    Premium,
}

impl QualityTier {
    /// Fixed, organization-independent rate multiplier
    pub fn multiplier(&self) -> Decimal {
        match self {
            QualityTier::Economy => Decimal::new(85, 2),  // 0.85
            QualityTier::Standard => Decimal::ONE,        // 1.00
            QualityTier::Premium => Decimal::new(135, 2), // 1.35
        }
    }
}

/// Surface/property condition adjusting the whole subtotal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurfaceCondition {
    Good,
    Fair,
    Poor,
}

impl SurfaceCondition {
    /// Fixed condition multiplier applied to the subtotal
    pub fn multiplier(&self) -> Decimal {
        match self {
            SurfaceCondition::Good => Decimal::ONE,       // 1.00
            SurfaceCondition::Fair => Decimal::new(115, 2), // 1.15
            SurfaceCondition::Poor => Decimal::new(130, 2), // 1.30
        }
    }
}

/// One requested service line (rates already validated by the caller)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceRequest {
    pub service_id: String,
    pub quantity: f64,
    /// Unit rate in the proposal's currency
    pub unit_rate: f64,
    /// Measurement unit for display (sqft, linear ft, each, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Manual discount entered by the salesperson
///
/// Percent and amount are mutually exclusive; if both are set the
/// percentage takes precedence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ManualDiscount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl ManualDiscount {
    pub fn is_empty(&self) -> bool {
        self.percent.is_none() && self.amount.is_none()
    }
}

/// Input context for one calculation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationContext {
    pub org_id: String,
    /// Proposal/draft identifier (used for finalization idempotency)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<String>,
    pub services: Vec<ServiceRequest>,
    pub tier: QualityTier,
    pub condition: SurfaceCondition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(default)]
    pub is_new_customer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_discount: Option<ManualDiscount>,
    /// Loyalty points the customer asked to redeem on this proposal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redeem_points: Option<i64>,
    pub user_id: String,
    pub user_role: UserRole,
}

impl CalculationContext {
    /// Identity used for per-customer usage tracking: the client id
    /// when the customer is on file, otherwise their email
    pub fn customer_key(&self) -> Option<&str> {
        self.client_id.as_deref().or(self.client_email.as_deref())
    }
}
