//! Loyalty Program Model

use serde::{Deserialize, Serialize};

/// Organization-level loyalty program configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoyaltyProgram {
    pub org_id: String,
    /// Currency value of one point (e.g. 0.05 = 5 cents per point)
    pub point_rate: f64,
    /// Minimum points a customer must redeem at once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_redeem_points: Option<i64>,
    pub is_active: bool,
}

/// A customer's loyalty account (enrollment implied by existence)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoyaltyAccount {
    pub client_id: String,
    pub org_id: String,
    pub points_balance: i64,
    #[serde(default)]
    pub lifetime_points: i64,
    pub created_at: i64,
}
