//! Promotional Code Model

use serde::{Deserialize, Serialize};

use crate::quote::{DiscountType, QualityTier};

/// Promotional code entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromoCode {
    pub id: String,
    pub org_id: String,
    /// The string customers type in (case-insensitive lookup)
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub discount_type: DiscountType,
    /// Percentage (10 = 10%) or fixed currency amount
    pub value: f64,
    /// Valid from datetime (Unix millis)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<i64>,
    /// Valid until datetime (Unix millis)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// Organization-wide usage ceiling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    /// Current organization-wide usage count
    #[serde(default)]
    pub use_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_uses_per_customer: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<f64>,
    /// Absolute cap regardless of percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount_amount: Option<f64>,
    /// When set, only these services are eligible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_service_ids: Option<Vec<String>>,
    /// When set, only these tiers are eligible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_tiers: Option<Vec<QualityTier>>,
    pub is_active: bool,
    pub created_at: i64,
}

/// Create promo code payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoCodeCreate {
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub value: f64,
    pub starts_at: Option<i64>,
    pub expires_at: Option<i64>,
    pub max_uses: Option<u32>,
    pub max_uses_per_customer: Option<u32>,
    pub min_order_amount: Option<f64>,
    pub max_discount_amount: Option<f64>,
    pub allowed_service_ids: Option<Vec<String>>,
    pub allowed_tiers: Option<Vec<QualityTier>>,
}
