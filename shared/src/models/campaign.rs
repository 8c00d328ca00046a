//! Seasonal Campaign Model

use serde::{Deserialize, Serialize};

use crate::quote::DiscountType;

/// Time-windowed discount campaign
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonalCampaign {
    pub id: String,
    pub org_id: String,
    pub name: String,
    pub discount_type: DiscountType,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount_amount: Option<f64>,
    /// Window start (Unix millis, inclusive)
    pub starts_at: i64,
    /// Window end (Unix millis, inclusive)
    pub ends_at: i64,
    pub is_active: bool,
    pub created_at: i64,
}

impl SeasonalCampaign {
    /// Whether the campaign window contains the given instant
    pub fn is_active_at(&self, now: i64) -> bool {
        self.is_active && self.starts_at <= now && now <= self.ends_at
    }
}

/// Create campaign payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalCampaignCreate {
    pub name: String,
    pub discount_type: DiscountType,
    pub value: f64,
    pub max_discount_amount: Option<f64>,
    pub starts_at: i64,
    pub ends_at: i64,
}
