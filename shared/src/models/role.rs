//! Role Model
//!
//! Ordered role ladder with per-role discount authority. Authority
//! comparison drives both the approval gate and review permission.

use serde::{Deserialize, Serialize};

/// Acting user's role, ordered by authority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Sales,
    Manager,
    Admin,
    Owner,
}

impl UserRole {
    /// Numeric authority rank (higher outranks lower)
    pub fn authority(&self) -> u8 {
        match self {
            UserRole::Sales => 1,
            UserRole::Manager => 2,
            UserRole::Admin => 3,
            UserRole::Owner => 4,
        }
    }

    /// Whether this role can review requests gated at `minimum`
    pub fn can_review(&self, minimum: UserRole) -> bool {
        self.authority() >= minimum.authority()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UserRole::Sales => "sales",
            UserRole::Manager => "manager",
            UserRole::Admin => "admin",
            UserRole::Owner => "owner",
        };
        write!(f, "{}", name)
    }
}

/// Discount ceiling configuration for one role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleLimit {
    pub role: UserRole,
    /// Maximum discount percent this role may grant unreviewed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount_percent: Option<f64>,
    /// Maximum absolute discount amount this role may grant unreviewed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount_amount: Option<f64>,
}
