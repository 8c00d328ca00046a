//! Discount Candidate - one source's proposed discount, plus the audit
//! trail entries every evaluated source leaves behind.

use serde::{Deserialize, Serialize};

use super::context::QualityTier;

/// Where a discount came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountSource {
    PromoCode,
    Loyalty,
    Seasonal,
    Volume,
    AutoRule,
    Manual,
}

impl DiscountSource {
    /// Fixed evaluation order used for the explanation trail
    pub const ALL: [DiscountSource; 6] = [
        DiscountSource::Manual,
        DiscountSource::PromoCode,
        DiscountSource::Loyalty,
        DiscountSource::Seasonal,
        DiscountSource::Volume,
        DiscountSource::AutoRule,
    ];
}

/// Percentage vs fixed-amount discount
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    Percentage,
    FixedAmount,
}

/// Scope restriction carried by a candidate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "kind")]
pub enum DiscountScope {
    #[default]
    Unrestricted,
    Services {
        service_ids: Vec<String>,
    },
    Tiers {
        tiers: Vec<QualityTier>,
    },
}

/// A discount one resolver proposes for the stacking engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscountCandidate {
    pub source: DiscountSource,
    pub discount_type: DiscountType,
    /// Percentage (10 = 10%) or fixed currency amount
    pub value: f64,
    /// Maximum absolute amount regardless of percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<f64>,
    #[serde(default)]
    pub scope: DiscountScope,
    /// Human-readable label for receipts and audit
    pub reason: String,
}

/// Machine-readable outcome reason for the explanation trail
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ReasonCode {
    Applied,
    Invalid,
    Expired,
    NotYetActive,
    UsageExceeded,
    MinOrderNotMet,
    ServiceNotEligible,
    TierNotEligible,
    NotEnrolled,
    InsufficientPoints,
    BelowThreshold,
    NoMatchingRule,
    NoActiveCampaign,
    Superseded,
    SupersededByManual,
    ZeroSubtotal,
    ResolverError,
    NotApplicable,
}

/// Final disposition of a trail entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrailStatus {
    Applied,
    Rejected,
    Superseded,
    Skipped,
    Error,
}

/// One line of the explanation trail
///
/// Every evaluated source produces at least one entry, including the
/// rejected and superseded ones. The trail is the audit record a
/// salesperson sees when a discount does not land.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrailEntry {
    pub source: DiscountSource,
    pub status: TrailStatus,
    pub reason: ReasonCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Applied amount, when the entry represents an applied discount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl TrailEntry {
    pub fn applied(source: DiscountSource, amount: f64, detail: impl Into<String>) -> Self {
        Self {
            source,
            status: TrailStatus::Applied,
            reason: ReasonCode::Applied,
            detail: Some(detail.into()),
            amount: Some(amount),
        }
    }

    pub fn rejected(source: DiscountSource, reason: ReasonCode, detail: impl Into<String>) -> Self {
        Self {
            source,
            status: TrailStatus::Rejected,
            reason,
            detail: Some(detail.into()),
            amount: None,
        }
    }

    pub fn superseded(source: DiscountSource, reason: ReasonCode, detail: impl Into<String>) -> Self {
        Self {
            source,
            status: TrailStatus::Superseded,
            reason,
            detail: Some(detail.into()),
            amount: None,
        }
    }

    pub fn skipped(source: DiscountSource, reason: ReasonCode) -> Self {
        Self {
            source,
            status: TrailStatus::Skipped,
            reason,
            detail: None,
            amount: None,
        }
    }

    pub fn error(source: DiscountSource, detail: impl Into<String>) -> Self {
        Self {
            source,
            status: TrailStatus::Error,
            reason: ReasonCode::ResolverError,
            detail: Some(detail.into()),
            amount: None,
        }
    }
}
