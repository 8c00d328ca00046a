//! Volume Tier Model

use serde::{Deserialize, Serialize};

use crate::quote::DiscountType;

/// One threshold row of the volume discount table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VolumeTier {
    /// Minimum subtotal that unlocks this tier
    pub threshold: f64,
    pub discount_type: DiscountType,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Per-organization threshold table, ordered ascending
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VolumeTierTable {
    pub org_id: String,
    pub tiers: Vec<VolumeTier>,
}

impl VolumeTierTable {
    /// Highest tier whose threshold does not exceed the subtotal
    pub fn tier_for(&self, subtotal: f64) -> Option<&VolumeTier> {
        self.tiers
            .iter()
            .filter(|t| t.threshold <= subtotal)
            .max_by(|a, b| {
                a.threshold
                    .partial_cmp(&b.threshold)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> VolumeTierTable {
        VolumeTierTable {
            org_id: "org-1".into(),
            tiers: vec![
                VolumeTier {
                    threshold: 1000.0,
                    discount_type: DiscountType::Percentage,
                    value: 2.0,
                    label: None,
                },
                VolumeTier {
                    threshold: 5000.0,
                    discount_type: DiscountType::Percentage,
                    value: 5.0,
                    label: None,
                },
                VolumeTier {
                    threshold: 10000.0,
                    discount_type: DiscountType::Percentage,
                    value: 8.0,
                    label: None,
                },
            ],
        }
    }

    #[test]
    fn test_highest_matching_threshold_wins() {
        let t = table();
        assert!(t.tier_for(500.0).is_none());
        assert_eq!(t.tier_for(1000.0).unwrap().value, 2.0);
        assert_eq!(t.tier_for(7500.0).unwrap().value, 5.0);
        assert_eq!(t.tier_for(25000.0).unwrap().value, 8.0);
    }

    #[test]
    fn test_empty_table() {
        let t = VolumeTierTable::default();
        assert!(t.tier_for(10000.0).is_none());
    }
}
