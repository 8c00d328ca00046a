//! Automatic Rule Configuration

use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::AutoRule;

#[async_trait]
pub trait AutoRuleProvider: Send + Sync {
    /// Active rules for the organization, in ascending priority order
    async fn rules(&self, org_id: &str) -> anyhow::Result<Vec<AutoRule>>;
}

/// In-memory auto rule store
#[derive(Debug, Default)]
pub struct InMemoryAutoRules {
    rules: DashMap<String, Vec<AutoRule>>,
}

impl InMemoryAutoRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, rule: AutoRule) {
        let mut entry = self.rules.entry(rule.org_id.clone()).or_default();
        entry.push(rule);
        entry.sort_by_key(|r| r.priority);
    }
}

#[async_trait]
impl AutoRuleProvider for InMemoryAutoRules {
    async fn rules(&self, org_id: &str) -> anyhow::Result<Vec<AutoRule>> {
        Ok(self
            .rules
            .get(org_id)
            .map(|list| list.iter().filter(|r| r.is_active).cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::RuleCondition;
    use shared::quote::DiscountType;

    fn rule(id: &str, priority: i32, active: bool) -> AutoRule {
        AutoRule {
            id: id.into(),
            org_id: "org-1".into(),
            name: id.into(),
            condition: RuleCondition::NewCustomer,
            discount_type: DiscountType::Percentage,
            value: 10.0,
            max_discount_amount: None,
            priority,
            is_active: active,
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn test_rules_sorted_and_filtered() {
        let provider = InMemoryAutoRules::new();
        provider.insert(rule("second", 20, true));
        provider.insert(rule("first", 10, true));
        provider.insert(rule("dormant", 5, false));

        let rules = provider.rules("org-1").await.unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].id, "first");
        assert_eq!(rules[1].id, "second");
    }
}
