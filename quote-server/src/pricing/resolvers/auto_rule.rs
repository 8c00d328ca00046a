//! Automatic Rule Resolver
//!
//! Evaluates the organization's condition rules in fixed priority
//! order; the first matching rule wins, rules never combine.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::quote::{
    CalculationContext, DiscountCandidate, DiscountSource, ReasonCode, TrailEntry,
};

use crate::pricing::base::to_f64;
use crate::pricing::resolver::{DiscountResolver, SourceResolution};
use crate::registry::AutoRuleProvider;

pub struct AutoRuleResolver {
    provider: Arc<dyn AutoRuleProvider>,
}

impl AutoRuleResolver {
    pub fn new(provider: Arc<dyn AutoRuleProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DiscountResolver for AutoRuleResolver {
    fn source(&self) -> DiscountSource {
        DiscountSource::AutoRule
    }

    async fn resolve(
        &self,
        ctx: &CalculationContext,
        subtotal: Decimal,
    ) -> anyhow::Result<SourceResolution> {
        let rules = self.provider.rules(&ctx.org_id).await?;
        if rules.is_empty() {
            return Ok(SourceResolution::none());
        }

        let subtotal_f64 = to_f64(subtotal);
        let Some(winner) = rules.iter().find(|r| r.condition.matches(ctx, subtotal_f64)) else {
            return Ok(SourceResolution::rejected(TrailEntry::skipped(
                DiscountSource::AutoRule,
                ReasonCode::NoMatchingRule,
            )));
        };

        Ok(SourceResolution::candidate(DiscountCandidate {
            source: DiscountSource::AutoRule,
            discount_type: winner.discount_type,
            value: winner.value,
            cap: winner.max_discount_amount,
            scope: Default::default(),
            reason: winner.name.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryAutoRules;
    use shared::models::{AutoRule, RuleCondition, UserRole};
    use shared::quote::{DiscountType, QualityTier, SurfaceCondition};

    fn ctx(is_new: bool) -> CalculationContext {
        CalculationContext {
            org_id: "org-1".into(),
            proposal_id: None,
            services: vec![],
            tier: QualityTier::Standard,
            condition: SurfaceCondition::Good,
            client_id: None,
            client_email: None,
            is_new_customer: is_new,
            promo_code: None,
            manual_discount: None,
            redeem_points: None,
            user_id: "user-1".into(),
            user_role: UserRole::Sales,
        }
    }

    fn rule(name: &str, condition: RuleCondition, value: f64, priority: i32) -> AutoRule {
        AutoRule {
            id: name.into(),
            org_id: "org-1".into(),
            name: name.into(),
            condition,
            discount_type: DiscountType::Percentage,
            value,
            max_discount_amount: None,
            priority,
            is_active: true,
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn test_first_matching_rule_wins() {
        let provider = InMemoryAutoRules::new();
        provider.insert(rule("new customer", RuleCondition::NewCustomer, 10.0, 1));
        provider.insert(rule(
            "big order",
            RuleCondition::SubtotalAtLeast { amount: 100.0 },
            20.0,
            2,
        ));

        let resolver = AutoRuleResolver::new(Arc::new(provider));
        let resolution = resolver
            .resolve(&ctx(true), Decimal::from(5_000))
            .await
            .unwrap();

        // Both match, but the lower priority number comes first
        assert_eq!(resolution.candidate.unwrap().reason, "new customer");
    }

    #[tokio::test]
    async fn test_no_matching_rule() {
        let provider = InMemoryAutoRules::new();
        provider.insert(rule("new customer", RuleCondition::NewCustomer, 10.0, 1));

        let resolver = AutoRuleResolver::new(Arc::new(provider));
        let resolution = resolver
            .resolve(&ctx(false), Decimal::from(5_000))
            .await
            .unwrap();

        assert!(resolution.candidate.is_none());
        assert_eq!(resolution.trail[0].reason, ReasonCode::NoMatchingRule);
    }
}
