//! Loyalty Resolver
//!
//! Previews a points-to-currency redemption. The resolver never
//! touches the balance; the deduction is committed only when the
//! proposal is finalized.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::quote::{
    CalculationContext, DiscountCandidate, DiscountSource, DiscountType, ReasonCode, TrailEntry,
};

use crate::pricing::base::{to_decimal, to_f64};
use crate::pricing::resolver::{DiscountResolver, SourceResolution};
use crate::registry::LoyaltyLedger;

pub struct LoyaltyResolver {
    ledger: Arc<dyn LoyaltyLedger>,
}

impl LoyaltyResolver {
    pub fn new(ledger: Arc<dyn LoyaltyLedger>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl DiscountResolver for LoyaltyResolver {
    fn source(&self) -> DiscountSource {
        DiscountSource::Loyalty
    }

    async fn resolve(
        &self,
        ctx: &CalculationContext,
        _subtotal: Decimal,
    ) -> anyhow::Result<SourceResolution> {
        let Some(requested) = ctx.redeem_points.filter(|p| *p > 0) else {
            return Ok(SourceResolution::none());
        };

        let Some(client_id) = ctx.client_id.as_deref() else {
            return Ok(SourceResolution::rejected(TrailEntry::rejected(
                DiscountSource::Loyalty,
                ReasonCode::NotEnrolled,
                "no client on the proposal",
            )));
        };

        let Some(program) = self
            .ledger
            .program(&ctx.org_id)
            .await?
            .filter(|p| p.is_active)
        else {
            return Ok(SourceResolution::rejected(TrailEntry::rejected(
                DiscountSource::Loyalty,
                ReasonCode::NotEnrolled,
                "loyalty program not configured",
            )));
        };

        let Some(account) = self.ledger.account(&ctx.org_id, client_id).await? else {
            return Ok(SourceResolution::rejected(TrailEntry::rejected(
                DiscountSource::Loyalty,
                ReasonCode::NotEnrolled,
                format!("customer {} is not enrolled", client_id),
            )));
        };

        if let Some(min) = program.min_redeem_points
            && requested < min
        {
            return Ok(SourceResolution::rejected(TrailEntry::rejected(
                DiscountSource::Loyalty,
                ReasonCode::InsufficientPoints,
                format!("minimum redemption is {} points", min),
            )));
        }

        if account.points_balance <= 0 {
            return Ok(SourceResolution::rejected(TrailEntry::rejected(
                DiscountSource::Loyalty,
                ReasonCode::InsufficientPoints,
                "no points available",
            )));
        }

        // Never redeem more than the current balance
        let points = requested.min(account.points_balance);
        let amount = Decimal::from(points) * to_decimal(program.point_rate);

        Ok(SourceResolution::candidate(DiscountCandidate {
            source: DiscountSource::Loyalty,
            discount_type: DiscountType::FixedAmount,
            value: to_f64(amount),
            cap: None,
            scope: Default::default(),
            reason: format!("{} loyalty points", points),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryLoyalty;
    use shared::models::{LoyaltyAccount, LoyaltyProgram, UserRole};
    use shared::quote::{QualityTier, SurfaceCondition};

    fn ctx(redeem: Option<i64>, client: Option<&str>) -> CalculationContext {
        CalculationContext {
            org_id: "org-1".into(),
            proposal_id: None,
            services: vec![],
            tier: QualityTier::Standard,
            condition: SurfaceCondition::Good,
            client_id: client.map(Into::into),
            client_email: None,
            is_new_customer: false,
            promo_code: None,
            manual_discount: None,
            redeem_points: redeem,
            user_id: "user-1".into(),
            user_role: UserRole::Sales,
        }
    }

    fn ledger(balance: i64) -> InMemoryLoyalty {
        let ledger = InMemoryLoyalty::new();
        ledger.set_program(LoyaltyProgram {
            org_id: "org-1".into(),
            point_rate: 0.05,
            min_redeem_points: Some(100),
            is_active: true,
        });
        ledger.set_account(LoyaltyAccount {
            client_id: "client-1".into(),
            org_id: "org-1".into(),
            points_balance: balance,
            lifetime_points: balance,
            created_at: 0,
        });
        ledger
    }

    #[tokio::test]
    async fn test_points_converted_at_program_rate() {
        let resolver = LoyaltyResolver::new(Arc::new(ledger(1000)));
        let resolution = resolver
            .resolve(&ctx(Some(400), Some("client-1")), Decimal::ONE_HUNDRED)
            .await
            .unwrap();

        let candidate = resolution.candidate.unwrap();
        assert_eq!(candidate.discount_type, DiscountType::FixedAmount);
        assert_eq!(candidate.value, 20.0); // 400 × 0.05
    }

    #[tokio::test]
    async fn test_redemption_clamped_to_balance() {
        let resolver = LoyaltyResolver::new(Arc::new(ledger(300)));
        let resolution = resolver
            .resolve(&ctx(Some(5000), Some("client-1")), Decimal::ONE_HUNDRED)
            .await
            .unwrap();

        assert_eq!(resolution.candidate.unwrap().value, 15.0); // 300 × 0.05
    }

    #[tokio::test]
    async fn test_unenrolled_customer_rejected() {
        let resolver = LoyaltyResolver::new(Arc::new(ledger(1000)));
        let resolution = resolver
            .resolve(&ctx(Some(400), Some("stranger")), Decimal::ONE_HUNDRED)
            .await
            .unwrap();

        assert!(resolution.candidate.is_none());
        assert_eq!(resolution.trail[0].reason, ReasonCode::NotEnrolled);
    }

    #[tokio::test]
    async fn test_below_minimum_redemption() {
        let resolver = LoyaltyResolver::new(Arc::new(ledger(1000)));
        let resolution = resolver
            .resolve(&ctx(Some(50), Some("client-1")), Decimal::ONE_HUNDRED)
            .await
            .unwrap();

        assert!(resolution.candidate.is_none());
        assert_eq!(resolution.trail[0].reason, ReasonCode::InsufficientPoints);
    }

    #[tokio::test]
    async fn test_no_redemption_requested() {
        let resolver = LoyaltyResolver::new(Arc::new(ledger(1000)));
        let resolution = resolver
            .resolve(&ctx(None, Some("client-1")), Decimal::ONE_HUNDRED)
            .await
            .unwrap();

        assert!(resolution.candidate.is_none());
        assert!(resolution.trail.is_empty());
    }
}
