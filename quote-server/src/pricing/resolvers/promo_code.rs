//! Promotional Code Resolver
//!
//! Fails closed: every failed check yields a distinguishable reason
//! code in the trail instead of a candidate.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::PromoCode;
use shared::quote::{
    CalculationContext, DiscountCandidate, DiscountScope, DiscountSource, ReasonCode, TrailEntry,
};

use crate::pricing::base::{to_decimal, to_f64};
use crate::pricing::resolver::{DiscountResolver, SourceResolution};
use crate::registry::PromoCodeRegistry;

/// Outcome of the eligibility checks, shared with the standalone
/// validate endpoint
#[derive(Debug, Clone)]
pub enum CodeCheck {
    Eligible(PromoCode),
    Ineligible { reason: ReasonCode, detail: String },
}

/// Run every eligibility check a code must pass
///
/// `customer_key` identifies the customer for per-customer usage
/// limits: the client id, or their email when not yet on file.
pub async fn check_code(
    registry: &dyn PromoCodeRegistry,
    org_id: &str,
    code_str: &str,
    customer_key: Option<&str>,
    ctx: Option<&CalculationContext>,
    order_amount: f64,
    now: i64,
) -> anyhow::Result<CodeCheck> {
    let Some(code) = registry.find(org_id, code_str).await? else {
        return Ok(CodeCheck::Ineligible {
            reason: ReasonCode::Invalid,
            detail: format!("code {} does not exist", code_str.trim().to_uppercase()),
        });
    };

    if !code.is_active {
        return Ok(CodeCheck::Ineligible {
            reason: ReasonCode::Invalid,
            detail: format!("code {} is inactive", code.code),
        });
    }

    if let Some(starts_at) = code.starts_at
        && now < starts_at
    {
        return Ok(CodeCheck::Ineligible {
            reason: ReasonCode::NotYetActive,
            detail: format!("code {} is not active yet", code.code),
        });
    }

    if let Some(expires_at) = code.expires_at
        && now > expires_at
    {
        return Ok(CodeCheck::Ineligible {
            reason: ReasonCode::Expired,
            detail: format!("code {} expired", code.code),
        });
    }

    if let Some(max_uses) = code.max_uses
        && code.use_count >= max_uses
    {
        return Ok(CodeCheck::Ineligible {
            reason: ReasonCode::UsageExceeded,
            detail: format!("code {} reached its usage limit", code.code),
        });
    }

    if let (Some(max_per_customer), Some(client)) = (code.max_uses_per_customer, customer_key) {
        let used = registry
            .customer_use_count(org_id, &code.code, client)
            .await?;
        if used >= max_per_customer {
            return Ok(CodeCheck::Ineligible {
                reason: ReasonCode::UsageExceeded,
                detail: format!("customer already used code {} {} times", code.code, used),
            });
        }
    }

    if let Some(min_order) = code.min_order_amount
        && order_amount < min_order
    {
        return Ok(CodeCheck::Ineligible {
            reason: ReasonCode::MinOrderNotMet,
            detail: format!(
                "order {:.2} below minimum {:.2} for code {}",
                order_amount, min_order, code.code
            ),
        });
    }

    // Scope restrictions only apply when a full context is available
    if let Some(ctx) = ctx {
        if let Some(allowed) = &code.allowed_service_ids {
            let outside = ctx
                .services
                .iter()
                .any(|s| !allowed.contains(&s.service_id));
            if outside {
                return Ok(CodeCheck::Ineligible {
                    reason: ReasonCode::ServiceNotEligible,
                    detail: format!("code {} is restricted to specific services", code.code),
                });
            }
        }

        if let Some(tiers) = &code.allowed_tiers
            && !tiers.contains(&ctx.tier)
        {
            return Ok(CodeCheck::Ineligible {
                reason: ReasonCode::TierNotEligible,
                detail: format!("code {} is not valid for this tier", code.code),
            });
        }
    }

    Ok(CodeCheck::Eligible(code))
}

/// Discount a code would yield against an order amount (cap applied)
pub fn preview_amount(code: &PromoCode, order_amount: f64) -> f64 {
    let amount = match code.discount_type {
        shared::quote::DiscountType::Percentage => {
            to_decimal(order_amount) * to_decimal(code.value) / Decimal::ONE_HUNDRED
        }
        shared::quote::DiscountType::FixedAmount => to_decimal(code.value),
    };
    let capped = match code.max_discount_amount {
        Some(cap) => amount.min(to_decimal(cap)),
        None => amount,
    };
    to_f64(capped)
}

pub struct PromoCodeResolver {
    registry: Arc<dyn PromoCodeRegistry>,
}

impl PromoCodeResolver {
    pub fn new(registry: Arc<dyn PromoCodeRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl DiscountResolver for PromoCodeResolver {
    fn source(&self) -> DiscountSource {
        DiscountSource::PromoCode
    }

    async fn resolve(
        &self,
        ctx: &CalculationContext,
        subtotal: Decimal,
    ) -> anyhow::Result<SourceResolution> {
        let Some(code_str) = ctx.promo_code.as_deref().filter(|c| !c.trim().is_empty()) else {
            return Ok(SourceResolution::none());
        };

        let now = shared::types::now_millis();
        let check = check_code(
            self.registry.as_ref(),
            &ctx.org_id,
            code_str,
            ctx.customer_key(),
            Some(ctx),
            to_f64(subtotal),
            now,
        )
        .await?;

        match check {
            CodeCheck::Eligible(code) => {
                let scope = match (&code.allowed_service_ids, &code.allowed_tiers) {
                    (Some(ids), _) => DiscountScope::Services {
                        service_ids: ids.clone(),
                    },
                    (None, Some(tiers)) => DiscountScope::Tiers {
                        tiers: tiers.clone(),
                    },
                    (None, None) => DiscountScope::Unrestricted,
                };
                Ok(SourceResolution::candidate(DiscountCandidate {
                    source: DiscountSource::PromoCode,
                    discount_type: code.discount_type,
                    value: code.value,
                    cap: code.max_discount_amount,
                    scope,
                    reason: code.code.clone(),
                }))
            }
            CodeCheck::Ineligible { reason, detail } => Ok(SourceResolution::rejected(
                TrailEntry::rejected(DiscountSource::PromoCode, reason, detail),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryPromoCodes;
    use shared::quote::DiscountType;

    fn code(overrides: impl FnOnce(&mut PromoCode)) -> PromoCode {
        let mut code = PromoCode {
            id: "pc-1".into(),
            org_id: "org-1".into(),
            code: "SAVE10".into(),
            description: None,
            discount_type: DiscountType::Percentage,
            value: 10.0,
            starts_at: None,
            expires_at: None,
            max_uses: None,
            use_count: 0,
            max_uses_per_customer: None,
            min_order_amount: None,
            max_discount_amount: None,
            allowed_service_ids: None,
            allowed_tiers: None,
            is_active: true,
            created_at: 0,
        };
        overrides(&mut code);
        code
    }

    async fn check(registry: &InMemoryPromoCodes, order_amount: f64) -> CodeCheck {
        check_code(registry, "org-1", "SAVE10", None, None, order_amount, 1000)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_code_is_invalid() {
        let registry = InMemoryPromoCodes::new();
        let result = check(&registry, 100.0).await;
        assert!(matches!(
            result,
            CodeCheck::Ineligible {
                reason: ReasonCode::Invalid,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_expired_code() {
        let registry = InMemoryPromoCodes::new();
        registry.insert(code(|c| c.expires_at = Some(500)));
        let result = check(&registry, 100.0).await;
        assert!(matches!(
            result,
            CodeCheck::Ineligible {
                reason: ReasonCode::Expired,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_min_order_not_met() {
        let registry = InMemoryPromoCodes::new();
        registry.insert(code(|c| c.min_order_amount = Some(1000.0)));
        let result = check(&registry, 500.0).await;
        assert!(matches!(
            result,
            CodeCheck::Ineligible {
                reason: ReasonCode::MinOrderNotMet,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_usage_limit_exceeded() {
        let registry = InMemoryPromoCodes::new();
        registry.insert(code(|c| {
            c.max_uses = Some(2);
            c.use_count = 2;
        }));
        let result = check(&registry, 100.0).await;
        assert!(matches!(
            result,
            CodeCheck::Ineligible {
                reason: ReasonCode::UsageExceeded,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_eligible_code() {
        let registry = InMemoryPromoCodes::new();
        registry.insert(code(|_| {}));
        let result = check(&registry, 100.0).await;
        assert!(matches!(result, CodeCheck::Eligible(_)));
    }

    #[test]
    fn test_preview_amount_capped() {
        let c = code(|c| c.max_discount_amount = Some(50.0));
        assert_eq!(preview_amount(&c, 1000.0), 50.0);
        assert_eq!(preview_amount(&c, 100.0), 10.0);
    }
}
