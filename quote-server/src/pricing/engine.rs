//! Pricing Engine
//!
//! Orchestrates one calculation: base pricing, concurrent discount
//! source resolution, stacking, the approval threshold check, and
//! result assembly. `calculate` is side-effect free; usage counters
//! and point redemptions move only in `finalize`.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashSet;
use futures::future::join_all;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use shared::quote::{
    CalculationContext, CalculationResult, DiscountSource, ReasonCode, TrailEntry,
    ValidateCodeResult,
};
use shared::types::now_millis;
use tracing::{debug, warn};

use crate::approval::ApprovalService;
use crate::registry::{LoyaltyLedger, PromoCodeRegistry};
use crate::utils::{AppError, AppResult};
use shared::models::ApprovalStatus;

use super::base::{calculate_base, to_decimal};
use super::resolver::{DiscountResolver, SourceResolution};
use super::resolvers::{check_code, preview_amount, CodeCheck};
use super::stacking::stack_discounts;
use super::{assembler, stacking::StackResult};

pub struct PricingEngine {
    resolvers: Vec<Arc<dyn DiscountResolver>>,
    promo_codes: Arc<dyn PromoCodeRegistry>,
    loyalty: Arc<dyn LoyaltyLedger>,
    approvals: Arc<ApprovalService>,
    tax_rate: f64,
    resolver_timeout: Duration,
    /// Proposal ids whose side effects already ran
    finalized: DashSet<String>,
}

impl PricingEngine {
    pub fn new(
        resolvers: Vec<Arc<dyn DiscountResolver>>,
        promo_codes: Arc<dyn PromoCodeRegistry>,
        loyalty: Arc<dyn LoyaltyLedger>,
        approvals: Arc<ApprovalService>,
        tax_rate: f64,
        resolver_timeout: Duration,
    ) -> Self {
        Self {
            resolvers,
            promo_codes,
            loyalty,
            approvals,
            tax_rate,
            resolver_timeout,
            finalized: DashSet::new(),
        }
    }

    fn validate(ctx: &CalculationContext) -> AppResult<()> {
        if ctx.org_id.trim().is_empty() {
            return Err(AppError::Validation("org_id is required".into()));
        }
        if ctx.user_id.trim().is_empty() {
            return Err(AppError::Validation("user_id is required".into()));
        }
        for service in &ctx.services {
            if !service.quantity.is_finite() || !service.unit_rate.is_finite() {
                return Err(AppError::Validation(format!(
                    "service {} has a non-finite quantity or rate",
                    service.service_id
                )));
            }
        }
        if let Some(manual) = &ctx.manual_discount {
            if let Some(percent) = manual.percent
                && !(0.0..=100.0).contains(&percent)
            {
                return Err(AppError::Validation(format!(
                    "manual discount percent {percent} out of range"
                )));
            }
            if let Some(amount) = manual.amount
                && amount < 0.0
            {
                return Err(AppError::Validation(
                    "manual discount amount cannot be negative".into(),
                ));
            }
        }
        if let Some(points) = ctx.redeem_points
            && points < 0
        {
            return Err(AppError::Validation(
                "redeem_points cannot be negative".into(),
            ));
        }
        Ok(())
    }

    /// Run every resolver concurrently, each under its own timeout
    ///
    /// A resolver failure or timeout degrades to a `resolver-error`
    /// trail entry for that source; the calculation never aborts.
    async fn resolve_all(
        &self,
        ctx: &CalculationContext,
        subtotal: Decimal,
    ) -> Vec<(DiscountSource, SourceResolution)> {
        let futures = self.resolvers.iter().map(|resolver| {
            let source = resolver.source();
            async move {
                let outcome =
                    tokio::time::timeout(self.resolver_timeout, resolver.resolve(ctx, subtotal))
                        .await;
                let resolution = match outcome {
                    Ok(Ok(resolution)) => resolution,
                    Ok(Err(err)) => {
                        warn!(source = ?source, error = %err, "Discount resolver failed");
                        SourceResolution::rejected(TrailEntry::error(source, err.to_string()))
                    }
                    Err(_) => {
                        warn!(source = ?source, "Discount resolver timed out");
                        SourceResolution::rejected(TrailEntry::error(source, "resolver timed out"))
                    }
                };
                (source, resolution)
            }
        });
        join_all(futures).await
    }

    fn stack(
        &self,
        ctx: &CalculationContext,
        subtotal: Decimal,
        resolutions: Vec<(DiscountSource, SourceResolution)>,
    ) -> StackResult {
        let mut stacked = stack_discounts(subtotal, ctx.manual_discount.as_ref(), resolutions);

        // Every source appears in the trail at least once, including
        // the manual slot when nothing was entered
        for source in DiscountSource::ALL {
            if !stacked.trail.iter().any(|e| e.source == source) {
                stacked
                    .trail
                    .push(TrailEntry::skipped(source, ReasonCode::NotApplicable));
            }
        }
        stacked
    }

    /// One full calculation: deterministic for a given context and
    /// registry state, no side effects
    pub async fn calculate(&self, ctx: &CalculationContext) -> AppResult<CalculationResult> {
        Self::validate(ctx)?;

        let base = calculate_base(&ctx.services, ctx.tier, ctx.condition);
        let subtotal = base.adjusted_decimal();
        debug!(
            org_id = %ctx.org_id,
            subtotal = base.condition_adjusted,
            "Base quote computed"
        );

        let resolutions = self.resolve_all(ctx, subtotal).await;
        let stacked = self.stack(ctx, subtotal, resolutions);

        let approval_required = self
            .approvals
            .check_threshold(
                &ctx.org_id,
                ctx.user_role,
                subtotal,
                to_decimal(stacked.set.discount_total),
            )
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(assembler::assemble(
            subtotal,
            stacked,
            self.tax_rate,
            approval_required,
            Vec::new(),
        ))
    }

    /// Standalone promo-code check for pre-flight UI validation
    ///
    /// Per-customer usage is keyed by client id, falling back to the
    /// email for customers not yet on file.
    pub async fn validate_code(
        &self,
        org_id: &str,
        code: &str,
        order_amount: f64,
        client_id: Option<&str>,
        client_email: Option<&str>,
    ) -> AppResult<ValidateCodeResult> {
        let check = check_code(
            self.promo_codes.as_ref(),
            org_id,
            code,
            client_id.or(client_email),
            None,
            order_amount,
            now_millis(),
        )
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(match check {
            CodeCheck::Eligible(code) => {
                ValidateCodeResult::valid(preview_amount(&code, order_amount))
            }
            CodeCheck::Ineligible { reason, detail } => {
                ValidateCodeResult::invalid(reason, detail)
            }
        })
    }

    /// Finalize a proposal: recalculate, enforce the approval gate,
    /// then commit usage counters and point redemptions exactly once
    pub async fn finalize(&self, ctx: &CalculationContext) -> AppResult<CalculationResult> {
        let proposal_id = ctx
            .proposal_id
            .clone()
            .ok_or_else(|| AppError::Validation("proposal_id is required to finalize".into()))?;

        let result = self.calculate(ctx).await?;

        if result.provisional {
            let request = self.approvals.find_by_proposal(&ctx.org_id, &proposal_id);
            match request {
                Some(request) if request.status == ApprovalStatus::Approved => {
                    // An approval covers the amount it was requested
                    // for; a deeper discount needs a new request
                    if let Some(requirement) = &result.approval_required
                        && (requirement.discount_amount > request.requested_amount
                            || requirement.discount_percent > request.requested_percent)
                    {
                        return Err(AppError::BusinessRule(format!(
                            "discount {:.2} exceeds the approved {:.2}; a new approval is required",
                            requirement.discount_amount, request.requested_amount
                        )));
                    }
                }
                Some(request) if request.status == ApprovalStatus::Rejected => {
                    return Err(AppError::BusinessRule(
                        "discount was rejected; remove it before finalizing".into(),
                    ));
                }
                _ => {
                    return Err(AppError::BusinessRule(
                        "discount exceeds your authority and is not approved yet".into(),
                    ));
                }
            }
        }

        // Repeat finalizations are idempotent: the first one commits
        if !self.finalized.insert(proposal_id.clone()) {
            debug!(proposal_id = %proposal_id, "Proposal already finalized, skipping commits");
            return Ok(result);
        }

        // A failed commit must stay retryable
        if let Err(err) = self.commit_side_effects(ctx, &result).await {
            self.finalized.remove(&proposal_id);
            return Err(err);
        }
        Ok(result)
    }

    async fn commit_side_effects(
        &self,
        ctx: &CalculationContext,
        result: &CalculationResult,
    ) -> AppResult<()> {
        for applied in &result.discounts.applied {
            match applied.candidate.source {
                DiscountSource::PromoCode => {
                    if let Some(code) = &ctx.promo_code {
                        self.promo_codes
                            .record_use(&ctx.org_id, code, ctx.customer_key())
                            .await
                            .map_err(|e| AppError::Internal(e.to_string()))?;
                    }
                }
                DiscountSource::Loyalty => {
                    if let (Some(client), Some(points)) =
                        (ctx.client_id.as_deref(), self.redeemed_points(ctx, applied.candidate.value).await?)
                    {
                        self.loyalty
                            .commit_redemption(&ctx.org_id, client, points)
                            .await
                            .map_err(|e| AppError::Internal(e.to_string()))?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Points actually redeemed, derived from the applied amount and
    /// the program's point rate
    async fn redeemed_points(
        &self,
        ctx: &CalculationContext,
        applied_value: f64,
    ) -> AppResult<Option<i64>> {
        let Some(program) = self
            .loyalty
            .program(&ctx.org_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
        else {
            return Ok(None);
        };
        let rate = to_decimal(program.point_rate);
        if rate <= Decimal::ZERO {
            return Ok(None);
        }
        let points = (to_decimal(applied_value) / rate).round().to_i64();
        Ok(points.filter(|p| *p > 0))
    }
}
