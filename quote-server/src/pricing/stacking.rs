//! Discount Stacking Engine
//!
//! Merges the manual override, the promo-code candidate and the
//! secondary candidates into one applied set under the precedence
//! rules:
//!
//! 1. Primary slot: manual override beats promo code (an explicit
//!    human decision wins); otherwise the promo code, if valid.
//! 2. Secondary: loyalty and volume always combine; seasonal and
//!    auto-rule are mutually exclusive, seasonal wins.
//! 3. Percentages are computed against the original subtotal, so
//!    discounts stack additively, never compounding.
//! 4. The aggregate is clamped to [0, subtotal].

use rust_decimal::Decimal;
use shared::quote::{
    AppliedDiscount, AppliedDiscountSet, DiscountCandidate, DiscountSource, DiscountType,
    ManualDiscount, ReasonCode, TrailEntry,
};

use super::base::{to_decimal, to_f64};
use super::resolver::SourceResolution;

/// Stacking output: the applied set plus the full explanation trail
#[derive(Debug, Clone, Default)]
pub struct StackResult {
    pub set: AppliedDiscountSet,
    pub trail: Vec<TrailEntry>,
}

/// Absolute amount a candidate yields against the original subtotal,
/// with its own cap applied
fn candidate_amount(candidate: &DiscountCandidate, subtotal: Decimal) -> Decimal {
    let raw = match candidate.discount_type {
        DiscountType::Percentage => {
            subtotal * to_decimal(candidate.value) / Decimal::ONE_HUNDRED
        }
        DiscountType::FixedAmount => to_decimal(candidate.value),
    };
    let capped = match candidate.cap {
        Some(cap) => raw.min(to_decimal(cap)),
        None => raw,
    };
    capped.max(Decimal::ZERO)
}

/// Build the manual-override candidate (percentage takes precedence
/// when both forms are given)
fn manual_candidate(manual: &ManualDiscount) -> Option<DiscountCandidate> {
    if let Some(percent) = manual.percent {
        return Some(DiscountCandidate {
            source: DiscountSource::Manual,
            discount_type: DiscountType::Percentage,
            value: percent,
            cap: None,
            scope: Default::default(),
            reason: "manual override".to_string(),
        });
    }
    manual.amount.map(|amount| DiscountCandidate {
        source: DiscountSource::Manual,
        discount_type: DiscountType::FixedAmount,
        value: amount,
        cap: None,
        scope: Default::default(),
        reason: "manual override".to_string(),
    })
}

/// Merge all candidates into the applied set
///
/// `resolutions` come in the fixed source order the engine fans out
/// in; their trail entries are preserved ahead of the stacking
/// decisions so the trail reads chronologically.
pub fn stack_discounts(
    subtotal: Decimal,
    manual: Option<&ManualDiscount>,
    resolutions: Vec<(DiscountSource, SourceResolution)>,
) -> StackResult {
    let mut trail: Vec<TrailEntry> = Vec::new();
    let mut candidates: Vec<DiscountCandidate> = Vec::new();

    for (source, resolution) in resolutions {
        let had_trail = !resolution.trail.is_empty();
        trail.extend(resolution.trail);
        match resolution.candidate {
            Some(candidate) => candidates.push(candidate),
            // Every evaluated source leaves at least one entry
            None if !had_trail => {
                trail.push(TrailEntry::skipped(source, ReasonCode::NotApplicable));
            }
            None => {}
        }
    }

    let take = |candidates: &mut Vec<DiscountCandidate>, source: DiscountSource| {
        candidates
            .iter()
            .position(|c| c.source == source)
            .map(|i| candidates.remove(i))
    };

    let promo = take(&mut candidates, DiscountSource::PromoCode);
    let seasonal = take(&mut candidates, DiscountSource::Seasonal);
    let auto_rule = take(&mut candidates, DiscountSource::AutoRule);
    let loyalty = take(&mut candidates, DiscountSource::Loyalty);
    let volume = take(&mut candidates, DiscountSource::Volume);

    // Step 1: primary slot
    let manual = manual.filter(|m| !m.is_empty()).and_then(manual_candidate);
    let primary = match (manual, promo) {
        (Some(manual), Some(promo)) => {
            trail.push(TrailEntry::superseded(
                DiscountSource::PromoCode,
                ReasonCode::SupersededByManual,
                format!("code {} superseded by manual override", promo.reason),
            ));
            Some(manual)
        }
        (Some(manual), None) => Some(manual),
        (None, promo) => promo,
    };

    // Step 2: seasonal and auto-rule never both apply
    let (seasonal, auto_rule) = match (seasonal, auto_rule) {
        (Some(seasonal), Some(auto_rule)) => {
            trail.push(TrailEntry::superseded(
                DiscountSource::AutoRule,
                ReasonCode::Superseded,
                format!(
                    "rule {} superseded by campaign {}",
                    auto_rule.reason, seasonal.reason
                ),
            ));
            (Some(seasonal), None)
        }
        other => other,
    };

    // Steps 3-4: convert to amounts against the original subtotal,
    // cap each, sum, clamp
    let ordered = [primary, loyalty, seasonal, volume, auto_rule];
    let mut applied = Vec::new();
    let mut total = Decimal::ZERO;

    for candidate in ordered.into_iter().flatten() {
        if subtotal <= Decimal::ZERO
            && candidate.discount_type == DiscountType::FixedAmount
        {
            // A fixed discount cannot exceed the subtotal; on an empty
            // quote it simply does not apply
            trail.push(TrailEntry::skipped(
                candidate.source,
                ReasonCode::ZeroSubtotal,
            ));
            continue;
        }

        let amount = candidate_amount(&candidate, subtotal);
        trail.push(TrailEntry::applied(
            candidate.source,
            to_f64(amount),
            candidate.reason.clone(),
        ));
        total += amount;
        applied.push(AppliedDiscount {
            candidate,
            amount: to_f64(amount),
        });
    }

    let clamped = total.clamp(Decimal::ZERO, subtotal.max(Decimal::ZERO));
    let after = (subtotal - clamped).max(Decimal::ZERO);

    StackResult {
        set: AppliedDiscountSet {
            applied,
            discount_total: to_f64(clamped),
            after_discount: to_f64(after),
        },
        trail,
    }
}
