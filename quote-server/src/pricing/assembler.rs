//! Result Assembler - tax on the post-discount subtotal, final
//! rounding, and the assembled `CalculationResult`.

use rust_decimal::Decimal;
use shared::quote::{ApprovalRequirement, CalculationResult, TrailEntry};

use super::base::{to_decimal, to_f64};
use super::stacking::StackResult;

/// Assemble the externally visible result from the stacked discounts
///
/// Tax applies to the subtotal after discounts. All monetary fields
/// round half-to-even at two decimal places on the way out.
pub fn assemble(
    subtotal: Decimal,
    stacked: StackResult,
    tax_rate: f64,
    approval_required: Option<ApprovalRequirement>,
    mut extra_trail: Vec<TrailEntry>,
) -> CalculationResult {
    let after_discount = to_decimal(stacked.set.after_discount);
    let tax_amount = after_discount * to_decimal(tax_rate);
    let total = after_discount + tax_amount;

    let mut trail = stacked.trail;
    trail.append(&mut extra_trail);

    CalculationResult {
        subtotal: to_f64(subtotal),
        discounts: stacked.set,
        tax_rate,
        tax_amount: to_f64(tax_amount),
        total: to_f64(total),
        provisional: approval_required.is_some(),
        approval_required,
        trail,
    }
}
