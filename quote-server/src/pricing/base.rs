//! Base Pricing Calculator
//!
//! Raw line-item and subtotal amounts from service quantities, unit
//! rates, the quality tier multiplier and the surface condition
//! multiplier. Knows nothing about discounts.
//!
//! Uses rust_decimal for precision calculations, stores as f64.

use rust_decimal::prelude::*;
use shared::quote::{QualityTier, ServiceRequest, SurfaceCondition};

/// Rounding for monetary values (2 decimal places, banker's)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded half-to-even to
/// avoid systematic bias over many proposals
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven)
        .to_f64()
        .unwrap_or_default()
}

/// One priced line of the quote
#[derive(Debug, Clone, PartialEq)]
pub struct LineTotal {
    pub service_id: String,
    pub quantity: f64,
    pub unit_rate: f64,
    /// quantity × rate × tier multiplier
    pub line_total: f64,
}

/// Base quote before any discount
#[derive(Debug, Clone, Default)]
pub struct BaseQuote {
    pub lines: Vec<LineTotal>,
    /// Sum of line totals
    pub subtotal: f64,
    /// Subtotal × condition multiplier; the basis for every discount
    pub condition_adjusted: f64,
}

impl BaseQuote {
    /// Condition-adjusted subtotal as Decimal for downstream math
    pub fn adjusted_decimal(&self) -> Decimal {
        to_decimal(self.condition_adjusted)
    }
}

/// Compute the base quote for a list of requested services
///
/// Quantities and rates are assumed validated by the caller; negative
/// inputs are clamped to zero.
pub fn calculate_base(
    services: &[ServiceRequest],
    tier: QualityTier,
    condition: SurfaceCondition,
) -> BaseQuote {
    let tier_multiplier = tier.multiplier();

    let mut subtotal = Decimal::ZERO;
    let mut lines = Vec::with_capacity(services.len());

    for service in services {
        let quantity = to_decimal(service.quantity).max(Decimal::ZERO);
        let rate = to_decimal(service.unit_rate).max(Decimal::ZERO);
        let line_total = quantity * rate * tier_multiplier;
        subtotal += line_total;

        lines.push(LineTotal {
            service_id: service.service_id.clone(),
            quantity: to_f64(quantity),
            unit_rate: to_f64(rate),
            line_total: to_f64(line_total),
        });
    }

    let condition_adjusted = subtotal * condition.multiplier();

    BaseQuote {
        lines,
        subtotal: to_f64(subtotal),
        condition_adjusted: to_f64(condition_adjusted),
    }
}
