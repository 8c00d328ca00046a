//! Discount Source Resolver trait
//!
//! Each discount source (promo code, loyalty, seasonal, volume, auto
//! rule) implements this capability: inspect the context, read its own
//! registry, and yield at most one candidate plus trail entries for
//! everything it evaluated. Resolvers never mutate shared state.

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::quote::{CalculationContext, DiscountCandidate, DiscountSource, TrailEntry};

/// What one resolver produced
#[derive(Debug, Clone, Default)]
pub struct SourceResolution {
    /// The proposed discount, if the source applies
    pub candidate: Option<DiscountCandidate>,
    /// Rejection/superseded entries this resolver already knows about
    /// (e.g. an expired code, a losing seasonal campaign)
    pub trail: Vec<TrailEntry>,
}

impl SourceResolution {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn candidate(candidate: DiscountCandidate) -> Self {
        Self {
            candidate: Some(candidate),
            trail: Vec::new(),
        }
    }

    pub fn rejected(entry: TrailEntry) -> Self {
        Self {
            candidate: None,
            trail: vec![entry],
        }
    }
}

/// A single discount source
#[async_trait]
pub trait DiscountResolver: Send + Sync {
    fn source(&self) -> DiscountSource;

    /// Evaluate this source against the context and the pre-discount
    /// subtotal. Read-only; errors are converted to `resolver-error`
    /// trail entries by the engine, never aborting the calculation.
    async fn resolve(
        &self,
        ctx: &CalculationContext,
        subtotal: Decimal,
    ) -> anyhow::Result<SourceResolution>;
}
