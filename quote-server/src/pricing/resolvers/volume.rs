//! Volume Tier Resolver
//!
//! Maps the subtotal into the organization's ascending threshold
//! table; the highest threshold not exceeding the subtotal wins.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::quote::{
    CalculationContext, DiscountCandidate, DiscountSource, ReasonCode, TrailEntry,
};

use crate::pricing::base::to_f64;
use crate::pricing::resolver::{DiscountResolver, SourceResolution};
use crate::registry::VolumeTierProvider;

pub struct VolumeResolver {
    provider: Arc<dyn VolumeTierProvider>,
}

impl VolumeResolver {
    pub fn new(provider: Arc<dyn VolumeTierProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DiscountResolver for VolumeResolver {
    fn source(&self) -> DiscountSource {
        DiscountSource::Volume
    }

    async fn resolve(
        &self,
        ctx: &CalculationContext,
        subtotal: Decimal,
    ) -> anyhow::Result<SourceResolution> {
        let Some(table) = self.provider.table(&ctx.org_id).await? else {
            return Ok(SourceResolution::none());
        };

        let Some(tier) = table.tier_for(to_f64(subtotal)) else {
            return Ok(SourceResolution::rejected(TrailEntry::skipped(
                DiscountSource::Volume,
                ReasonCode::BelowThreshold,
            )));
        };

        let label = tier
            .label
            .clone()
            .unwrap_or_else(|| format!("volume tier {:.0}+", tier.threshold));

        Ok(SourceResolution::candidate(DiscountCandidate {
            source: DiscountSource::Volume,
            discount_type: tier.discount_type,
            value: tier.value,
            cap: None,
            scope: Default::default(),
            reason: label,
        }))
    }
}
