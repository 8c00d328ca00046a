//! Seasonal Campaign Resolver
//!
//! Picks the highest-value active campaign; simultaneously active
//! losers are recorded as superseded in the trail.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::SeasonalCampaign;
use shared::quote::{
    CalculationContext, DiscountCandidate, DiscountSource, DiscountType, ReasonCode, TrailEntry,
};

use crate::pricing::base::to_decimal;
use crate::pricing::resolver::{DiscountResolver, SourceResolution};
use crate::registry::CampaignCalendar;

pub struct SeasonalResolver {
    calendar: Arc<dyn CampaignCalendar>,
}

impl SeasonalResolver {
    pub fn new(calendar: Arc<dyn CampaignCalendar>) -> Self {
        Self { calendar }
    }
}

/// Absolute value of a campaign against the subtotal, for comparison
fn campaign_amount(campaign: &SeasonalCampaign, subtotal: Decimal) -> Decimal {
    let raw = match campaign.discount_type {
        DiscountType::Percentage => {
            subtotal * to_decimal(campaign.value) / Decimal::ONE_HUNDRED
        }
        DiscountType::FixedAmount => to_decimal(campaign.value),
    };
    match campaign.max_discount_amount {
        Some(cap) => raw.min(to_decimal(cap)),
        None => raw,
    }
}

#[async_trait]
impl DiscountResolver for SeasonalResolver {
    fn source(&self) -> DiscountSource {
        DiscountSource::Seasonal
    }

    async fn resolve(
        &self,
        ctx: &CalculationContext,
        subtotal: Decimal,
    ) -> anyhow::Result<SourceResolution> {
        let now = shared::types::now_millis();
        let mut active = self.calendar.active_campaigns(&ctx.org_id, now).await?;

        if active.is_empty() {
            return Ok(SourceResolution::rejected(TrailEntry::skipped(
                DiscountSource::Seasonal,
                ReasonCode::NoActiveCampaign,
            )));
        }

        // Highest-value campaign wins; ties broken by earlier start
        active.sort_by(|a, b| {
            campaign_amount(b, subtotal)
                .cmp(&campaign_amount(a, subtotal))
                .then(a.starts_at.cmp(&b.starts_at))
        });
        let winner = active.remove(0);

        let trail = active
            .iter()
            .map(|losing| {
                TrailEntry::superseded(
                    DiscountSource::Seasonal,
                    ReasonCode::Superseded,
                    format!("campaign {} superseded by {}", losing.name, winner.name),
                )
            })
            .collect();

        Ok(SourceResolution {
            candidate: Some(DiscountCandidate {
                source: DiscountSource::Seasonal,
                discount_type: winner.discount_type,
                value: winner.value,
                cap: winner.max_discount_amount,
                scope: Default::default(),
                reason: winner.name.clone(),
            }),
            trail,
        })
    }
}
