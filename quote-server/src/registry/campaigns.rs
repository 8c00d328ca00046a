//! Seasonal Campaign Calendar

use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::SeasonalCampaign;

#[async_trait]
pub trait CampaignCalendar: Send + Sync {
    /// Campaigns whose window contains `now` (Unix millis)
    async fn active_campaigns(
        &self,
        org_id: &str,
        now: i64,
    ) -> anyhow::Result<Vec<SeasonalCampaign>>;
}

/// In-memory campaign store
#[derive(Debug, Default)]
pub struct InMemoryCampaigns {
    campaigns: DashMap<String, Vec<SeasonalCampaign>>,
}

impl InMemoryCampaigns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, campaign: SeasonalCampaign) {
        self.campaigns
            .entry(campaign.org_id.clone())
            .or_default()
            .push(campaign);
    }

    pub fn list(&self, org_id: &str) -> Vec<SeasonalCampaign> {
        self.campaigns
            .get(org_id)
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CampaignCalendar for InMemoryCampaigns {
    async fn active_campaigns(
        &self,
        org_id: &str,
        now: i64,
    ) -> anyhow::Result<Vec<SeasonalCampaign>> {
        Ok(self
            .campaigns
            .get(org_id)
            .map(|list| {
                list.iter()
                    .filter(|c| c.is_active_at(now))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
