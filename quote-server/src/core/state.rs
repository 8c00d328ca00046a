use std::sync::Arc;
use std::time::Duration;

use crate::approval::ApprovalService;
use crate::core::Config;
use crate::pricing::resolvers::{
    AutoRuleResolver, LoyaltyResolver, PromoCodeResolver, SeasonalResolver, VolumeResolver,
};
use crate::pricing::{DiscountResolver, PricingEngine};
use crate::registry::{
    InMemoryAutoRules, InMemoryCampaigns, InMemoryLoyalty, InMemoryPolicies, InMemoryPromoCodes,
    InMemoryVolumeTiers,
};

/// Server state - shared references to every service
///
/// Cloning is shallow; every handler gets the same engine, registries
/// and approval store through `Arc`.
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | Immutable configuration |
/// | engine | Pricing engine (calculation + finalization) |
/// | approvals | Approval request state machine |
/// | promo_codes | Promo code store (admin API writes here) |
/// | loyalty | Loyalty programs and point balances |
/// | campaigns | Seasonal campaign calendar |
/// | volume_tiers | Volume discount tier tables |
/// | auto_rules | Automatic discount rules |
/// | policies | Per-organization approval policies |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub engine: Arc<PricingEngine>,
    pub approvals: Arc<ApprovalService>,
    pub promo_codes: Arc<InMemoryPromoCodes>,
    pub loyalty: Arc<InMemoryLoyalty>,
    pub campaigns: Arc<InMemoryCampaigns>,
    pub volume_tiers: Arc<InMemoryVolumeTiers>,
    pub auto_rules: Arc<InMemoryAutoRules>,
    pub policies: Arc<InMemoryPolicies>,
}

impl ServerState {
    /// Wire up the registries, resolvers, approval service and engine
    pub fn initialize(config: &Config) -> Self {
        let promo_codes = Arc::new(InMemoryPromoCodes::new());
        let loyalty = Arc::new(InMemoryLoyalty::new());
        let campaigns = Arc::new(InMemoryCampaigns::new());
        let volume_tiers = Arc::new(InMemoryVolumeTiers::new());
        let auto_rules = Arc::new(InMemoryAutoRules::new());
        let policies = Arc::new(InMemoryPolicies::new());

        let approvals = Arc::new(ApprovalService::new(policies.clone()));

        let resolvers: Vec<Arc<dyn DiscountResolver>> = vec![
            Arc::new(PromoCodeResolver::new(promo_codes.clone())),
            Arc::new(LoyaltyResolver::new(loyalty.clone())),
            Arc::new(SeasonalResolver::new(campaigns.clone())),
            Arc::new(VolumeResolver::new(volume_tiers.clone())),
            Arc::new(AutoRuleResolver::new(auto_rules.clone())),
        ];

        let engine = Arc::new(PricingEngine::new(
            resolvers,
            promo_codes.clone(),
            loyalty.clone(),
            approvals.clone(),
            config.tax_rate,
            Duration::from_millis(config.resolver_timeout_ms),
        ));

        Self {
            config: config.clone(),
            engine,
            approvals,
            promo_codes,
            loyalty,
            campaigns,
            volume_tiers,
            auto_rules,
            policies,
        }
    }
}
