//! Registry layer
//!
//! Trait contracts for the external configuration sources the engine
//! reads (promo codes, loyalty, campaigns, volume tiers, auto rules,
//! approval policies), with in-memory implementations. Persistence is
//! an external collaborator; the engine only knows these seams.

pub mod auto_rules;
pub mod campaigns;
pub mod loyalty;
pub mod policies;
pub mod promo_codes;
pub mod volume_tiers;

pub use auto_rules::{AutoRuleProvider, InMemoryAutoRules};
pub use campaigns::{CampaignCalendar, InMemoryCampaigns};
pub use loyalty::{InMemoryLoyalty, LoyaltyLedger};
pub use policies::{InMemoryPolicies, PolicyProvider};
pub use promo_codes::{InMemoryPromoCodes, PromoCodeRegistry};
pub use volume_tiers::{InMemoryVolumeTiers, VolumeTierProvider};
