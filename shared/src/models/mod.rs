//! Domain models shared between the engine server and clients

pub mod approval;
pub mod auto_rule;
pub mod campaign;
pub mod loyalty;
pub mod promo_code;
pub mod role;
pub mod volume_tier;

pub use approval::{ApprovalDecision, ApprovalPolicy, ApprovalRequest, ApprovalStatus};
pub use auto_rule::{AutoRule, RuleCondition};
pub use campaign::{SeasonalCampaign, SeasonalCampaignCreate};
pub use loyalty::{LoyaltyAccount, LoyaltyProgram};
pub use promo_code::{PromoCode, PromoCodeCreate};
pub use role::{RoleLimit, UserRole};
pub use volume_tier::{VolumeTier, VolumeTierTable};
