//! The five discount source resolvers

mod auto_rule;
mod loyalty;
mod promo_code;
mod seasonal;
mod volume;

pub use auto_rule::AutoRuleResolver;
pub use loyalty::LoyaltyResolver;
pub use promo_code::{CodeCheck, PromoCodeResolver, check_code, preview_amount};
pub use seasonal::SeasonalResolver;
pub use volume::VolumeResolver;
