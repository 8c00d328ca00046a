//! Pricing & discount calculation
//!
//! Pipeline: base pricing, per-source discount resolution, stacking,
//! the approval threshold check, then result assembly. The engine in
//! [`engine`] orchestrates the stages.

pub mod assembler;
pub mod base;
pub mod engine;
pub mod resolver;
pub mod resolvers;
pub mod stacking;

pub use engine::PricingEngine;
pub use resolver::{DiscountResolver, SourceResolution};
