//! Shared types for the quote pricing framework
//!
//! Common types used across multiple crates: domain entities for the
//! discount registries (promo codes, loyalty, campaigns, volume tiers,
//! auto rules, roles, approvals) and the calculation value types
//! (context, candidates, results) exchanged with the pricing engine.

pub mod models;
pub mod quote;
pub mod types;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Calculation re-exports (for convenient access)
pub use quote::{CalculationContext, CalculationResult, DiscountCandidate, TrailEntry};
