//! Calculation value types exchanged with the pricing engine

mod candidate;
mod context;
mod result;

pub use candidate::{
    DiscountCandidate, DiscountScope, DiscountSource, DiscountType, ReasonCode, TrailEntry,
    TrailStatus,
};
pub use context::{
    CalculationContext, ManualDiscount, QualityTier, ServiceRequest, SurfaceCondition,
};
pub use result::{
    AppliedDiscount, AppliedDiscountSet, ApprovalRequirement, CalculationResult,
    ValidateCodeResult,
};
