//! Discount approval gate

mod service;

pub use service::ApprovalService;
