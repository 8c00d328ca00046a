//! API routing
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`calculate`] - calculation and finalization
//! - [`promo_codes`] - promo code admin and validation
//! - [`approvals`] - discount approval requests

pub mod approvals;
pub mod calculate;
pub mod health;
pub mod promo_codes;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(calculate::router())
        .merge(promo_codes::router())
        .merge(approvals::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
