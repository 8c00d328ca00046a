//! Quote Server - pricing and discount calculation service
//!
//! # Architecture
//!
//! - **Pricing** (`pricing`): base pricing, discount resolvers,
//!   stacking engine, result assembly
//! - **Approvals** (`approval`): discount approval state machine
//! - **Registries** (`registry`): promo codes, loyalty, campaigns,
//!   volume tiers, auto rules, approval policies
//! - **HTTP API** (`api`): RESTful interface
//!
//! # Module layout
//!
//! ```text
//! quote-server/src/
//! ├── core/        # configuration, state, server
//! ├── pricing/     # calculation pipeline
//! ├── approval/    # approval gate
//! ├── registry/    # discount source stores
//! ├── api/         # HTTP routes and handlers
//! └── utils/       # errors, logging
//! ```

pub mod api;
pub mod approval;
pub mod core;
pub mod pricing;
pub mod registry;
pub mod utils;

// Re-export common types
pub use approval::ApprovalService;
pub use core::{Config, Server, ServerState};
pub use pricing::PricingEngine;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_level};

/// Load .env and initialize logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logger();
    Ok(())
}
