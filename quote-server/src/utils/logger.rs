//! Logging Infrastructure
//!
//! Structured logging setup for both development and production.

use tracing_subscriber::EnvFilter;

/// Initialize the logger
///
/// Respects `RUST_LOG`; defaults to `info` for our crates.
pub fn init_logger() {
    init_logger_with_level(None);
}

/// Initialize the logger with an explicit default level
pub fn init_logger_with_level(default_level: Option<&str>) {
    let level = default_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("quote_server={level},shared={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .init();
}
