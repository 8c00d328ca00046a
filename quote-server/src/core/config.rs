/// Server configuration
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HTTP_PORT | 3000 | HTTP API port |
/// | TAX_RATE | 0.08 | Flat tax rate applied after discounts |
/// | RESOLVER_TIMEOUT_MS | 500 | Per-source discount resolver timeout |
/// | ENVIRONMENT | development | Runtime environment |
///
/// # Example
///
/// ```ignore
/// HTTP_PORT=8080 TAX_RATE=0.095 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// Flat tax rate, applied to the post-discount subtotal
    pub tax_rate: f64,
    /// Per-resolver timeout in milliseconds
    pub resolver_timeout_ms: u64,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults where unset
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            tax_rate: std::env::var("TAX_RATE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(0.08),
            resolver_timeout_ms: std::env::var("RESOLVER_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(500),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override select settings, mostly for tests
    pub fn with_overrides(http_port: u16, tax_rate: f64) -> Self {
        let mut config = Self::from_env();
        config.http_port = http_port;
        config.tax_rate = tax_rate;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
