/// Server configuration
///
/// # Environment variables
///
/// Every item can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HTTP_PORT | 3000 | HTTP API port |
/// | PAPER_WIDTH | 48 | Paper width in characters (58mm: 32, 80mm: 48) |
/// | BRAND_HEADER | TALLY | Brand line printed at the top of every receipt |
/// | DISCOVERY_BASE_IP | 192.168.1 | Subnet prefix scanned when the client does not supply one |
/// | LOG_DIR | (unset) | When set, logs also go to daily files in this directory |
/// | ENVIRONMENT | development | development \| staging \| production |
///
/// # Example
///
/// ```ignore
/// HTTP_PORT=8080 BRAND_HEADER="CORNER CAFE" cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// Paper width in characters
    pub paper_width: usize,
    /// Brand line printed at the top of every receipt
    pub brand_header: String,
    /// Subnet prefix used when a discovery request carries no baseIP
    pub discovery_base_ip: String,
    /// Optional directory for rolling log files
    pub log_dir: Option<String>,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            paper_width: std::env::var("PAPER_WIDTH")
                .ok()
                .and_then(|w| w.parse().ok())
                .unwrap_or(48),
            brand_header: std::env::var("BRAND_HEADER").unwrap_or_else(|_| "TALLY".into()),
            discovery_base_ip: std::env::var("DISCOVERY_BASE_IP")
                .unwrap_or_else(|_| "192.168.1".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Whether this is a production deployment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
