use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Catalog document to serve instead of the bundled dataset.
    pub catalog_path: Option<PathBuf>,
    pub google_maps_api_key: Option<String>,
    pub places_base_url: String,
    pub places_timeout_secs: u64,
    pub places_max_retries: u32,
    pub places_retry_backoff_ms: u64,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
}

impl AppConfig {
    #[must_use]
    pub fn places_timeout(&self) -> Duration {
        Duration::from_secs(self.places_timeout_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("catalog_path", &self.catalog_path)
            .field(
                "google_maps_api_key",
                &self.google_maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("places_timeout_secs", &self.places_timeout_secs)
            .field("places_max_retries", &self.places_max_retries)
            .field("places_retry_backoff_ms", &self.places_retry_backoff_ms)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .finish()
    }
}
