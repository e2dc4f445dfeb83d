//! Runtime configuration for boedl

use std::time::Duration;

use crate::errors::DownloadError;

pub const DEFAULT_BASE_URL: &str = "https://boe.es";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Site root that summary and document links are resolved against
    pub base_url: String,
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Delay between document downloads (milliseconds)
    pub download_delay_ms: u64,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: concat!("boedl/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            http: HttpConfig::default(),
            download_delay_ms: 0,
        }
    }
}

impl Config {
    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Get download delay as Duration
    pub fn download_delay(&self) -> Duration {
        Duration::from_millis(self.download_delay_ms)
    }

    /// Resolve a site-relative link against the base URL
    pub fn resolve(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            return link.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        if link.starts_with('/') {
            format!("{}{}", base, link)
        } else {
            format!("{}/{}", base, link)
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DownloadError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(DownloadError::Config(format!(
                "base URL must be http or https: {}",
                self.base_url
            )));
        }
        if self.http.timeout_seconds == 0 {
            return Err(DownloadError::Config(
                "HTTP timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}
