use std::time::Duration;

/// Environment variable holding the rentals API base address
pub const API_BASE_URL_ENV: &str = "RENTALS_API_URL";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Runtime settings for the rentals client
///
/// Only the API base address comes from the environment; the rest are fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    /// Items requested per page
    pub page_size: u32,
    pub health_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: 12,
            health_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(API_BASE_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                config.api_base_url = url.to_string();
            }
        }
        config
    }
}
