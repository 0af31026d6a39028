//! Service configuration

use anyhow::Result;
use coach_engine::gateway::RateLimiterConfig;
use serde::Deserialize;
use std::time::Duration;

/// Service configuration, read from COACH_* environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// HTTP port for the API server
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Provider API key; remote analysis is disabled without it
    #[serde(default)]
    pub provider_api_key: Option<String>,

    /// Overrides the provider's regional hosts (used in testing)
    #[serde(default)]
    pub provider_base_url: Option<String>,

    /// Short-window rate limit (requests per window)
    #[serde(default = "default_short_limit")]
    pub rate_limit_short: u32,

    /// Short rate limit window in seconds
    #[serde(default = "default_short_window")]
    pub rate_limit_short_window_secs: u64,

    /// Long-window rate limit (requests per window)
    #[serde(default = "default_long_limit")]
    pub rate_limit_long: u32,

    /// Long rate limit window in seconds
    #[serde(default = "default_long_window")]
    pub rate_limit_long_window_secs: u64,
}

fn default_api_port() -> u16 {
    8080
}

fn default_short_limit() -> u32 {
    20
}

fn default_short_window() -> u64 {
    1
}

fn default_long_limit() -> u32 {
    100
}

fn default_long_window() -> u64 {
    120
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            provider_api_key: None,
            provider_base_url: None,
            rate_limit_short: default_short_limit(),
            rate_limit_short_window_secs: default_short_window(),
            rate_limit_long: default_long_limit(),
            rate_limit_long_window_secs: default_long_window(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("COACH"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }

    pub fn limiter_config(&self) -> RateLimiterConfig {
        RateLimiterConfig {
            short_limit: self.rate_limit_short,
            short_window: Duration::from_secs(self.rate_limit_short_window_secs),
            long_limit: self.rate_limit_long,
            long_window: Duration::from_secs(self.rate_limit_long_window_secs),
        }
    }
}
