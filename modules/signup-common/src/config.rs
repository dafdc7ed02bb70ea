use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Activities API
    pub api_base_url: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Page behaviour
    pub message_ttl: Duration,
    pub page_idle: Duration,
}

impl Config {
    /// Load configuration from the environment (and `.env` when present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            api_base_url: env::var("ACTIVITIES_API_URL")
                .context("ACTIVITIES_API_URL environment variable is required")?,
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: parsed_env("WEB_PORT", 3000)?,
            message_ttl: Duration::from_secs(parsed_env("MESSAGE_TTL_SECS", 5)?),
            page_idle: Duration::from_secs(parsed_env("PAGE_IDLE_SECS", 1800)?),
        };

        config.log_summary();
        Ok(config)
    }

    /// Defaults for everything except the API location.
    pub fn for_api(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            web_host: "0.0.0.0".to_string(),
            web_port: 3000,
            message_ttl: Duration::from_secs(5),
            page_idle: Duration::from_secs(1800),
        }
    }

    fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  ACTIVITIES_API_URL: {}", self.api_base_url);
        tracing::info!("  WEB: {}:{}", self.web_host, self.web_port);
        tracing::info!("  MESSAGE_TTL_SECS: {}", self.message_ttl.as_secs());
        tracing::info!("  PAGE_IDLE_SECS: {}", self.page_idle.as_secs());
    }
}

fn parsed_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number, got {raw:?}")),
        Err(_) => Ok(default),
    }
}
