use std::env;

use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_REDIS_HOST: &str = "127.0.0.1";
pub const REDIS_PORT: u16 = 6379;

/// Lifetime of a cached weather entry.
pub const CACHE_TTL_SECONDS: u64 = 600;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: Url,
    pub redis_host: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error: config: {0}")]
    Missing(&'static str),
    #[error("Error: config: {0}")]
    Invalid(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("OPENWEATHER_API_KEY")
            .map_err(|_| ConfigError::Missing("OPENWEATHER_API_KEY not set"))?;

        let base_raw =
            env::var("OPENWEATHER_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let api_base = Url::parse(&base_raw)
            .map_err(|e| ConfigError::Invalid(format!("invalid base url '{}': {}", base_raw, e)))?;

        let redis_host =
            env::var("REDIS_HOST").unwrap_or_else(|_| DEFAULT_REDIS_HOST.to_string());

        Ok(Self {
            api_key,
            api_base,
            redis_host,
        })
    }

    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/", self.redis_host, REDIS_PORT)
    }
}
