use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

pub const DEFAULT_FEED_BASE_URL: &str = "https://news.google.com/rss/search";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub feed_base_url: String,
    pub fetch_timeout: Duration,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let feed_base_url = lookup("FEED_BASE_URL").unwrap_or_else(|| DEFAULT_FEED_BASE_URL.to_string());
        if feed_base_url.trim().is_empty() {
            return Err(AppError::ConfigError("FEED_BASE_URL must not be empty".to_string()));
        }

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            feed_base_url,
            fetch_timeout: seconds(&lookup, "FETCH_TIMEOUT_SECS", 10)?,
            cache_ttl: seconds(&lookup, "CACHE_TTL_SECS", 1800)?,
            request_timeout: seconds(&lookup, "REQUEST_TIMEOUT_SECS", 90)?,
        })
    }
}

fn seconds<F>(lookup: &F, key: &str, default: u64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", key, e))),
        None => Ok(Duration::from_secs(default)),
    }
}
