use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::constants::BSKY_API_BASE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Upstream API
    pub api_base: String,
    pub http_timeout: Duration,

    // Report limits
    pub default_post_limit: usize,
    pub max_post_limit: usize,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Upstream API
            api_base: env_or_default("BSKY_API_BASE", BSKY_API_BASE),
            http_timeout: Duration::from_secs(parse_env_u64("HTTP_TIMEOUT_SECS", 10)?),

            // Report limits
            default_post_limit: parse_env_usize("DEFAULT_POST_LIMIT", 50)?,
            max_post_limit: parse_env_usize("MAX_POST_LIMIT", 1000)?,

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 5000)?,
        })
    }

    /// Configuration with fixed defaults and a short timeout, independent of the environment.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_base: BSKY_API_BASE.to_string(),
            http_timeout: Duration::from_secs(5),
            default_post_limit: 50,
            max_post_limit: 1000,
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "HTTP_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.max_post_limit == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_POST_LIMIT".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.default_post_limit == 0 || self.default_post_limit > self.max_post_limit {
            return Err(ConfigError::InvalidValue {
                name: "DEFAULT_POST_LIMIT".to_string(),
                message: format!("must be between 1 and {}", self.max_post_limit),
            });
        }
        match Url::parse(&self.api_base) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::InvalidValue {
                    name: "BSKY_API_BASE".to_string(),
                    message: format!("unsupported scheme '{}'", url.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::InvalidValue {
                    name: "BSKY_API_BASE".to_string(),
                    message: e.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Clamp a caller-supplied row limit into `1..=max_post_limit`.
    #[must_use]
    pub fn clamp_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_post_limit)
            .clamp(1, self.max_post_limit)
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
