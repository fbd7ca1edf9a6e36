//! Client configuration parsed from environment variables.
//!
//! Every value has a default so a bare `authgate` invocation talks to a
//! backend on `localhost:8080` and keeps its session file under the
//! working directory.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TOKEN_FILE: &str = ".authgate/session.json";

pub const ENV_BASE_URL: &str = "AUTHGATE_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "AUTHGATE_REQUEST_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "AUTHGATE_CONNECT_TIMEOUT_SECS";
pub const ENV_TOKEN_FILE: &str = "AUTHGATE_TOKEN_FILE";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base URL '{0}' (expected http:// or https://)")]
    InvalidBaseUrl(String),
    #[error("invalid {var}: '{value}' is not a whole number of seconds")]
    InvalidTimeout { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin without a trailing slash.
    pub base_url: String,
    pub timeouts: Timeouts,
    /// Where the file-backed session store keeps the token.
    pub token_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeouts: Timeouts::default(),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `AUTHGATE_BASE_URL`: default `http://localhost:8080`
    /// - `AUTHGATE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `AUTHGATE_CONNECT_TIMEOUT_SECS`: default 10
    /// - `AUTHGATE_TOKEN_FILE`: default `.authgate/session.json`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not http(s) or a timeout is not
    /// a whole number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but reads values through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(&lookup(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()))?;
        let timeouts = Timeouts {
            request_secs: parse_secs(&lookup, ENV_REQUEST_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_secs(&lookup, ENV_CONNECT_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let token_file = lookup(ENV_TOKEN_FILE)
            .filter(|raw| !raw.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE), PathBuf::from);

        Ok(Self { base_url, timeouts, token_file })
    }
}

/// Trim whitespace and trailing slashes; reject anything that is not http(s).
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBaseUrl`] for non-http(s) or empty origins.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"));
    match host {
        Some(rest) if !rest.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::InvalidBaseUrl(raw.to_owned())),
    }
}

fn parse_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout { var, value }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
