//! Typed configuration from environment variables.
//!
//! Loads once at startup. Everything has a default except the access token,
//! which may also come from the command line. Sensitive values are wrapped
//! in secrecy::SecretString to prevent log leaks.

pub mod secrets;

use crate::error::{Error, Result};
use secrecy::SecretString;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://lcu.eduplus.net";

#[derive(Debug)]
pub struct Config {
    pub base_url: String,
    pub request_timeout: Duration,
    pub access_token: Option<SecretString>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        let request_timeout = match std::env::var("HWPILOT_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => Duration::from_secs(30),
        };

        Ok(Self {
            base_url: std::env::var("HWPILOT_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            request_timeout,
            access_token: std::env::var("HWPILOT_ACCESS_TOKEN")
                .ok()
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(Error::Config(format!(
            "HWPILOT_TIMEOUT_SECS must be a positive number of seconds, got {raw:?}"
        ))),
    }
}
