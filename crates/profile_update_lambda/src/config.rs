use std::time::Duration;

use profile_update_core::contract::{PUT_RECORD_ENDPOINT, USERS_TABLE_NAME};
use thiserror::Error;

pub const USERS_TABLE_NAME_VAR: &str = "USERS_TABLE_NAME";
pub const RECORD_SERVICE_URL_VAR: &str = "RECORD_SERVICE_URL";
pub const RECORD_SERVICE_TIMEOUT_MS_VAR: &str = "RECORD_SERVICE_TIMEOUT_MS";
pub const RECORD_SERVICE_VALIDATE_VAR: &str = "RECORD_SERVICE_VALIDATE";

pub const DEFAULT_RECORD_SERVICE_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for {variable}: {message}")]
pub struct ConfigError {
    pub variable: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub users_table: String,
    pub record_service_url: String,
    pub record_service_timeout: Duration,
    pub validate_records: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            users_table: USERS_TABLE_NAME.to_string(),
            record_service_url: PUT_RECORD_ENDPOINT.to_string(),
            record_service_timeout: Duration::from_millis(DEFAULT_RECORD_SERVICE_TIMEOUT_MS),
            validate_records: false,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves every setting through `lookup`; blank values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let record_service_timeout = match read(RECORD_SERVICE_TIMEOUT_MS_VAR) {
            Some(raw) => {
                let millis = raw.parse::<u64>().map_err(|error| ConfigError {
                    variable: RECORD_SERVICE_TIMEOUT_MS_VAR,
                    message: error.to_string(),
                })?;
                if millis == 0 {
                    return Err(ConfigError {
                        variable: RECORD_SERVICE_TIMEOUT_MS_VAR,
                        message: "must be a positive integer".to_string(),
                    });
                }
                Duration::from_millis(millis)
            }
            None => defaults.record_service_timeout,
        };

        let validate_records = match read(RECORD_SERVICE_VALIDATE_VAR) {
            Some(raw) => parse_flag(&raw).ok_or_else(|| ConfigError {
                variable: RECORD_SERVICE_VALIDATE_VAR,
                message: format!("expected true/false, got '{raw}'"),
            })?,
            None => defaults.validate_records,
        };

        Ok(Self {
            users_table: read(USERS_TABLE_NAME_VAR).unwrap_or(defaults.users_table),
            record_service_url: read(RECORD_SERVICE_URL_VAR)
                .unwrap_or(defaults.record_service_url),
            record_service_timeout,
            validate_records,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
