//! Configuration loaded from environment variables.

use crate::api::{DEFAULT_API_PATH, DEFAULT_HOSTNAME};
use crate::error::ConfigError;
use crate::helpers::{default_data_directory, parse_cookies};
use crate::polling::PollOptions;
use std::path::PathBuf;
use std::str::FromStr;
use chrono::Duration;

pub const COOKIES_VAR: &str = "STRREV_COOKIES";
pub const HOSTNAME_VAR: &str = "STRREV_HOSTNAME";
pub const API_PATH_VAR: &str = "STRREV_API_PATH";
pub const POLL_INTERVAL_VAR: &str = "STRREV_POLL_INTERVAL_SECS";
pub const POLL_IMMEDIATELY_VAR: &str = "STRREV_POLL_IMMEDIATELY";
pub const DATA_DIRECTORY_VAR: &str = "STRREV_DATA_DIRECTORY";

/// Settings for the notifier.
#[derive(Debug, Clone)]
pub struct Config {
    /// Session cookies in `name=value` form.
    pub cookies: Vec<String>,
    /// The site root.
    pub hostname: String,
    /// The path of the API relative to the hostname.
    pub api_path: String,
    /// Polling options.
    pub poll_options: PollOptions,
    /// The directory to cache icons in.
    pub data_directory: PathBuf,
}

impl Config {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration using `lookup` to read variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let cookies = lookup(COOKIES_VAR)
            .ok_or(ConfigError::Missing(COOKIES_VAR))?;
        let cookies = parse_cookies(&cookies)?;
        let mut poll_options = PollOptions::default();

        if let Some(seconds) = parse_var::<i64>(&lookup, POLL_INTERVAL_VAR)? {
            if seconds <= 0 {
                return Err(ConfigError::Invalid(POLL_INTERVAL_VAR, seconds.to_string()));
            }

            poll_options.poll_interval = Duration::try_seconds(seconds)
                .ok_or_else(|| ConfigError::Invalid(POLL_INTERVAL_VAR, seconds.to_string()))?;
        }

        if let Some(poll_immediately) = parse_var::<bool>(&lookup, POLL_IMMEDIATELY_VAR)? {
            poll_options.poll_immediately = poll_immediately;
        }

        Ok(Self {
            cookies,
            hostname: lookup(HOSTNAME_VAR).unwrap_or_else(|| DEFAULT_HOSTNAME.into()),
            api_path: lookup(API_PATH_VAR).unwrap_or_else(|| DEFAULT_API_PATH.into()),
            poll_options,
            data_directory: lookup(DATA_DIRECTORY_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(default_data_directory),
        })
    }

    /// The directory notification icons are cached in.
    pub fn icon_directory(&self) -> PathBuf {
        self.data_directory.join("icons")
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
{
    lookup(key)
        .map(|value| {
            value.trim()
                .parse::<T>()
                .map_err(|_| ConfigError::Invalid(key, value))
        })
        .transpose()
}
