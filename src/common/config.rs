// src/common/config.rs
//! Runtime configuration for the registration form
//! Values come from the environment (optionally via `.env`) and can be
//! overridden on the command line

use std::env;
use tracing::info;

use crate::registration::validators::{ValidationRules, DEFAULT_AGE_MAX};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/submit";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("endpoint must be a URL starting with http:// or https://, got '{0}'")]
    InvalidEndpoint(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub endpoint: String,
    pub rules: ValidationRules,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            rules: ValidationRules::default(),
        }
    }
}

/// Command-line values that take precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
    pub age_max: Option<i64>,
    pub name_max_chars: Option<usize>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoint = lookup("REGISTRATION_ENDPOINT")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        validate_endpoint(&endpoint)?;

        let age_max = match lookup("REGISTRATION_AGE_MAX") {
            Some(raw) => parse_number::<i64>("REGISTRATION_AGE_MAX", &raw)?,
            None => DEFAULT_AGE_MAX,
        };

        let name_max_chars = match lookup("REGISTRATION_NAME_MAX_CHARS") {
            Some(raw) if !raw.trim().is_empty() => {
                Some(parse_number::<usize>("REGISTRATION_NAME_MAX_CHARS", &raw)?)
            }
            _ => None,
        };

        Ok(Self {
            endpoint,
            rules: ValidationRules {
                age_max,
                name_max_chars,
            },
        })
    }
}

fn parse_number<T: std::str::FromStr + PartialOrd + Default>(
    name: &'static str,
    raw: &str,
) -> Result<T, ConfigError> {
    match raw.trim().parse::<T>() {
        Ok(value) if value >= T::default() => Ok(value),
        _ => Err(ConfigError::InvalidNumber {
            name,
            value: raw.to_string(),
        }),
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(ConfigError::InvalidEndpoint(endpoint.to_string()));
    }
    Ok(())
}

/// Override configuration from CLI args
pub fn apply_cli_override(
    mut config: AppConfig,
    overrides: CliOverrides,
) -> Result<AppConfig, ConfigError> {
    if let Some(endpoint) = overrides.endpoint {
        validate_endpoint(&endpoint)?;
        info!(endpoint = %endpoint, "CLI override: endpoint");
        config.endpoint = endpoint;
    }

    if let Some(age_max) = overrides.age_max {
        if age_max < 0 {
            return Err(ConfigError::InvalidNumber {
                name: "--age-max",
                value: age_max.to_string(),
            });
        }
        info!(age_max, "CLI override: age bound");
        config.rules.age_max = age_max;
    }

    if let Some(max) = overrides.name_max_chars {
        info!(name_max_chars = max, "CLI override: name length bound");
        config.rules.name_max_chars = Some(max);
    }

    Ok(config)
}
