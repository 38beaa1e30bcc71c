//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Names an optional TOML file used as the base configuration.
pub const CONFIG_PATH_VAR: &str = "RELAY_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the startup configuration.
///
/// Reads `.env` when present, starts from the file named by `RELAY_CONFIG`
/// (or defaults), then layers environment overrides on top.
pub fn load_from_env() -> Result<RelayConfig, ConfigError> {
    // A missing .env file is the normal production case.
    let _ = dotenv::dotenv();

    let base = match std::env::var(CONFIG_PATH_VAR) {
        Ok(path) => read_file(Path::new(&path))?,
        Err(_) => RelayConfig::default(),
    };

    let config = apply_env_overrides(base, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn read_file(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides using `lookup` to resolve variables.
///
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(mut config: RelayConfig, lookup: F) -> Result<RelayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

    if let Some(port) = get("PORT") {
        config.listener.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::Env { var: "PORT", value: port.clone() })?;
    }

    if let Some(origins) = get("RELAY_ALLOWED_ORIGINS") {
        config.cors.allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
    }

    let providers = &mut config.providers;
    if let Some(key) = get("SERPAPI_API_KEY") {
        providers.serpapi.api_key = key;
    }
    if let Some(key) = get("GOOGLE_MAPS_API_KEY") {
        providers.google_maps.api_key = key;
    }
    if let Some(key) = get("OPENAI_API_KEY") {
        providers.openai.api_key = key;
    }
    if let Some(region) = get("AWS_REGION") {
        providers.storage.region = region;
    }
    if let Some(bucket) = get("AWS_BUCKET_NAME") {
        providers.storage.bucket = bucket;
    }

    Ok(config)
}
