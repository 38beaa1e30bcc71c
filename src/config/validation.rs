//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, port valid)
//! - Check origins and provider URLs are well formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Missing provider keys are not errors; they only disable the affected routes

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener port must be non-zero")]
    ZeroPort,

    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid allowed origin '{0}': expected scheme://host[:port]")]
    Origin(String),

    #[error("invalid base URL for {provider}: '{url}'")]
    BaseUrl { provider: &'static str, url: String },

    #[error("timeout '{0}' must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }
    let bind_address = config.listener.bind_address();
    if bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(bind_address));
    }

    for origin in &config.cors.allowed_origins {
        if !is_bare_origin(origin) {
            errors.push(ValidationError::Origin(origin.clone()));
        }
    }

    let providers = &config.providers;
    let base_urls = [
        ("serpapi", &providers.serpapi.base_url),
        ("google_maps", &providers.google_maps.base_url),
        ("openai", &providers.openai.base_url),
    ];
    for (provider, url) in base_urls {
        if Url::parse(url).is_err() {
            errors.push(ValidationError::BaseUrl { provider, url: url.clone() });
        }
    }
    if let Some(url) = &providers.storage.public_base_url {
        if Url::parse(url).is_err() {
            errors.push(ValidationError::BaseUrl { provider: "storage", url: url.clone() });
        }
    }

    let timeouts = [
        ("connect_secs", config.timeouts.connect_secs),
        ("upstream_secs", config.timeouts.upstream_secs),
        ("request_secs", config.timeouts.request_secs),
    ];
    for (name, secs) in timeouts {
        if secs == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Browsers send `Origin` as `scheme://host[:port]` with nothing after it.
fn is_bare_origin(origin: &str) -> bool {
    match Url::parse(origin) {
        Ok(url) => {
            url.has_host()
                && url.path() == "/"
                && url.query().is_none()
                && url.fragment().is_none()
                && !origin.ends_with('/')
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&RelayConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RelayConfig::default();
        config.listener.port = 0;
        config.cors.allowed_origins.push("localhost:5173".into());
        config.timeouts.upstream_secs = 0;
        config.limits.max_body_size = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::ZeroPort));
        assert!(errors.contains(&ValidationError::Origin("localhost:5173".into())));
        assert!(errors.contains(&ValidationError::ZeroTimeout("upstream_secs")));
        assert!(errors.contains(&ValidationError::ZeroBodyLimit));
    }

    #[test]
    fn test_origin_shape() {
        assert!(is_bare_origin("http://localhost:5173"));
        assert!(is_bare_origin("https://travelaid.onrender.com"));
        assert!(!is_bare_origin("https://travelaid.onrender.com/"));
        assert!(!is_bare_origin("https://travelaid.onrender.com/app"));
        assert!(!is_bare_origin("*"));
    }

    #[test]
    fn test_bad_base_url() {
        let mut config = RelayConfig::default();
        config.providers.openai.base_url = "not a url".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::BaseUrl { provider: "openai", url: "not a url".into() }]
        );
    }
}
