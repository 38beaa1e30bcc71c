//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults or TOML file (RELAY_CONFIG)
//!     → loader.rs (parse, then environment overrides)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → handed to the server and provider clients at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once at process start; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from_env, ConfigError, CONFIG_PATH_VAR};
pub use schema::{
    CorsConfig, GoogleMapsConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, OpenAiConfig,
    ProvidersConfig, RelayConfig, SerpApiConfig, StorageConfig, TimeoutConfig,
};
