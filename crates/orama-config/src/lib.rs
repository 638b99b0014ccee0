//! Configuration for the answer client.
//!
//! Provides TOML-based configuration with validation. All sections use
//! sensible defaults so partial configs work out of the box; only the
//! collection id and a read key have to be supplied by the user (the key
//! may also come from the environment).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use orama_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config.endpoint.url);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    AuthConfig, EndpointConfig, LlmConfig, LogLevel, LoggingConfig, OramaConfig,
    SessionSettings, TransportConfig, CONFIG_SCHEMA_VERSION,
};

use orama_common::ConfigError;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<OramaConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string with secrets redacted.
pub fn config_to_json(config: &OramaConfig) -> String {
    let mut redacted = config.clone();
    if redacted.auth.read_api_key.is_some() {
        redacted.auth.read_api_key = Some("[REDACTED]".into());
    }
    serde_json::to_string_pretty(&redacted)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&OramaConfig::default());
        assert!(json.contains("\"endpoint\""));
        assert!(json.contains("\"auth\""));
        assert!(json.contains("\"llm\""));
        assert!(json.contains("\"transport\""));
        assert!(json.contains("\"session\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_to_json_redacts_read_key() {
        let mut config = OramaConfig::default();
        config.auth.read_api_key = Some("secret-key".into());
        let json = config_to_json(&config);
        assert!(!json.contains("secret-key"));
        assert!(json.contains("[REDACTED]"));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }
}
