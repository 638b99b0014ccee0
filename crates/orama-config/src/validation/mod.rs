//! Full configuration validation.
//!
//! Validates the endpoint URL, model selection, and numeric ranges. Each
//! check pushes onto a shared error list; everything is reported at once
//! in a single `ConfigError`.

mod endpoint;
mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::OramaConfig;
use orama_common::ConfigError;

use helpers::validate_range;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &OramaConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    endpoint::validate_endpoint(&mut errors, config);
    endpoint::validate_llm(&mut errors, config);

    validate_range(
        &mut errors,
        "transport.connect_timeout_secs",
        config.transport.connect_timeout_secs,
        1,
        60,
    );
    validate_range(
        &mut errors,
        "transport.request_timeout_secs",
        config.transport.request_timeout_secs,
        1,
        600,
    );
    validate_range(
        &mut errors,
        "session.max_prior_messages",
        config.session.max_prior_messages,
        0,
        200,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
