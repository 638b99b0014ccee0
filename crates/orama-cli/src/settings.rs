//! Turns the file config plus command-line overrides into a session config.

use std::time::Duration;

use orama_answer::{LlmConfig, SessionConfig};
use orama_common::{ConfigError, OramaError};
use orama_config::OramaConfig;

use crate::cli::Args;

pub fn session_config(config: &OramaConfig, args: &Args) -> Result<SessionConfig, OramaError> {
    let endpoint = args
        .endpoint
        .clone()
        .unwrap_or_else(|| config.endpoint.url.clone());

    let collection = args
        .collection
        .clone()
        .unwrap_or_else(|| config.endpoint.collection_id.clone());
    if collection.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "no collection: pass --collection or set [endpoint] collection_id".into(),
        )
        .into());
    }

    let read_api_key = args
        .api_key
        .clone()
        .or_else(|| config.auth.resolve_read_api_key())
        .ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "no read API key: pass --api-key, set [auth] read_api_key or {}",
                config.auth.read_api_key_env
            ))
        })?;

    let provider = args.provider.clone().or_else(|| config.llm.provider.clone());
    let model = args.model.clone().or_else(|| config.llm.model.clone());
    let llm = match (provider, model) {
        (Some(provider), model) => Some(LlmConfig { provider, model }),
        (None, Some(_)) => {
            return Err(ConfigError::ValidationError(
                "a model was given without a provider".into(),
            )
            .into())
        }
        (None, None) => None,
    };

    let mut session = SessionConfig::new(endpoint, collection)
        .with_read_api_key(read_api_key)
        .with_max_prior_messages(config.session.max_prior_messages as usize)
        .with_timeouts(
            Duration::from_secs(config.transport.connect_timeout_secs.into()),
            Duration::from_secs(config.transport.request_timeout_secs.into()),
        );
    if let Some(llm) = llm {
        session = session.with_llm(llm);
    }
    if let Some(prompt) = &config.session.system_prompt {
        session = session.with_system_prompt(prompt);
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("orama-ask").chain(extra.iter().copied()))
    }

    fn file_config() -> OramaConfig {
        let mut config = OramaConfig::default();
        config.endpoint.collection_id = "docs".into();
        config.auth.read_api_key = Some("file-key".into());
        config.session.system_prompt = Some("be brief".into());
        config
    }

    #[test]
    fn file_values_are_used_by_default() {
        let session = session_config(&file_config(), &args(&[])).unwrap();
        assert_eq!(session.endpoint, orama_config::schema::DEFAULT_ENDPOINT_URL);
        assert_eq!(session.collection_id, "docs");
        assert_eq!(session.read_api_key.as_deref(), Some("file-key"));
        assert_eq!(session.system_prompt.as_deref(), Some("be brief"));
        assert_eq!(session.max_prior_messages, 50);
        assert_eq!(session.request_timeout, Duration::from_secs(120));
        assert!(session.llm.is_none());
    }

    #[test]
    fn flags_override_the_file() {
        let session = session_config(
            &file_config(),
            &args(&[
                "--endpoint",
                "http://localhost:8080",
                "--collection",
                "blog",
                "--api-key",
                "flag-key",
                "--provider",
                "openai",
                "--model",
                "gpt-4o-mini",
            ]),
        )
        .unwrap();
        assert_eq!(session.endpoint, "http://localhost:8080");
        assert_eq!(session.collection_id, "blog");
        assert_eq!(session.read_api_key.as_deref(), Some("flag-key"));
        assert_eq!(
            session.llm,
            Some(LlmConfig::new("openai").with_model("gpt-4o-mini"))
        );
    }

    #[test]
    fn missing_collection_is_reported() {
        let mut config = file_config();
        config.endpoint.collection_id.clear();
        let err = session_config(&config, &args(&[])).unwrap_err();
        assert!(err.to_string().contains("collection"));
    }

    #[test]
    fn model_without_provider_is_rejected() {
        let err = session_config(&file_config(), &args(&["--model", "gpt-4o-mini"])).unwrap_err();
        assert!(matches!(err, OramaError::Config(ConfigError::ValidationError(_))));
    }
}
