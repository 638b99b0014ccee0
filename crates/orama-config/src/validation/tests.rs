use super::*;

#[test]
fn default_config_is_valid() {
    assert!(validate(&OramaConfig::default()).is_ok());
}

#[test]
fn rejects_non_http_url() {
    let mut config = OramaConfig::default();
    config.endpoint.url = "ftp://example.com".into();
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("endpoint.url"));
}

#[test]
fn rejects_empty_url() {
    let mut config = OramaConfig::default();
    config.endpoint.url = "  ".into();
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("endpoint.url must not be empty"));
}

#[test]
fn rejects_model_without_provider() {
    let mut config = OramaConfig::default();
    config.llm.model = Some("gpt-4o".into());
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("llm.model requires llm.provider"));
}

#[test]
fn rejects_blank_provider() {
    let mut config = OramaConfig::default();
    config.llm.provider = Some("".into());
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("llm.provider"));
}

#[test]
fn collects_all_range_errors() {
    let mut config = OramaConfig::default();
    config.transport.connect_timeout_secs = 0;
    config.transport.request_timeout_secs = 10_000;
    config.session.max_prior_messages = 500;

    let msg = validate(&config).unwrap_err().to_string();
    assert!(msg.contains("transport.connect_timeout_secs = 0"));
    assert!(msg.contains("transport.request_timeout_secs = 10000"));
    assert!(msg.contains("session.max_prior_messages = 500"));
}

#[test]
fn rejects_collection_id_with_whitespace() {
    let mut config = OramaConfig::default();
    config.endpoint.collection_id = "my docs".into();
    assert!(validate(&config).is_err());
}
