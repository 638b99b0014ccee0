//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use orama_common::ConfigError;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_orama_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[endpoint]
collection_id = "docs-collection"

[llm]
provider = "openai"
model = "gpt-4o-mini"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.endpoint.collection_id, "docs-collection");
    assert_eq!(config.llm.provider.as_deref(), Some("openai"));
    // Defaults preserved
    assert_eq!(config.endpoint.url, "https://api.orama.com");
    assert_eq!(config.transport.request_timeout_secs, 120);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_out_of_range_values_returns_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[transport]
connect_timeout_secs = 0
"#,
    )
    .unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn create_default_config_writes_loadable_template() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.endpoint.url, "https://api.orama.com");
    assert_eq!(config.auth.read_api_key_env, "ORAMA_READ_API_KEY");
}

#[test]
fn default_config_path_ends_with_orama_config() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with(Path::new("orama").join("config.toml")));
    }
}
