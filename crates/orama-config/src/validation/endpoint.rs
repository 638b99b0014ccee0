use crate::schema::OramaConfig;

use super::helpers::validate_not_blank;

pub(super) fn validate_endpoint(errors: &mut Vec<String>, config: &OramaConfig) {
    let url = config.endpoint.url.trim();
    if url.is_empty() {
        errors.push("endpoint.url must not be empty".into());
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!(
            "endpoint.url = {url:?} must start with http:// or https://"
        ));
    }

    if config.endpoint.collection_id.chars().any(char::is_whitespace) {
        errors.push("endpoint.collection_id must not contain whitespace".into());
    }

    if config.auth.read_api_key_env.trim().is_empty() {
        errors.push("auth.read_api_key_env must not be empty".into());
    }
}

pub(super) fn validate_llm(errors: &mut Vec<String>, config: &OramaConfig) {
    validate_not_blank(errors, "llm.provider", config.llm.provider.as_deref());
    validate_not_blank(errors, "llm.model", config.llm.model.as_deref());
    if config.llm.model.is_some() && config.llm.provider.is_none() {
        errors.push("llm.model requires llm.provider".into());
    }
}
