//! Remote endpoint and credential configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT_URL: &str = "https://api.orama.com";
pub const DEFAULT_READ_API_KEY_ENV: &str = "ORAMA_READ_API_KEY";

/// Where answers are requested from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL of the answer service.
    pub url: String,
    /// Collection the session answers from.
    pub collection_id: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT_URL.to_string(),
            collection_id: String::new(),
        }
    }
}

/// Read credential.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Inline read key. Prefer the environment variable.
    pub read_api_key: Option<String>,
    /// Environment variable consulted when `read_api_key` is unset.
    pub read_api_key_env: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            read_api_key: None,
            read_api_key_env: DEFAULT_READ_API_KEY_ENV.to_string(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "read_api_key",
                &self.read_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("read_api_key_env", &self.read_api_key_env)
            .finish()
    }
}

impl AuthConfig {
    /// Resolve the read key.
    ///
    /// Resolution order:
    /// 1. `read_api_key` from the config file
    /// 2. the variable named by `read_api_key_env`
    pub fn resolve_read_api_key(&self) -> Option<String> {
        if let Some(key) = self.read_api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Some(key.clone());
        }
        std::env::var(&self.read_api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_key_wins() {
        let auth = AuthConfig {
            read_api_key: Some("inline".into()),
            read_api_key_env: "ORAMA_TEST_UNUSED_ENV_VAR".into(),
        };
        assert_eq!(auth.resolve_read_api_key().as_deref(), Some("inline"));
    }

    #[test]
    fn blank_inline_key_falls_through_to_env() {
        let auth = AuthConfig {
            read_api_key: Some("   ".into()),
            read_api_key_env: "ORAMA_TEST_SURELY_UNSET_VARIABLE".into(),
        };
        assert!(auth.resolve_read_api_key().is_none());
    }

    #[test]
    fn debug_redacts_key() {
        let auth = AuthConfig {
            read_api_key: Some("super-secret".into()),
            ..AuthConfig::default()
        };
        let debug = format!("{auth:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
