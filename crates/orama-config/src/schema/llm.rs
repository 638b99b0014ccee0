//! Model selection and conversation settings.

use serde::{Deserialize, Serialize};

/// Optional LLM provider/model override sent with each answer request.
/// When both are unset the service picks its default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
}

/// Conversation behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Upper bound on prior messages sent as context (0-200).
    pub max_prior_messages: u32,
    /// System prompt placed before the prior messages.
    pub system_prompt: Option<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_prior_messages: 50,
            system_prompt: None,
        }
    }
}
