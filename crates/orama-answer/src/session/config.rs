//! Session construction parameters.

use std::fmt;
use std::time::Duration;

use orama_common::{new_visitor_id, SessionId};
use serde::{Deserialize, Serialize};

use crate::transport::HttpTransportConfig;
use crate::{AnswerError, Message};

/// Model selection forwarded with every answer request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl LlmConfig {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Who is asking. Sent with every request so the service can correlate
/// turns; the session owns no other identity state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub visitor_id: String,
    pub session_id: SessionId,
}

impl SessionIdentity {
    pub fn new(visitor_id: impl Into<String>, session_id: SessionId) -> Self {
        Self {
            visitor_id: visitor_id.into(),
            session_id,
        }
    }
}

impl Default for SessionIdentity {
    fn default() -> Self {
        Self::new(new_visitor_id(), SessionId::new())
    }
}

#[derive(Clone)]
pub struct SessionConfig {
    /// Base URL of the answer service.
    pub endpoint: String,
    pub collection_id: String,
    pub read_api_key: Option<String>,
    pub llm: Option<LlmConfig>,
    /// Prior conversation to continue from.
    pub seed_messages: Vec<Message>,
    /// Sent first in every request's message list.
    pub system_prompt: Option<String>,
    /// Most recent messages forwarded as context; the system prompt is not
    /// counted.
    pub max_prior_messages: usize,
    pub identity: SessionIdentity,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("endpoint", &self.endpoint)
            .field("collection_id", &self.collection_id)
            .field(
                "read_api_key",
                &self.read_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("llm", &self.llm)
            .field("seed_messages", &self.seed_messages.len())
            .field("system_prompt", &self.system_prompt)
            .field("max_prior_messages", &self.max_prior_messages)
            .field("identity", &self.identity)
            .finish()
    }
}

impl SessionConfig {
    pub fn new(endpoint: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            collection_id: collection_id.into(),
            read_api_key: None,
            llm: None,
            seed_messages: Vec::new(),
            system_prompt: None,
            max_prior_messages: 50,
            identity: SessionIdentity::default(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_read_api_key(mut self, key: impl Into<String>) -> Self {
        self.read_api_key = Some(key.into());
        self
    }

    pub fn with_llm(mut self, llm: LlmConfig) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn with_seed_messages(mut self, messages: Vec<Message>) -> Self {
        self.seed_messages = messages;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_prior_messages(mut self, max: usize) -> Self {
        self.max_prior_messages = max;
        self
    }

    pub fn with_identity(mut self, identity: SessionIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout = connect;
        self.request_timeout = request;
        self
    }

    pub fn answer_path(&self) -> String {
        format!("/v1/collections/{}/answer", self.collection_id)
    }

    pub fn search_path(&self) -> String {
        format!("/v1/collections/{}/search", self.collection_id)
    }

    pub fn generate_path(&self) -> String {
        format!("/v1/collections/{}/generate", self.collection_id)
    }

    /// Check everything needed before the first request and return the
    /// read credential.
    pub(crate) fn validate(&self) -> Result<&str, AnswerError> {
        let key = self
            .read_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AnswerError::Configuration("read API key is required".into()))?;
        if self.endpoint.trim().is_empty() {
            return Err(AnswerError::Configuration("endpoint must not be empty".into()));
        }
        if self.collection_id.trim().is_empty() {
            return Err(AnswerError::Configuration(
                "collection id must not be empty".into(),
            ));
        }
        Ok(key)
    }

    pub(crate) fn transport_config(&self, read_api_key: &str) -> HttpTransportConfig {
        HttpTransportConfig::new(&self.endpoint, read_api_key)
            .with_connect_timeout(self.connect_timeout)
            .with_request_timeout(self.request_timeout)
    }

    /// Context messages for the next request: the system prompt, then the
    /// newest `max_prior_messages` of `history`.
    pub(crate) fn prior_messages(&self, history: &[Message]) -> Vec<Message> {
        let skip = history.len().saturating_sub(self.max_prior_messages);
        self.system_prompt
            .iter()
            .map(Message::system)
            .chain(history[skip..].iter().cloned())
            .collect()
    }
}
