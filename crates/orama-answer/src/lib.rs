//! Streamed answer sessions.
//!
//! Turns a natural-language question into a streamed answer from a remote
//! retrieval-and-generation service:
//! - `AnswerSession` queues asks, streams fragments into an ordered
//!   interaction history, and handles cancellation
//! - `PlanExecutor` drives server-declared multi-step plans (retrieval,
//!   tool calls, generation)
//! - `Transport` is the only seam to the network; `HttpTransport` is the
//!   reqwest implementation with SSE decoding
//! - Subscribers receive a full snapshot of the interaction history on
//!   every state change

pub mod interaction;
pub mod plan;
pub mod protocol;
pub mod session;
pub mod store;
pub mod streaming;
pub mod tools;
pub mod transport;

#[cfg(test)]
mod testing;

pub use interaction::{Interaction, InteractionState, Source};
pub use plan::{
    PlanExecution, PlanExecutor, PlanObserver, PlanStep, StepAction, StepBackend,
    StepDescriptor, StepKind, StepStatus,
};
pub use session::{
    AnswerSession, AskStream, LlmConfig, SessionBuilder, SessionConfig, SessionIdentity,
    Snapshot, StateCallback, Subscription,
};
pub use store::InteractionStore;
pub use tools::{FnTool, Tool, ToolDefinition, ToolError, ToolRegistry};
pub use transport::{
    FragmentStream, HttpTransport, HttpTransportConfig, Method, SecurityLevel, Transport,
    TransportError, TransportRequest,
};

/// One turn of raw conversational content.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    /// Session could not be created (missing credential, bad endpoint).
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// A required plan step failed.
    #[error("plan step {index} ({kind}) failed: {reason}")]
    PlanStep {
        index: usize,
        kind: StepKind,
        reason: String,
    },
    #[error("tool error: {0}")]
    Tool(#[from] ToolError),
    /// Caller misuse: empty query, nothing to regenerate, closed session.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// The service sent an event that could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<AnswerError> for orama_common::OramaError {
    fn from(err: AnswerError) -> Self {
        match err {
            AnswerError::Transport(e) => orama_common::OramaError::Network(e.to_string()),
            other => orama_common::OramaError::Answer(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors_set_role() {
        assert_eq!(Message::user("hi").role, Role::User);
        assert_eq!(Message::assistant("hello").role, Role::Assistant);
        assert_eq!(Message::system("be brief").role, Role::System);
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("ok")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"ok"}"#);
    }

    #[test]
    fn plan_step_error_display() {
        let err = AnswerError::PlanStep {
            index: 1,
            kind: StepKind::ToolCall,
            reason: "tool not found: weather".into(),
        };
        assert_eq!(
            err.to_string(),
            "plan step 1 (tool_call) failed: tool not found: weather"
        );
    }

    #[test]
    fn transport_errors_map_to_network() {
        let err: orama_common::OramaError = AnswerError::from(TransportError::Timeout).into();
        assert!(matches!(err, orama_common::OramaError::Network(_)));

        let err: orama_common::OramaError = AnswerError::InvalidState("empty".into()).into();
        assert!(matches!(err, orama_common::OramaError::Answer(_)));
    }
}
