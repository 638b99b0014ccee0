//! Client-side tools a plan can call.
//!
//! Tools are advertised to the service with every answer request; when a
//! plan contains a `tool_call` step the executor invokes the tool locally
//! and feeds its output to the generation step.

mod registry;

pub use registry::{FnTool, ToolRegistry};

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("tool failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    async fn call(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError>;
}

/// Parse serialized tool-call arguments. An empty payload means "no
/// arguments" and parses to an empty object.
pub fn parse_arguments(raw: &str) -> Result<serde_json::Value, ToolError> {
    if raw.trim().is_empty() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(raw).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_object_arguments() {
        let args = parse_arguments(r#"{"city":"Rome","days":3}"#).unwrap();
        assert_eq!(args, json!({"city": "Rome", "days": 3}));
    }

    #[test]
    fn empty_arguments_are_an_empty_object() {
        assert_eq!(parse_arguments("  ").unwrap(), json!({}));
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        let err = parse_arguments(r#"{"city": "Rome""#).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
