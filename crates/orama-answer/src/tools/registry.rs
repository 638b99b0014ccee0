//! Name-indexed tool registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{Tool, ToolDefinition, ToolError};

/// Adapter turning a synchronous closure into a `Tool`.
pub struct FnTool<F> {
    definition: ToolDefinition,
    f: F,
}

impl<F> FnTool<F>
where
    F: Fn(serde_json::Value) -> Result<serde_json::Value, ToolError> + Send + Sync,
{
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
        f: F,
    ) -> Self {
        Self {
            definition: ToolDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
            f,
        }
    }
}

#[async_trait]
impl<F> Tool for FnTool<F>
where
    F: Fn(serde_json::Value) -> Result<serde_json::Value, ToolError> + Send + Sync,
{
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn call(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        (self.f)(arguments)
    }
}

#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.definition().name;
        self.tools.insert(name, Arc::new(tool));
    }

    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Definitions in name order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub async fn call(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        debug!(tool = %name, "Executing tool");
        tool.call(arguments).await
    }
}
