//! Tool registry for managing available tools

use crate::error::{Result, ToolError};
use crate::tool::Tool;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry mapping tool names to callable tools
///
/// Populated once at startup; afterwards the agent shell only reads from it,
/// so no interior mutability is needed.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name
    ///
    /// Registering a second tool with the same name replaces the first.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Execute a registered tool by name
    pub async fn dispatch(&self, name: &str, params: Value) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tool.execute(params).await
    }

    /// List all registered tools
    ///
    /// Useful for building tool definitions to send to the LLM.
    pub fn list_tools(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.values().cloned().collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        async fn execute(&self, params: Value) -> Result<Value> {
            Ok(params)
        }

        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Returns its input unchanged"
        }

        fn input_schema(&self) -> Value {
            json!({ "type": "object" })
        }
    }

    #[test]
    fn register_and_get() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(EchoTool));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[tokio::test]
    async fn dispatch_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let out = registry
            .dispatch("echo", json!({"hello": "world"}))
            .await
            .expect("dispatch should succeed");
        assert_eq!(out["hello"], "world");
    }

    #[tokio::test]
    async fn dispatch_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.dispatch("nope", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(_)));
    }
}
