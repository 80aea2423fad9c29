//! Fixed capability sets bound to a node

use crate::Tool;
use analyst_llm::ToolDefinition;
use std::sync::Arc;

/// Ordered set of capabilities, unique by name
///
/// Order is registration order, so tool lists in prompts and requests are
/// deterministic.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of tools
    pub fn from_tools(tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool);
        }
        registry
    }

    /// Register a tool, replacing any tool with the same name in place
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(slot) => *slot = tool,
            None => self.tools.push(tool),
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Definitions to bind on a completion request
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
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
    use analyst_core::Result;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct Fixed(&'static str, &'static str);

    #[async_trait]
    impl Tool for Fixed {
        async fn execute(&self, _params: Value) -> Result<Value> {
            Ok(json!(self.1))
        }
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            "fixed output"
        }
        fn input_schema(&self) -> Value {
            json!({"type": "object"})
        }
    }

    #[test]
    fn test_registration_order_and_lookup() {
        let registry = ToolRegistry::from_tools([
            Arc::new(Fixed("get_global_news", "a")) as Arc<dyn Tool>,
            Arc::new(Fixed("get_macro_ind", "b")),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["get_global_news", "get_macro_ind"]);
        assert!(registry.get("get_macro_ind").is_some());
        assert!(registry.get("get_news").is_none());
        assert_eq!(registry.definitions()[1].name, "get_macro_ind");
    }

    #[tokio::test]
    async fn test_register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());
        registry.register(Arc::new(Fixed("get_news", "old")));
        registry.register(Arc::new(Fixed("get_news", "new")));

        assert_eq!(registry.len(), 1);
        let tool = registry.get("get_news").unwrap();
        assert_eq!(tool.execute(json!({})).await.unwrap(), json!("new"));
    }
}
