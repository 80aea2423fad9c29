//! Tool trait definition

use analyst_core::Result;
use analyst_llm::ToolDefinition;
use async_trait::async_trait;
use serde_json::Value;

/// A capability the model can invoke
///
/// The name is the contract the model has been told to use; it must stay the
/// same whichever backend serves the call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the capability with the model-supplied arguments
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Stable capability name
    fn name(&self) -> &str;

    /// Description the model uses to decide when to call this
    fn description(&self) -> &str;

    /// JSON schema for the arguments
    fn input_schema(&self) -> Value;

    /// Definition sent to the model when the tool is bound
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.input_schema())
    }
}
