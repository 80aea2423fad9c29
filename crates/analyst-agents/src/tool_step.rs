//! Tool-execution step
//!
//! Runs the capability requests carried by the last model turn and appends
//! a single turn holding every result, in request order. Capability failures
//! and unknown names are reported to the model as error results so it can
//! correct itself; they never fail the step.

use analyst_core::{AnalysisState, Error, Node, Result, StateUpdate};
use analyst_llm::{ContentBlock, Message};
use analyst_tools::ToolRegistry;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Instant;
use tracing::{info, warn};

/// Executes pending tool calls against a fixed capability set
#[derive(Clone)]
pub struct ToolStep {
    name: String,
    capabilities: ToolRegistry,
}

impl ToolStep {
    /// Step named `name` that can only run tools in `capabilities`
    pub fn new(name: impl Into<String>, capabilities: ToolRegistry) -> Self {
        Self {
            name: name.into(),
            capabilities,
        }
    }

    async fn execute(&self, id: &str, name: &str, input: &Value) -> ContentBlock {
        let Some(tool) = self.capabilities.get(name) else {
            warn!(step = %self.name, tool_name = %name, "Model requested an unknown tool");
            return Message::tool_error_block(
                id,
                format!(
                    "Error: unknown tool '{name}', available tools: {}",
                    self.capabilities.names().join(", ")
                ),
            );
        };

        let input_preview: String = input.to_string().chars().take(500).collect();
        info!(tool_name = %name, tool_id = %id, input_preview = %input_preview, "Executing tool");

        let started = Instant::now();
        match tool.execute(input.clone()).await {
            Ok(result) => {
                let text = match result {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                info!(
                    tool_name = %name,
                    duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    result_length = text.len(),
                    "Tool execution succeeded"
                );
                Message::tool_result_block(id, text)
            }
            Err(e) => {
                warn!(tool_name = %name, error = %e, "Tool execution failed");
                Message::tool_error_block(id, format!("Error: {e}"))
            }
        }
    }
}

#[async_trait]
impl Node for ToolStep {
    async fn run(&self, state: &AnalysisState) -> Result<StateUpdate> {
        let calls = state
            .last_message()
            .map(Message::tool_calls)
            .unwrap_or_default();
        if calls.is_empty() {
            return Err(Error::MalformedInput(format!(
                "{}: last turn carries no tool calls",
                self.name
            )));
        }

        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.execute(call.id, call.name, call.input).await);
        }
        Ok(StateUpdate::message(Message::tool_results(results)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingTool, StaticTool, tool_response};
    use serde_json::json;

    fn step() -> ToolStep {
        ToolStep::new(
            "macro_analyst_tools",
            ToolRegistry::from_tools([
                StaticTool::arc("get_macro_ind", "date,CPI\n2024-05-31,313.50"),
                FailingTool::arc(
                    "get_global_news",
                    Error::MalformedInput("curr_date must be in YYYY-mm-dd format".to_string()),
                ),
            ]),
        )
    }

    fn results(update: &StateUpdate) -> Vec<(String, String, bool)> {
        match &update.message.content {
            Some(analyst_llm::MessageContent::Blocks(blocks)) => blocks
                .iter()
                .filter_map(|b| match b {
                    ContentBlock::ToolResult {
                        tool_use_id,
                        content,
                        is_error,
                    } => Some((tool_use_id.clone(), content.clone(), is_error.unwrap_or(false))),
                    _ => None,
                })
                .collect(),
            _ => vec![],
        }
    }

    #[tokio::test]
    async fn test_results_in_one_turn_in_order() {
        let mut state = AnalysisState::new("NVDA", "2024-06-15").unwrap();
        state.append(
            tool_response(&[
                ("a", "get_macro_ind", json!({"curr_date": "2024-06-15"})),
                ("b", "get_global_news", json!({"curr_date": "2024/06/15"})),
                ("c", "get_stock_data", json!({})),
            ])
            .message,
        );

        let update = step().run(&state).await.unwrap();
        assert!(update.report.is_none());

        let results = results(&update);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], ("a".to_string(), "date,CPI\n2024-05-31,313.50".to_string(), false));
        assert_eq!(results[1].0, "b");
        assert!(results[1].1.starts_with("Error: Malformed input: curr_date"));
        assert!(results[1].2);
        assert!(results[2].1.contains("unknown tool 'get_stock_data'"));
        assert!(results[2].2);
    }

    #[tokio::test]
    async fn test_no_pending_calls() {
        let state = AnalysisState::new("NVDA", "2024-06-15").unwrap();
        let err = step().run(&state).await.unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }
}
