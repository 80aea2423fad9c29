//! Single-analyst loop driver
//!
//! Alternates analyst activations and tool steps over an owned state until
//! the analyst produces its report.

use analyst_core::{AnalysisState, Error, Node, Result, has_final_proposal};
use tracing::{info, warn};

use crate::node::AnalystNode;
use crate::tool_step::ToolStep;

/// Configuration for the loop driver
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Maximum analyst activations (prevents infinite loops)
    pub max_iterations: usize,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self { max_iterations: 10 }
    }
}

/// Drives one analyst to completion: activate, apply, execute tools, repeat
pub struct AnalystLoop {
    analyst: AnalystNode,
    tools: ToolStep,
    config: LoopConfig,
}

impl AnalystLoop {
    /// Loop over `analyst`, executing tools with its own capability set
    pub fn new(analyst: AnalystNode, config: LoopConfig) -> Self {
        let tools = analyst.tool_step();
        Self {
            analyst,
            tools,
            config,
        }
    }

    /// Analyst node being driven
    pub fn analyst(&self) -> &AnalystNode {
        &self.analyst
    }

    /// Run until a report is written, returning it
    ///
    /// Every update is applied to `state`, so on error the state still holds
    /// the history up to the failure.
    pub async fn run(&self, state: &mut AnalysisState) -> Result<String> {
        let topic = self.analyst.report_topic();

        for iteration in 1..=self.config.max_iterations {
            info!(
                node = %self.analyst.name(),
                iteration = iteration,
                max_iterations = self.config.max_iterations,
                "Analyst iteration started"
            );

            let update = self.analyst.run(state).await?;
            let done = update.is_final();
            state.apply(update);

            if done {
                let report = state.report(topic).to_string();
                info!(
                    node = %self.analyst.name(),
                    iteration = iteration,
                    report_length = report.len(),
                    final_proposal = has_final_proposal(&report),
                    "Report produced"
                );
                return Ok(report);
            }

            let results = self.tools.run(state).await?;
            state.apply(results);
        }

        warn!(
            node = %self.analyst.name(),
            max_iterations = self.config.max_iterations,
            "Max iterations reached without a report"
        );
        Err(Error::IterationLimit {
            node: self.analyst.name().to_string(),
            limit: self.config.max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{AnalystConfig, NodeSettings};
    use crate::testing::{ScriptedProvider, StaticTool, text_response, tool_response};
    use analyst_core::ReportTopic;
    use analyst_llm::{ContentBlock, MessageContent, Role};
    use analyst_tools::ToolRegistry;
    use serde_json::json;
    use std::sync::Arc;

    fn analyst(provider: Arc<ScriptedProvider>) -> AnalystNode {
        AnalystNode::new(
            AnalystConfig {
                name: "sentiment_analyst".to_string(),
                role_instruction: "Gauge the mood. ".to_string(),
                capabilities: ToolRegistry::from_tools([StaticTool::arc(
                    "get_news",
                    "## AAPL news\n\n### Apple hits record high",
                )]),
                report_topic: ReportTopic::Sentiment,
                window_days: Some(7),
            },
            provider,
            NodeSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_tool_round_then_report() {
        let provider = ScriptedProvider::new(vec![
            Ok(tool_response(&[(
                "call_1",
                "get_news",
                json!({"ticker": "AAPL", "start_date": "2024-06-08", "end_date": "2024-06-15"}),
            )])),
            Ok(text_response("Sentiment is upbeat after the record high.")),
        ]);
        let driver = AnalystLoop::new(analyst(provider.clone()), LoopConfig::default());
        let mut state = AnalysisState::new("AAPL", "2024-06-15").unwrap();

        let report = driver.run(&mut state).await.unwrap();

        assert_eq!(report, "Sentiment is upbeat after the record high.");
        assert_eq!(state.report(ReportTopic::Sentiment), report);
        // seed, tool request, tool results, final answer
        assert_eq!(state.messages().len(), 4);
        assert_eq!(provider.request_count(), 2);

        let second = provider.last_request();
        let results = &second.messages[2];
        assert_eq!(results.role, Role::User);
        let Some(MessageContent::Blocks(blocks)) = &results.content else {
            panic!("expected tool result blocks");
        };
        assert!(matches!(
            &blocks[0],
            ContentBlock::ToolResult { tool_use_id, content, .. }
                if tool_use_id == "call_1" && content.contains("Apple hits record high")
        ));
    }

    #[tokio::test]
    async fn test_iteration_limit() {
        let calls = (0..3)
            .map(|i| {
                Ok(tool_response(&[(
                    &*format!("call_{i}"),
                    "get_news",
                    json!({}),
                )]))
            })
            .collect();
        let provider = ScriptedProvider::new(calls);
        let driver = AnalystLoop::new(analyst(provider), LoopConfig { max_iterations: 2 });
        let mut state = AnalysisState::new("AAPL", "2024-06-15").unwrap();

        let err = driver.run(&mut state).await.unwrap_err();
        assert_eq!(
            err,
            Error::IterationLimit {
                node: "sentiment_analyst".to_string(),
                limit: 2
            }
        );
        assert_eq!(state.report(ReportTopic::Sentiment), "");
        assert_eq!(state.messages().len(), 5);
    }
}
