//! Generic analyst node
//!
//! One activation assembles the system prompt, makes exactly one model call
//! with the full history and the node's capabilities bound, and classifies
//! the response: tool requests leave the report empty for this activation,
//! a plain answer becomes the report. The node never loops; see
//! [`crate::AnalystLoop`] for a driver.

use analyst_core::{AnalysisState, Error, Node, ReportTopic, Result, StateUpdate};
use analyst_dataflows::window::{DATE_FORMAT, TrailingWindow};
use analyst_llm::{CompletionRequest, LLMProvider};
use analyst_tools::ToolRegistry;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::prompts::{PromptContext, render_system_prompt};
use crate::tool_step::ToolStep;

/// Model settings for one node
#[derive(Debug, Clone)]
pub struct NodeSettings {
    /// Model to use
    pub model: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature
    pub temperature: Option<f32>,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-5-20250929".to_string(),
            max_tokens: 4096,
            temperature: Some(0.7),
        }
    }
}

/// What distinguishes one analyst from another
#[derive(Clone)]
pub struct AnalystConfig {
    /// Node name, used in logs and errors
    pub name: String,

    /// Role text (MiniJinja template, see [`crate::prompts`])
    pub role_instruction: String,

    /// Capabilities bound on every model call
    pub capabilities: ToolRegistry,

    /// Report field this node writes
    pub report_topic: ReportTopic,

    /// Trailing news window in days, exposed to the prompt as `start_date`/`end_date`
    pub window_days: Option<u64>,
}

/// Analyst node parameterized by an [`AnalystConfig`]
pub struct AnalystNode {
    config: AnalystConfig,
    provider: Arc<dyn LLMProvider>,
    settings: NodeSettings,
}

impl AnalystNode {
    /// Create a node
    pub fn new(config: AnalystConfig, provider: Arc<dyn LLMProvider>, settings: NodeSettings) -> Self {
        Self {
            config,
            provider,
            settings,
        }
    }

    /// Configuration this node was built from
    pub fn config(&self) -> &AnalystConfig {
        &self.config
    }

    /// Report field this node owns
    pub fn report_topic(&self) -> ReportTopic {
        self.config.report_topic
    }

    /// Tool-execution step over this node's own capability set
    pub fn tool_step(&self) -> ToolStep {
        ToolStep::new(format!("{}_tools", self.config.name), self.config.capabilities.clone())
    }

    /// System prompt for an activation against `state`
    pub fn system_prompt(&self, state: &AnalysisState) -> Result<String> {
        let anchor = state.trade_date();
        let window = self
            .config
            .window_days
            .map(|days| TrailingWindow::days(anchor, days))
            .transpose()?;

        let context = PromptContext {
            ticker: state.company_of_interest().to_string(),
            current_date: anchor.format(DATE_FORMAT).to_string(),
            tool_names: self.config.capabilities.names().join(", "),
            start_date: window.map(|w| w.start.format(DATE_FORMAT).to_string()),
            end_date: window.map(|w| w.end.format(DATE_FORMAT).to_string()),
        };
        render_system_prompt(&self.config.role_instruction, &context)
    }
}

#[async_trait]
impl Node for AnalystNode {
    async fn run(&self, state: &AnalysisState) -> Result<StateUpdate> {
        let system = self.system_prompt(state)?;
        let tools = self.config.capabilities.definitions();

        info!(
            node = %self.config.name,
            model = %self.settings.model,
            history = state.messages().len(),
            tool_count = tools.len(),
            "Analyst activation"
        );

        let mut builder = CompletionRequest::builder(&self.settings.model)
            .messages(state.messages().to_vec())
            .system(system)
            .max_tokens(self.settings.max_tokens)
            .bind_tools(tools);
        if let Some(temperature) = self.settings.temperature {
            builder = builder.temperature(temperature);
        }

        let response = self.provider.complete(builder.build()).await?;
        info!(
            node = %self.config.name,
            stop_reason = ?response.stop_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Model response received"
        );

        if response.requests_tools() {
            debug!(
                node = %self.config.name,
                tool_calls = response.message.tool_calls().len(),
                "Capabilities requested, report left empty"
            );
            return Ok(StateUpdate::with_report(
                response.message,
                self.config.report_topic,
                String::new(),
            ));
        }

        let report = response.message.text_content();
        if report.trim().is_empty() {
            return Err(Error::EmptyResponse(self.config.name.clone()));
        }

        let preview: String = report.chars().take(200).collect();
        debug!(node = %self.config.name, report_preview = %preview, "Report produced");
        Ok(StateUpdate::with_report(
            response.message,
            self.config.report_topic,
            report,
        ))
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}

/// Reject a roster in which two nodes write the same report field
pub fn check_field_ownership<'a>(nodes: impl IntoIterator<Item = &'a AnalystNode>) -> Result<()> {
    let mut owners: BTreeMap<ReportTopic, &str> = BTreeMap::new();
    for node in nodes {
        if let Some(previous) = owners.insert(node.report_topic(), node.name()) {
            return Err(Error::FieldOwnership(format!(
                "{} ({previous}, {})",
                node.report_topic(),
                node.name()
            )));
        }
    }
    Ok(())
}
