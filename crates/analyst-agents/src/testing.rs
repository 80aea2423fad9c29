//! Test doubles shared by the node, tool-step and driver tests

use analyst_core::{Error, Result};
use analyst_llm::{
    CompletionRequest, CompletionResponse, ContentBlock, LLMError, LLMProvider, Message,
    StopReason, TokenUsage,
};
use analyst_tools::Tool;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Provider that replays a fixed script and records every request
pub struct ScriptedProvider {
    script: Mutex<VecDeque<analyst_llm::Result<CompletionResponse>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<analyst_llm::Result<CompletionResponse>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn last_request(&self) -> CompletionRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> analyst_llm::Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LLMError::UnexpectedResponse("script exhausted".to_string())))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn text_response(text: &str) -> CompletionResponse {
    CompletionResponse {
        message: Message::assistant_blocks(vec![ContentBlock::Text {
            text: text.to_string(),
        }]),
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage::default(),
    }
}

pub fn tool_response(calls: &[(&str, &str, Value)]) -> CompletionResponse {
    let blocks = calls
        .iter()
        .map(|(id, name, input)| ContentBlock::ToolUse {
            id: (*id).to_string(),
            name: (*name).to_string(),
            input: input.clone(),
        })
        .collect();
    CompletionResponse {
        message: Message::assistant_blocks(blocks),
        stop_reason: StopReason::ToolUse,
        usage: TokenUsage::default(),
    }
}

/// Capability answering every call with the same text
pub struct StaticTool {
    name: &'static str,
    output: &'static str,
}

impl StaticTool {
    pub fn arc(name: &'static str, output: &'static str) -> Arc<dyn Tool> {
        Arc::new(Self { name, output })
    }
}

#[async_trait]
impl Tool for StaticTool {
    async fn execute(&self, _params: Value) -> Result<Value> {
        Ok(json!(self.output))
    }

    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "static test capability"
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }
}

/// Capability that always fails with the given error
pub struct FailingTool {
    name: &'static str,
    error: Error,
}

impl FailingTool {
    pub fn arc(name: &'static str, error: Error) -> Arc<dyn Tool> {
        Arc::new(Self { name, error })
    }
}

#[async_trait]
impl Tool for FailingTool {
    async fn execute(&self, _params: Value) -> Result<Value> {
        Err(self.error.clone())
    }

    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "failing test capability"
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }
}
