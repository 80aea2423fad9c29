//! Message types for model communication
//!
//! Turns follow Anthropic's message shape: a role plus either plain text or
//! a list of content blocks. Tool-invocation requests travel as
//! [`ContentBlock::ToolUse`] blocks inside an assistant turn, and their
//! results come back as [`ContentBlock::ToolResult`] blocks inside a user
//! turn.

use serde::{Deserialize, Serialize};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message (also carries tool results)
    User,
    /// Model response
    Assistant,
    /// System message (lifted into the system prompt by providers)
    System,
}

/// Content block in a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text content
    Text {
        /// Text content
        text: String,
    },

    /// Tool-invocation request from the model
    ToolUse {
        /// Unique ID for this tool use
        id: String,
        /// Capability name
        name: String,
        /// Arguments (JSON)
        input: serde_json::Value,
    },

    /// Result of a tool invocation
    ToolResult {
        /// ID of the tool use this is responding to
        tool_use_id: String,
        /// Result content
        content: String,
        /// Whether this is an error result
        #[serde(skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
}

/// Message content: either simple text or structured blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple text content
    Text(String),
    /// Structured content blocks
    Blocks(Vec<ContentBlock>),
}

/// Borrowed view of one tool-invocation request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolCall<'a> {
    /// Request ID, echoed back in the matching tool result
    pub id: &'a str,
    /// Capability name
    pub name: &'a str,
    /// Arguments as sent by the model
    pub input: &'a serde_json::Value,
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Message content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
}

impl Message {
    /// Create a user message with text
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(MessageContent::Text(text.into())),
        }
    }

    /// Create an assistant message with text
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(MessageContent::Text(text.into())),
        }
    }

    /// Create a system message with text
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(MessageContent::Text(text.into())),
        }
    }

    /// Create an assistant message from raw blocks
    pub fn assistant_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(MessageContent::Blocks(blocks)),
        }
    }

    /// Create a single user turn carrying one or more tool results
    pub fn tool_results(results: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content: Some(MessageContent::Blocks(results)),
        }
    }

    /// Successful tool result block
    pub fn tool_result_block(tool_use_id: impl Into<String>, content: impl Into<String>) -> ContentBlock {
        ContentBlock::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error: None,
        }
    }

    /// Failed tool result block; the error text is shown to the model as content
    pub fn tool_error_block(tool_use_id: impl Into<String>, error: impl Into<String>) -> ContentBlock {
        ContentBlock::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: error.into(),
            is_error: Some(true),
        }
    }

    /// First text fragment of the message
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Some(MessageContent::Text(s)) => Some(s),
            Some(MessageContent::Blocks(blocks)) => blocks.iter().find_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            }),
            None => None,
        }
    }

    /// All text blocks concatenated in order, untouched otherwise
    pub fn text_content(&self) -> String {
        match &self.content {
            Some(MessageContent::Text(s)) => s.clone(),
            Some(MessageContent::Blocks(blocks)) => blocks
                .iter()
                .filter_map(|b| match b {
                    ContentBlock::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
            None => String::new(),
        }
    }

    /// Tool-invocation requests carried by this message, in order
    pub fn tool_calls(&self) -> Vec<ToolCall<'_>> {
        match &self.content {
            Some(MessageContent::Blocks(blocks)) => blocks
                .iter()
                .filter_map(|b| match b {
                    ContentBlock::ToolUse { id, name, input } => Some(ToolCall { id, name, input }),
                    _ => None,
                })
                .collect(),
            _ => vec![],
        }
    }

    /// Check if this message requests any tool invocation
    pub fn has_tool_calls(&self) -> bool {
        match &self.content {
            Some(MessageContent::Blocks(blocks)) => blocks
                .iter()
                .any(|b| matches!(b, ContentBlock::ToolUse { .. })),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool_use(id: &str, name: &str) -> ContentBlock {
        ContentBlock::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input: json!({"curr_date": "2024-06-15"}),
        }
    }

    #[test]
    fn test_user_message() {
        let msg = Message::user("AAPL");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text(), Some("AAPL"));
        assert!(!msg.has_tool_calls());
    }

    #[test]
    fn test_tool_calls_in_order() {
        let msg = Message::assistant_blocks(vec![
            ContentBlock::Text {
                text: "Fetching data".to_string(),
            },
            tool_use("call_1", "get_macro_ind"),
            tool_use("call_2", "get_global_news"),
        ]);

        let calls = msg.tool_calls();
        assert!(msg.has_tool_calls());
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].id, "call_1");
        assert_eq!(calls[1].name, "get_global_news");
        assert_eq!(calls[0].input["curr_date"], "2024-06-15");
    }

    #[test]
    fn test_text_content_joins_blocks() {
        let msg = Message::assistant_blocks(vec![
            ContentBlock::Text {
                text: "first ".to_string(),
            },
            tool_use("call_1", "get_news"),
            ContentBlock::Text {
                text: "second".to_string(),
            },
        ]);
        assert_eq!(msg.text_content(), "first second");
        assert_eq!(msg.text(), Some("first "));
    }

    #[test]
    fn test_tool_results_turn() {
        let msg = Message::tool_results(vec![
            Message::tool_result_block("call_1", "ok"),
            Message::tool_error_block("call_2", "Error: bad date"),
        ]);
        assert_eq!(msg.role, Role::User);
        assert!(!msg.has_tool_calls());

        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["content"][0]["type"], "tool_result");
        assert!(json["content"][0].get("is_error").is_none());
        assert_eq!(json["content"][1]["is_error"], true);
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::assistant_blocks(vec![tool_use("call_9", "get_news")]);
        let encoded = serde_json::to_string(&msg).unwrap();
        let decoded: Message = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, msg);
    }
}
