//! Language-model boundary for analyst-rs
//!
//! The analyst nodes treat the model as an opaque capability: given a system
//! prompt, the conversation so far and a set of tool definitions, it answers
//! either with text or with a list of tool-invocation requests. This crate
//! holds the types on that boundary:
//!
//! - Message types, including tool-use and tool-result blocks
//! - Completion request/response types
//! - Tool definitions and JSON-schema helpers
//! - The [`LLMProvider`] trait
//! - An Anthropic provider (behind the `anthropic` feature)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod tools;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{ContentBlock, Message, MessageContent, Role, ToolCall};
pub use provider::LLMProvider;
pub use tools::ToolDefinition;

// Provider implementations (feature-gated)
#[cfg(feature = "anthropic")]
pub mod providers;
