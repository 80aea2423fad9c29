//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for language-model providers
///
/// A provider performs one blocking round-trip per call. Retry policy is the
/// caller's concern; implementations report failures as [`crate::LLMError`].
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion for the given request
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Provider name (e.g. "anthropic")
    fn name(&self) -> &str;
}
