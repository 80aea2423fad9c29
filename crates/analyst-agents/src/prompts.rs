//! System prompt assembly
//!
//! Every analyst shares one collaboration instruction and differs only in
//! its role text. Both are MiniJinja templates rendered against the same
//! [`PromptContext`], so role text may reference `{{ ticker }}`,
//! `{{ current_date }}` and, when the analyst has a news window,
//! `{{ start_date }}` / `{{ end_date }}`.

use analyst_core::{Error, FINAL_PROPOSAL_MARKER, Result};
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

const COLLABORATION_TEMPLATE: &str = "You are a helpful AI assistant, collaborating with other assistants. \
Use the provided tools to progress towards answering the question. \
If you are unable to fully answer, that's OK; another assistant with different tools \
will help where you left off. Execute what you can to make progress. \
If you or any other assistant has the {{ marker }} or deliverable, \
prefix your response with {{ marker }} so the team knows to stop. \
You have access to the following tools: {{ tool_names }}.\n{{ system_message }}\
For your reference, the current date is {{ current_date }}. The company we want to analyze is {{ ticker }}";

/// Values substituted into the prompt of one activation
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    pub ticker: String,
    pub current_date: String,
    pub tool_names: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Serialize)]
struct Rendered<'a> {
    #[serde(flatten)]
    context: &'a PromptContext,
    marker: &'static str,
    system_message: String,
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
}

/// Render the system prompt for one activation
///
/// Unknown variables in the role text are an error rather than silently
/// rendering as empty.
pub fn render_system_prompt(role_instruction: &str, context: &PromptContext) -> Result<String> {
    let env = environment();
    let system_message = env
        .render_str(role_instruction, context)
        .map_err(|e| Error::Prompt(format!("role instruction: {e}")))?;

    env.render_str(
        COLLABORATION_TEMPLATE,
        Rendered {
            context,
            marker: FINAL_PROPOSAL_MARKER,
            system_message,
        },
    )
    .map_err(|e| Error::Prompt(format!("collaboration instruction: {e}")))
}
