//! Analyst nodes for analyst-rs
//!
//! - [`AnalystNode`]: one generic single-step node, configured by role text,
//!   capability set and report field
//! - [`analysts`]: macro, sentiment and news presets
//! - [`ToolStep`]: executes the capability requests of the last model turn
//! - [`AnalystLoop`]: drives one analyst until it writes its report

pub mod analysts;
pub mod driver;
pub mod node;
pub mod prompts;
pub mod tool_step;

#[cfg(test)]
mod testing;

pub use analysts::{AnalystKind, create_analyst};
pub use driver::{AnalystLoop, LoopConfig};
pub use node::{AnalystConfig, AnalystNode, NodeSettings, check_field_ownership};
pub use tool_step::ToolStep;
