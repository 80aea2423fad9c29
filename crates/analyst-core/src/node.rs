//! Node trait definition

use crate::{AnalysisState, Result, StateUpdate};
use async_trait::async_trait;

/// One step of an externally driven analysis graph
///
/// A node reads the shared state and returns the update it wants applied. It
/// never loops on its own; whoever owns the state decides what runs next.
#[async_trait]
pub trait Node: Send + Sync {
    /// Run one step against the current state
    async fn run(&self, state: &AnalysisState) -> Result<StateUpdate>;

    /// Node name, used in logs and errors
    fn name(&self) -> &str;
}
