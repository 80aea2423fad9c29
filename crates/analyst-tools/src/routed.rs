//! Capability declared by name and routed to a vendor at call time

use crate::{Tool, VendorRouter};
use analyst_core::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// A capability whose calls are forwarded to the [`VendorRouter`]
///
/// The wrapper holds only the declaration (name, description, schema) and a
/// handle to the router; it performs no I/O itself. Swapping a live API for a
/// local snapshot happens in the router and leaves the declaration untouched.
pub struct RoutedTool {
    name: String,
    description: String,
    input_schema: Value,
    router: Arc<VendorRouter>,
}

impl RoutedTool {
    /// Declare a routed capability
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        router: Arc<VendorRouter>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            router,
        }
    }
}

#[async_trait]
impl Tool for RoutedTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        debug!(capability = %self.name, "Forwarding capability call to router");
        let text = self.router.route(&self.name, &params).await?;
        Ok(Value::String(text))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        self.input_schema.clone()
    }
}
