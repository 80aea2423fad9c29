//! Capability framework for analyst-rs
//!
//! A capability ([`Tool`]) is a named, described function the model may ask
//! to run. Capabilities backed by data vendors are declared as
//! [`RoutedTool`]s: the declaration stays fixed while the [`VendorRouter`]
//! decides which backend actually serves the call.

pub mod registry;
pub mod routed;
pub mod router;
pub mod tool;

pub use registry::ToolRegistry;
pub use routed::RoutedTool;
pub use router::{VendorBackend, VendorRouter};
pub use tool::Tool;
