//! Core types for analyst-rs
//!
//! This crate defines the record threaded between analyst node activations
//! ([`AnalysisState`]), the [`Node`] trait every activation step implements,
//! and the error taxonomy shared by the data adapters and the nodes.

pub mod error;
pub mod node;
pub mod state;

pub use error::{Error, Result};
pub use node::Node;
pub use state::{
    AnalysisState, FINAL_PROPOSAL_MARKER, ReportTopic, ReportUpdate, StateUpdate,
    has_final_proposal,
};
