//! Error types for analyst-core

use thiserror::Error;

/// Result type alias for analyst-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by data adapters, capabilities and nodes
///
/// An empty data window is not an error; adapters report it as content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Bad date format or argument; do not retry without correcting the input
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Backing file or service is missing
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Resource exists but lacks the required structure
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// No backend is registered for the capability name
    #[error("No vendor registered for capability '{0}'")]
    UnknownCapability(String),

    /// A vendor backend failed (network, HTTP status, payload)
    #[error("Vendor '{vendor}' failed: {message}")]
    Backend {
        vendor: String,
        message: String,
        transient: bool,
    },

    /// The model round-trip failed
    #[error("Model invocation failed: {0}")]
    Model(String),

    /// The model answered with neither tool calls nor text
    #[error("Node '{0}' received an empty final response")]
    EmptyResponse(String),

    /// Prompt template could not be rendered
    #[error("Prompt rendering failed: {0}")]
    Prompt(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Two nodes claim the same report field
    #[error("Report field '{0}' is owned by more than one node")]
    FieldOwnership(String),

    /// A single-analyst loop ran out of iterations
    #[error("Node '{node}' produced no report within {limit} iterations")]
    IterationLimit { node: String, limit: usize },
}

impl Error {
    /// Whether the same call may succeed if tried again or on another vendor
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Backend { transient: true, .. })
    }

    /// Shorthand for a transient vendor failure
    pub fn transient(vendor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            vendor: vendor.into(),
            message: message.into(),
            transient: true,
        }
    }

    /// Shorthand for a permanent vendor failure
    pub fn rejected(vendor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            vendor: vendor.into(),
            message: message.into(),
            transient: false,
        }
    }
}

impl From<analyst_llm::LLMError> for Error {
    fn from(err: analyst_llm::LLMError) -> Self {
        Self::Model(err.to_string())
    }
}
