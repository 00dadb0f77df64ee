//! Error types for the behavior system

use thiserror::Error;

/// Behavior system errors
#[derive(Debug, Error)]
pub enum BehaviorError {
    /// No factory registered under this name
    #[error("Unknown logic: {0}")]
    UnknownLogic(String),

    /// A factory was handed params for a different logic
    #[error("Logic '{logic}' cannot be built from '{found}' params")]
    ParamsMismatch {
        /// Logic the factory builds
        logic: String,
        /// Name of the params it received
        found: String,
    },

    /// Custom params failed to deserialize
    #[error("Invalid params for logic '{logic}': {source}")]
    InvalidParams {
        /// Logic being built
        logic: String,
        /// Underlying decode error
        source: serde_json::Error,
    },

    /// Script or config text failed to parse
    #[error("Failed to parse behavior data: {0}")]
    Parse(#[from] serde_json::Error),

    /// Too many immediate hand-offs within one tick
    #[error("Script exceeded {limit} immediate hand-offs in a single tick")]
    ChainLimit {
        /// Configured limit
        limit: usize,
    },
}

/// Result type for behavior operations
pub type Result<T> = std::result::Result<T, BehaviorError>;
