//! Error types for plan synthesis.

use thiserror::Error;

/// Errors raised while synthesizing a plan from a stack.
#[derive(Debug, Error)]
pub enum SynthError {
    /// The stack failed construction or invariant validation.
    #[error(transparent)]
    Topology(#[from] strata_topology::TopologyError),

    /// A deployment-target field was not provided.
    #[error("missing deployment target: {0} is not set")]
    MissingTarget(&'static str),

    /// A deployment-target field is malformed.
    #[error("invalid deployment target: {message}")]
    InvalidTarget { message: String },

    /// A resource spec could not be serialized.
    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
