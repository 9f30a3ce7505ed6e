//! Harness error type.

use thiserror::Error;

/// Everything that can go wrong while auditing the catalog.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Filesystem or pipe failure.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// Report or log (de)serialization failure.
    #[error("serialization failure: {0}")]
    Json(#[from] serde_json::Error),

    /// A subprocess could not be spawned.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The catalog did not leave behind the state a flow always produces
    /// (for example, a flow granted fewer buffers than expected).
    #[error("catalog contract violated: {0}")]
    Contract(String),
}
