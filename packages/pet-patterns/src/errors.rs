//! Error types for pet-patterns
//!
//! Provides unified error handling across the crate. Data-quality problems in
//! the input graph are *not* errors: they are logged and counted in
//! [`IngestReport`](crate::features::pet_graph::IngestReport).

use thiserror::Error;

use crate::config::ConfigError;
use crate::shared::models::NodeId;

/// Main error type for pattern detection
#[derive(Debug, Error)]
pub enum PatternError {
    /// No FUNC node with the configured entry name exists
    #[error("Program entry node '{0}' not found")]
    MissingEntryNode(String),

    /// A caller referenced a node that is not part of the graph
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// The barrier fixpoint pass hit its iteration cap
    #[error("Barrier fixpoint did not converge after {iterations} iterations")]
    FixpointNotConverged { iterations: usize },

    /// Graph ingestion error (duplicate ids, containment cycles)
    #[error("Ingest error: {0}")]
    Ingest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON input error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PatternError {
    /// Create an ingest error
    pub fn ingest(msg: impl Into<String>) -> Self {
        PatternError::Ingest(msg.into())
    }
}

/// Result type alias for pattern detection operations
pub type Result<T> = std::result::Result<T, PatternError>;
