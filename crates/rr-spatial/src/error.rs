//! Spatial-subsystem error type.

use thiserror::Error;

use rr_core::{EdgeId, NodeId};

/// Errors produced by `rr-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no path from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("graph has no nodes")]
    GraphEmpty,

    /// Dijkstra needs non-negative costs; this is a configuration error.
    #[error("edge {edge} has invalid weight {weight}")]
    NegativeWeight { edge: EdgeId, weight: f64 },

    #[error("graph parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
