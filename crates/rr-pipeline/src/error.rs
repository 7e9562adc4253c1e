use rr_core::CoreError;
use rr_spatial::SpatialError;
use thiserror::Error;

/// Request-level failures.
///
/// Only `LocationNotFound` and `GraphEmpty` come from request data; the
/// other variants mean the pipeline itself is misconfigured or a provider
/// is broken.  Unreachable waypoint combinations and failed feature queries
/// never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("location not found: {0}")]
    LocationNotFound(String),

    #[error("map provider returned an empty graph")]
    GraphEmpty,

    #[error("provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
