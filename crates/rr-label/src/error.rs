use thiserror::Error;

/// Errors produced while labeling a route.
#[derive(Debug, Error)]
pub enum LabelError {
    /// The feature provider failed for one buffer.
    #[error("feature query failed: {0}")]
    FeatureQuery(String),

    /// Unusable geometry: an empty route or malformed WKT.
    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LabelResult<T> = Result<T, LabelError>;
