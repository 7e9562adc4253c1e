//! `rr-label` — what a route passes by.
//!
//! A route is widened into a buffer polygon, the feature provider is asked
//! for everything inside it, and the result is folded into a
//! [`FeatureSummary`] plus the transit stops found along the way.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`buffer`]   | `route_line`, `route_buffer`, `LocalProjection`           |
//! | [`features`] | `Feature`, `FeatureTable`, `FeatureSource`, `CsvFeatureSource` |
//! | [`summary`]  | `FeatureSummary`, `StopPoint`, `Labeled`                  |
//! | [`labeler`]  | `FeatureLabeler`                                          |
//! | [`error`]    | `LabelError`, `LabelResult<T>`                            |
//!
//! Geometry is `geo` with `x = lon`, `y = lat`.

pub mod buffer;
pub mod error;
pub mod features;
pub mod labeler;
pub mod summary;

#[cfg(test)]
mod tests;

pub use buffer::{LocalProjection, route_buffer, route_line};
pub use error::{LabelError, LabelResult};
pub use features::{CsvFeatureSource, FEATURE_TAGS, Feature, FeatureSource, FeatureTable};
pub use labeler::FeatureLabeler;
pub use summary::{AreaStats, CountStats, FeatureSummary, Labeled, LengthStats, StopKind, StopPoint};
