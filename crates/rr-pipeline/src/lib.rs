//! `rr-pipeline` — one route recommendation request, end to end.
//!
//! ```text
//! RouteRequest
//!   ① Resolve   — start/end coordinates, via the Geocoder for addresses
//!   ② Graph     — GraphProvider::fetch around the start/end midpoint,
//!                 edge weights scaled by the request's Preferences
//!   ③ Cluster   — graph nodes → waypoint centers
//!   ④ Generate  — tiered candidates (by weight when preferences are
//!                 set, else by length), truncated to max_results
//!   ⑤ Label     — FeatureSource query per route buffer
//!                 (parallel with the `parallel` feature)
//!   ⑥ Split     — stops snapped to nodes → run / run+bus / run+subway
//!   ⑦ Score     — RouteScorer attaches the recommendation block
//! RouteResponse
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Candidate generation and labeling on Rayon's pool.      |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rr_core::RouteConfig;
//! use rr_pipeline::{CsvGraphProvider, Location, PipelineBuilder, RouteRequest};
//! use rr_spatial::DijkstraRouter;
//!
//! let pipeline = PipelineBuilder::new(RouteConfig::default(), DijkstraRouter)
//!     .graph_provider(CsvGraphProvider::new("nodes.csv", "edges.csv"))
//!     .feature_source(features)
//!     .build()?;
//! let response = pipeline.recommend(&RouteRequest::new(
//!     Location::coord(35.8304, 128.7544),
//!     Location::coord(35.8361, 128.7527),
//! ))?;
//! ```

pub mod builder;
pub mod error;
pub mod pipeline;
pub mod provider;
pub mod response;


pub use builder::PipelineBuilder;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{Location, RoutePipeline, RouteRequest};
pub use provider::{CsvGraphProvider, Geocoder, GraphProvider, NoGeocoder, StaticGraphProvider, TableGeocoder};
pub use response::{AnnotatedRoute, NoScorer, Recommendation, RouteResponse, RouteScorer, format_ratio};
