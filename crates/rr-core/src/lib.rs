//! `rr-core` — foundational types for the `runroute` route recommender.
//!
//! This crate is a dependency of every other `rr-*` crate.  It has no `rr-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`ids`]        | `NodeId`, `EdgeId`                                    |
//! | [`geo`]        | `GeoPoint`, haversine distance, unit-sphere vectors   |
//! | [`config`]     | `RouteConfig`, `ClusterStrategy`                      |
//! | [`rng`]        | `SeedRng` (fixed-seed RNG for reproducible clustering)|
//! | [`mode`]       | `TravelMode` enum (`run`, `run+bus`, `run+subway`)    |
//! | [`preference`] | `Preferences`, `NodeTag`, edge cost factors           |
//! | [`error`]      | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod mode;
pub mod preference;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ClusterStrategy, METERS_PER_DEGREE, RouteConfig};
pub use error::{CoreError, CoreResult};
pub use geo::{EARTH_RADIUS_KM, EARTH_RADIUS_M, GeoPoint};
pub use ids::{EdgeId, NodeId};
pub use mode::TravelMode;
pub use preference::{Avoid, NodeTag, Place, Preferences};
pub use rng::SeedRng;
