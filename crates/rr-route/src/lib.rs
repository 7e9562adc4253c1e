//! `rr-route` — candidate generation and transit expansion.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`candidate`] | `CandidateRoute`, `RouteTier`                            |
//! | [`generator`] | `RouteGenerator`, `is_acceptable`                        |
//! | [`transit`]   | `TransitSplitter`, `ExpandedRoute`, `StopNodes`          |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Evaluates waypoint combinations on Rayon's thread pool.   |
//! | `fx-hash`  | FxHash for stop node sets.                                |
//! | `serde`    | Derives `Serialize`/`Deserialize` on route types.         |

pub mod candidate;
pub mod generator;
pub mod transit;


pub use candidate::{CandidateRoute, RouteTier};
pub use generator::{RouteGenerator, is_acceptable};
pub use transit::{ExpandedRoute, SplitMeta, StopNodes, StopSet, TransitSplitter};
