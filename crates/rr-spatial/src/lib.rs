//! `rr-spatial` — pedestrian graph, spatial indexing, and shortest paths.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `WalkGraph` (CSR + R-tree), `WalkGraphBuilder`              |
//! | [`router`]  | `Router` trait, `Path`, `DijkstraRouter`, `WeightKey`       |
//! | [`loader`]  | `load_graph_csv` / `load_graph_readers`                     |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `rr-core` types.        |

pub mod error;
pub mod loader;
pub mod network;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use loader::{GraphArea, load_graph_csv, load_graph_readers};
pub use network::{WalkGraph, WalkGraphBuilder};
pub use router::{DijkstraRouter, Path, Router, WeightKey};
