//! Deviation-routing engine: topological A* over a persisted airway graph,
//! a raster-level geometric A* that synthesizes detours around hazards, and
//! Yen's algorithm for k-shortest alternatives over either.
//!
//! This crate has no logging or CLI surface of its own — see the `airways-cli`
//! crate for the process that loads a graph and a radar image and drives it.

pub mod error;
pub mod geo;
pub mod graph;
pub mod hazard_index;
pub mod kpath;
pub mod orchestrator;
pub mod raster;
mod util;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports for callers driving a search end to end.
pub mod prelude {
    pub use crate::error::{AirwaysError, Result};
    pub use crate::geo::{great_circle_distance, turn_angle_cosine, LonLat};
    pub use crate::graph::{
        find_path, AStarConfig, AirwayGraph, NeighborEdge, Path, PathNode, SyntheticWaypoint, UndirectedPair,
        Waypoint, WaypointId, WorldFile,
    };
    pub use crate::hazard_index::HazardIndex;
    pub use crate::kpath::find_k_shortest_paths;
    pub use crate::orchestrator::{DynamicConfig, DynamicRouter};
    pub use crate::raster::{HazardRaster, Pixel, RasterPathConfig};
}
