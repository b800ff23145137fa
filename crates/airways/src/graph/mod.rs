//! The airway graph: registered waypoints and the airway segments between
//! them, plus the topological A* search over it.
//!
//! Why this design
//! - Waypoints are owned by value in an arena keyed by id; adjacency lists
//!   hold ids, not references. This trades the upstream reference-counted,
//!   back-pointer-bearing waypoint graph for a flat structure with no
//!   interior mutability beyond the lazily-cached projected coordinate, and
//!   no possibility of a dangling or cyclic reference.

mod astar;
mod format;
mod types;

use std::collections::HashMap;

use crate::error::{AirwaysError, Result};
use crate::geo::great_circle_distance;

pub use astar::{find_path, AStarConfig};
pub use format::WorldFile;
pub use types::{
    NeighborEdge, Path, PathNode, SyntheticWaypoint, UndirectedPair, Waypoint, WaypointId,
    SYNTHETIC_WAYPOINT_ID,
};

/// Registered waypoints and the airway segments between them.
#[derive(Debug, Clone, Default)]
pub struct AirwayGraph {
    waypoints: HashMap<WaypointId, Waypoint>,
    adjacency: HashMap<WaypointId, Vec<NeighborEdge>>,
}

impl AirwayGraph {
    #[must_use]
    pub fn new() -> Self { Self { waypoints: HashMap::new(), adjacency: HashMap::new() } }

    #[must_use]
    pub fn waypoint(&self, id: WaypointId) -> Option<&Waypoint> { self.waypoints.get(&id) }

    #[must_use]
    pub fn contains_waypoint(&self, id: WaypointId) -> bool { self.waypoints.contains_key(&id) }

    pub fn waypoint_ids(&self) -> impl Iterator<Item = WaypointId> + '_ { self.waypoints.keys().copied() }

    /// Neighbors of `id` with precomputed distances; empty if `id` isn't
    /// registered or has no edges.
    #[must_use]
    pub fn neighbors(&self, id: WaypointId) -> &[NeighborEdge] {
        self.adjacency.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Registers a waypoint, replacing any existing waypoint with the same
    /// id (its edges are left untouched).
    pub fn add_waypoint(&mut self, id: WaypointId, name: impl Into<String>, lon: f64, lat: f64) {
        self.waypoints.insert(id, Waypoint::new(id, name, lon, lat));
        self.adjacency.entry(id).or_default();
    }

    pub(crate) fn insert_waypoint(&mut self, waypoint: Waypoint) {
        let id = waypoint.id;
        self.waypoints.insert(id, waypoint);
        self.adjacency.entry(id).or_default();
    }

    pub(crate) fn insert_directed_edge(&mut self, from: WaypointId, to: WaypointId, distance: f64) -> Result<()> {
        if !self.waypoints.contains_key(&from) || !self.waypoints.contains_key(&to) {
            return Err(AirwaysError::Io(format!("edge references unregistered waypoint {from} -> {to}")));
        }
        self.adjacency.entry(from).or_default().push(NeighborEdge { target: to, distance });
        Ok(())
    }

    /// Removes a waypoint and every airway segment incident to it.
    pub fn remove_waypoint(&mut self, id: WaypointId) {
        self.waypoints.remove(&id);
        self.adjacency.remove(&id);
        for edges in self.adjacency.values_mut() {
            edges.retain(|e| e.target != id);
        }
    }

    /// Adds the undirected airway segment `a <-> b`, with distance computed
    /// from their geodetic locations. A no-op if the segment already
    /// exists.
    ///
    /// # Errors
    /// Returns [`AirwaysError::Precondition`] if either waypoint isn't
    /// registered.
    pub fn add_airway_segment(&mut self, a: WaypointId, b: WaypointId) -> Result<()> {
        let (wa, wb) = (
            self.waypoint(a).ok_or_else(|| AirwaysError::Precondition(format!("waypoint {a} not registered")))?,
            self.waypoint(b).ok_or_else(|| AirwaysError::Precondition(format!("waypoint {b} not registered")))?,
        );
        let distance = great_circle_distance(wa.location(), wb.location());

        let forward = self.adjacency.entry(a).or_default();
        if !forward.iter().any(|e| e.target == b) {
            forward.push(NeighborEdge { target: b, distance });
        }
        let backward = self.adjacency.entry(b).or_default();
        if !backward.iter().any(|e| e.target == a) {
            backward.push(NeighborEdge { target: a, distance });
        }
        Ok(())
    }

    /// Removes the undirected airway segment `a <-> b`, if present.
    pub fn remove_airway_segment(&mut self, a: WaypointId, b: WaypointId) {
        if let Some(edges) = self.adjacency.get_mut(&a) {
            edges.retain(|e| e.target != b);
        }
        if let Some(edges) = self.adjacency.get_mut(&b) {
            edges.retain(|e| e.target != a);
        }
    }

    /// Visits every directed edge exactly once per direction.
    pub fn for_each_edge(&self, mut f: impl FnMut(WaypointId, WaypointId, f64)) {
        for (&from, edges) in &self.adjacency {
            for edge in edges {
                f(from, edge.target, edge.distance);
            }
        }
    }

    /// All undirected segments, each reported once.
    pub fn undirected_edges(&self) -> impl Iterator<Item = UndirectedPair> + '_ {
        let mut seen = std::collections::HashSet::new();
        self.adjacency.iter().flat_map(move |(&from, edges)| {
            edges.iter().filter_map(move |edge| {
                let pair = UndirectedPair::new(from, edge.target);
                seen.insert(pair).then_some(pair)
            })
        })
    }
}
