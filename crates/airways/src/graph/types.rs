//! Data types for the airway graph: waypoints, edges, and paths.

use std::cell::Cell;

use nalgebra::Vector2;

use super::AirwayGraph;
use crate::error::{AirwaysError, Result};
use crate::geo::{self, turn_angle_cosine, LonLat};

/// Waypoint identity. The sentinel [`SYNTHETIC_WAYPOINT_ID`] marks a
/// synthetic (user-inserted) waypoint; synthetic waypoints are never
/// registered in [`super::AirwayGraph`]'s primary registry, so this value is
/// not unique among them the way registered ids are.
pub type WaypointId = i32;

/// Sentinel identity shared by every synthetic waypoint.
pub const SYNTHETIC_WAYPOINT_ID: WaypointId = -1;

/// A registered waypoint: identity, display name, geodetic location, and a
/// lazily-computed projected (Mercator) coordinate.
#[derive(Debug, Clone)]
pub struct Waypoint {
    pub id: WaypointId,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    projected: Cell<Option<Vector2<f64>>>,
}

impl Waypoint {
    #[must_use]
    pub fn new(id: WaypointId, name: impl Into<String>, lon: f64, lat: f64) -> Self {
        Self { id, name: name.into(), lon, lat, projected: Cell::new(None) }
    }

    #[must_use]
    pub fn location(&self) -> LonLat { LonLat::new(self.lon, self.lat) }

    /// Projected (Mercator) coordinate, computed and cached on first use.
    #[must_use]
    pub fn projected(&self) -> Vector2<f64> {
        if let Some(p) = self.projected.get() {
            return p;
        }
        let p = geo::lonlat_to_merc(self.lon, self.lat);
        self.projected.set(Some(p));
        p
    }

    #[must_use]
    pub fn has_projected(&self) -> bool { self.projected.get().is_some() }
}

/// A synthetic (user-inserted) waypoint produced by a detour. Carries its
/// own resolved projected coordinate rather than computing it lazily, since
/// it is derived directly from a pixel, not from geodetic input.
#[derive(Debug, Clone)]
pub struct SyntheticWaypoint {
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    pub projected: Vector2<f64>,
}

impl SyntheticWaypoint {
    #[must_use]
    pub fn id(&self) -> WaypointId { SYNTHETIC_WAYPOINT_ID }

    /// Renders the spec-mandated `"<lon>E|W<lat>N|S"` name, two decimal
    /// places, using the fixed 57.29577951308232 rad-to-deg factor.
    #[must_use]
    pub fn render_name(lon: f64, lat: f64) -> String {
        let lon_deg = lon * geo::RAD_TO_DEG;
        let lat_deg = lat * geo::RAD_TO_DEG;
        format!(
            "{:.2}{}{:.2}{}",
            lon_deg,
            if lon_deg >= 0.0 { "E" } else { "W" },
            lat_deg,
            if lat_deg >= 0.0 { "N" } else { "S" },
        )
    }
}

/// A directed reference to a neighbor with a precomputed great-circle
/// distance. The graph maintains the symmetric back-edge separately.
#[derive(Debug, Clone, Copy)]
pub struct NeighborEdge {
    pub target: WaypointId,
    pub distance: f64,
}

/// An orientation-free waypoint pair, canonicalized by numeric ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UndirectedPair(WaypointId, WaypointId);

impl UndirectedPair {
    #[must_use]
    pub fn new(a: WaypointId, b: WaypointId) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }

    #[must_use]
    pub fn endpoints(self) -> (WaypointId, WaypointId) { (self.0, self.1) }
}

/// A single node of a reconstructed path: either a registered waypoint
/// (by id) or an inline synthetic waypoint produced by a detour.
#[derive(Debug, Clone)]
pub enum PathNode {
    Registered(WaypointId),
    Synthetic(SyntheticWaypoint),
}

impl PathNode {
    #[must_use]
    pub fn id(&self) -> WaypointId {
        match self {
            PathNode::Registered(id) => *id,
            PathNode::Synthetic(_) => SYNTHETIC_WAYPOINT_ID,
        }
    }

    #[must_use]
    pub fn is_synthetic(&self) -> bool { matches!(self, PathNode::Synthetic(_)) }
}

/// Ordered sequence of waypoints with a parallel, non-decreasing cumulative
/// distance sequence (first entry zero, last entry the total length).
#[derive(Debug, Clone, Default)]
pub struct Path {
    pub nodes: Vec<PathNode>,
    pub cumulative_distances: Vec<f64>,
}

impl Path {
    #[must_use]
    pub fn empty() -> Self { Self::default() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    #[must_use]
    pub fn len(&self) -> usize { self.nodes.len() }

    #[must_use]
    pub fn total_length(&self) -> f64 { self.cumulative_distances.last().copied().unwrap_or(0.0) }

    /// The first `node_count` nodes, with cumulative distances re-zeroed so
    /// the new first entry is again zero.
    #[must_use]
    pub fn prefix(&self, node_count: usize) -> Path {
        let nodes = self.nodes[..node_count].to_vec();
        let base = self.cumulative_distances[0];
        let cumulative_distances = self.cumulative_distances[..node_count].iter().map(|d| d - base).collect();
        Path { nodes, cumulative_distances }
    }

    /// Concatenates two paths whose join point coincides (the tail of
    /// `self` equals the head of `other`). The right-hand distances are
    /// offset by `self`'s total length.
    ///
    /// # Errors
    /// Returns [`AirwaysError::Precondition`] if either path is empty or the
    /// join points don't coincide (compared by id; two distinct synthetic
    /// waypoints never coincide since they share the sentinel id only by
    /// convention, never by identity).
    pub fn concat(&self, other: &Path) -> Result<Path> {
        if self.is_empty() || other.is_empty() {
            return Err(AirwaysError::Precondition("cannot concatenate an empty path".to_string()));
        }
        let joins = match (self.nodes.last().unwrap(), other.nodes.first().unwrap()) {
            (PathNode::Registered(a), PathNode::Registered(b)) => a == b,
            _ => false,
        };
        if !joins {
            return Err(AirwaysError::Precondition(
                "tail of left path does not match head of right path".to_string(),
            ));
        }
        let mut nodes = self.nodes.clone();
        nodes.extend(other.nodes[1..].iter().cloned());
        let offset = self.total_length();
        let mut cumulative_distances = self.cumulative_distances.clone();
        cumulative_distances.extend(other.cumulative_distances[1..].iter().map(|d| d + offset));
        Ok(Path { nodes, cumulative_distances })
    }

    /// Sum, over every interior vertex, of the turn angle (via
    /// `acos(cosine)`) between the incoming and outgoing leg. A reporting
    /// diagnostic, never consulted by a search predicate.
    ///
    /// # Errors
    /// Returns [`AirwaysError::Precondition`] if a registered node's id
    /// isn't actually in `graph`.
    pub fn total_turn_angle_radians(&self, graph: &AirwayGraph) -> Result<f64> {
        if self.nodes.len() < 3 {
            return Ok(0.0);
        }
        let projected = |node: &PathNode| -> Result<Vector2<f64>> {
            match node {
                PathNode::Registered(id) => graph
                    .waypoint(*id)
                    .map(Waypoint::projected)
                    .ok_or_else(|| AirwaysError::Precondition(format!("waypoint {id} not registered"))),
                PathNode::Synthetic(w) => Ok(w.projected),
            }
        };
        let mut total = 0.0;
        for window in self.nodes.windows(3) {
            let a = projected(&window[0])?;
            let b = projected(&window[1])?;
            let c = projected(&window[2])?;
            let cos = turn_angle_cosine(Some(a), Some(b), Some(c))?;
            total += cos.clamp(-1.0, 1.0).acos();
        }
        Ok(total)
    }
}
