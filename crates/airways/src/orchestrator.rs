//! Composes the topological A* with the raster detour pathfinder: the
//! "dynamic full path" search that routes around whatever the current
//! hazard raster blocks.
//!
//! Why this design
//! - The graph-level A* already accepts a predicate with the power to
//!   reject an edge or splice synthetic waypoints into it; this module's
//!   entire job is building that one predicate closure. Nothing about
//!   [`astar::find_path`] itself needed to change to support detours.

use std::collections::HashSet;

use nalgebra::Vector2;

use crate::error::Result;
use crate::geo::{merc_to_lonlat, turn_angle_cosine};
use crate::graph::{
    find_path, AStarConfig, AirwayGraph, Path, SyntheticWaypoint, UndirectedPair, WaypointId, WorldFile,
};
use crate::hazard_index::HazardIndex;
use crate::raster::{find_path_with_angle, HazardRaster, RasterPathConfig};

/// Tunables for both legs of the composite search.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicConfig {
    pub astar: AStarConfig,
    pub raster: RasterPathConfig,
}

/// Bundles the graph, its pixel transform, the current hazard raster, and
/// the segment index derived from them, so callers don't have to thread
/// four references through every search call.
pub struct DynamicRouter<'a> {
    pub graph: &'a AirwayGraph,
    pub world_file: &'a WorldFile,
    pub raster: &'a HazardRaster,
    pub hazard_index: &'a HazardIndex,
    pub cfg: DynamicConfig,
}

impl<'a> DynamicRouter<'a> {
    #[must_use]
    pub fn new(
        graph: &'a AirwayGraph,
        world_file: &'a WorldFile,
        raster: &'a HazardRaster,
        hazard_index: &'a HazardIndex,
        cfg: DynamicConfig,
    ) -> Self {
        Self { graph, world_file, raster, hazard_index, cfg }
    }

    /// Finds a least-cost path from `origin` to `destination`: unblocked
    /// segments pass a turn-angle gate before being accepted; blocked
    /// segments are replaced by a raster-level detour, whose interior
    /// pixels become synthetic waypoints spliced into the path.
    ///
    /// Segments in `forbidden` are rejected outright before either check
    /// runs, so [`crate::kpath`] can reuse this search unmodified.
    #[must_use]
    pub fn find_dynamic_full_path(
        &self,
        origin: WaypointId,
        destination: WaypointId,
        forbidden: &HashSet<UndirectedPair>,
    ) -> Path {
        let blocked = self.hazard_index.blocked_edges(self.raster);
        find_path(self.graph, origin, destination, self.cfg.astar, &mut |u, v, predecessor, inserted| {
            if forbidden.contains(&UndirectedPair::new(u, v)) {
                return false;
            }
            if blocked.contains(&UndirectedPair::new(u, v)) {
                self.detour(predecessor, u, v, inserted)
            } else {
                self.turn_check(predecessor, u, v).unwrap_or(true)
            }
        })
    }

    fn turn_check(&self, predecessor: Option<Vector2<f64>>, u: WaypointId, v: WaypointId) -> Result<bool> {
        let Some(predecessor) = predecessor else { return Ok(true) };
        let u_wp = self.graph.waypoint(u).expect("u is a graph edge endpoint");
        let v_wp = self.graph.waypoint(v).expect("v is a graph edge endpoint");
        let cos = turn_angle_cosine(Some(predecessor), Some(u_wp.projected()), Some(v_wp.projected()))?;
        Ok(cos > 0.0)
    }

    /// Synthesizes a detour polyline around the hazard blocking `u -> v`
    /// and, if one is found, lifts its interior pixels into synthetic
    /// waypoints appended to `inserted`.
    fn detour(
        &self,
        predecessor: Option<Vector2<f64>>,
        u: WaypointId,
        v: WaypointId,
        inserted: &mut Vec<SyntheticWaypoint>,
    ) -> bool {
        let u_wp = self.graph.waypoint(u).expect("u is a graph edge endpoint");
        let v_wp = self.graph.waypoint(v).expect("v is a graph edge endpoint");
        let origin_pixel = self.world_file.coordinate_to_pixel(u_wp.projected());
        let destination_pixel = self.world_file.coordinate_to_pixel(v_wp.projected());
        let previous_pixel = predecessor.map(|p| self.world_file.coordinate_to_pixel(p));

        let detour_pixels =
            find_path_with_angle(self.raster, origin_pixel, destination_pixel, previous_pixel, self.cfg.raster);
        if detour_pixels.len() < 2 {
            return false;
        }

        for pixel in &detour_pixels[1..detour_pixels.len() - 1] {
            let projected = self.world_file.pixel_to_coordinate(*pixel);
            let location = merc_to_lonlat(projected);
            inserted.push(SyntheticWaypoint {
                name: SyntheticWaypoint::render_name(location.lon, location.lat),
                lon: location.lon,
                lat: location.lat,
                projected,
            });
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_world_file() -> WorldFile {
        WorldFile { a: 1_000.0, b: 0.0, c: 0.0, d: 0.0, e: 1_000.0, f: 0.0 }
    }

    #[test]
    fn unblocked_route_passes_straight_through() {
        let mut g = AirwayGraph::new();
        g.add_waypoint(1, "A", 0.0, 0.0);
        g.add_waypoint(2, "B", 0.01, 0.0);
        g.add_airway_segment(1, 2).unwrap();

        let wf = identity_world_file();
        let index = HazardIndex::build(&g, &wf);
        let raster = HazardRaster::empty();
        let router = DynamicRouter::new(&g, &wf, &raster, &index, DynamicConfig::default());

        let path = router.find_dynamic_full_path(1, 2, &HashSet::new());
        assert_eq!(path.len(), 2);
        assert!(!path.nodes[1].is_synthetic());
    }

    #[test]
    fn forbidden_segment_is_rejected() {
        let mut g = AirwayGraph::new();
        g.add_waypoint(1, "A", 0.0, 0.0);
        g.add_waypoint(2, "B", 0.01, 0.0);
        g.add_airway_segment(1, 2).unwrap();

        let wf = identity_world_file();
        let index = HazardIndex::build(&g, &wf);
        let raster = HazardRaster::empty();
        let router = DynamicRouter::new(&g, &wf, &raster, &index, DynamicConfig::default());

        let mut forbidden = HashSet::new();
        forbidden.insert(UndirectedPair::new(1, 2));
        let path = router.find_dynamic_full_path(1, 2, &forbidden);
        assert!(path.is_empty());
    }

    #[test]
    fn blocked_segment_detours_through_synthetic_waypoints() {
        let mut g = AirwayGraph::new();
        // At latitude 0, Mercator x is exactly `lon * R`, so this places B at
        // projected x = 40_000m, i.e. pixel column 40 under the 1000m/pixel
        // world file below.
        let lon_b = 40_000.0 / crate::geo::EARTH_RADIUS_M;
        g.add_waypoint(1, "A", 0.0, 0.0);
        g.add_waypoint(2, "B", lon_b, 0.0);
        g.add_airway_segment(1, 2).unwrap();

        let wf = identity_world_file();
        let index = HazardIndex::build(&g, &wf);

        // A hazard strip straddling the direct pixel-space line between the
        // two waypoints (both at pixel row 0, scaled by the world file's
        // 1000 metres/pixel).
        let width = 50;
        let height = 50;
        let mut data = vec![0u8; width * height];
        for y in 0..10 {
            for x in 18..22 {
                data[y * width + x] = 1;
            }
        }
        let raster = HazardRaster::new(width, height, data);

        let router = DynamicRouter::new(&g, &wf, &raster, &index, DynamicConfig::default());
        let path = router.find_dynamic_full_path(1, 2, &HashSet::new());
        assert!(!path.is_empty());
        assert!(path.nodes.iter().any(|n| n.is_synthetic()));
    }
}
