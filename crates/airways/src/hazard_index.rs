//! Pixel -> airway-segment index, used to find which segments a hazard
//! raster update has blocked without walking the whole graph.
//!
//! Why this design
//! - Every undirected segment is rasterized once (its Bresenham line, in
//!   pixel space) and each pixel it touches records the segment. A raster
//!   update then only needs to scan its own hazardous pixels and union the
//!   segment sets recorded there, rather than re-rasterize every segment in
//!   the graph on every update.

use std::collections::{HashMap, HashSet};

use super::graph::{AirwayGraph, UndirectedPair, WorldFile};
use super::raster::{bresenham_line, HazardRaster, Pixel};

/// Maps a raster pixel to the undirected segments whose rasterized line
/// crosses it.
#[derive(Debug, Clone, Default)]
pub struct HazardIndex {
    index: HashMap<Pixel, Vec<UndirectedPair>>,
}

impl HazardIndex {
    /// Rasterizes every segment currently in `graph`.
    #[must_use]
    pub fn build(graph: &AirwayGraph, world_file: &WorldFile) -> Self {
        let mut index: HashMap<Pixel, Vec<UndirectedPair>> = HashMap::new();
        for pair in graph.undirected_edges() {
            index_edge(graph, world_file, pair, &mut index);
        }
        Self { index }
    }

    /// Rasterizes a single newly-added segment into the existing index,
    /// without re-rasterizing the rest of the graph.
    pub fn index_segment(&mut self, graph: &AirwayGraph, world_file: &WorldFile, pair: UndirectedPair) {
        index_edge(graph, world_file, pair, &mut self.index);
    }

    /// The segments blocked by `raster`: the union, over every hazardous
    /// pixel, of the segments recorded at that pixel.
    #[must_use]
    pub fn blocked_edges(&self, raster: &HazardRaster) -> HashSet<UndirectedPair> {
        let mut blocked = HashSet::new();
        for pixel in raster.hazardous_pixels() {
            if let Some(pairs) = self.index.get(&pixel) {
                blocked.extend(pairs.iter().copied());
            }
        }
        blocked
    }
}

fn index_edge(
    graph: &AirwayGraph,
    world_file: &WorldFile,
    pair: UndirectedPair,
    index: &mut HashMap<Pixel, Vec<UndirectedPair>>,
) {
    let (a, b) = pair.endpoints();
    let (Some(wa), Some(wb)) = (graph.waypoint(a), graph.waypoint(b)) else { return };
    let pa = world_file.coordinate_to_pixel(wa.projected());
    let pb = world_file.coordinate_to_pixel(wb.projected());
    for pixel in bresenham_line(pa, pb) {
        index.entry(pixel).or_default().push(pair);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_world_file() -> WorldFile {
        WorldFile { a: 1.0, b: 0.0, c: 0.0, d: 0.0, e: 1.0, f: 0.0 }
    }

    /// With `identity_world_file`'s 1 metre/pixel scale, a waypoint at this
    /// longitude (and latitude 0, where Mercator x is exactly `lon * R`)
    /// projects to pixel column `pixel_x`.
    fn lon_for_pixel_x(pixel_x: f64) -> f64 { pixel_x / crate::geo::EARTH_RADIUS_M }

    #[test]
    fn blocked_edges_finds_segment_crossing_a_hazard() {
        let mut g = AirwayGraph::new();
        g.add_waypoint(1, "A", 0.0, 0.0);
        g.add_waypoint(2, "B", lon_for_pixel_x(10.0), 0.0);
        g.add_airway_segment(1, 2).unwrap();

        let wf = identity_world_file();
        let index = HazardIndex::build(&g, &wf);

        let mut data = vec![0u8; 20 * 5];
        data[5] = 1;
        let raster = HazardRaster::new(20, 5, data);

        let blocked = index.blocked_edges(&raster);
        assert_eq!(blocked.len(), 1);
        assert!(blocked.contains(&UndirectedPair::new(1, 2)));
    }

    #[test]
    fn unrelated_hazard_blocks_nothing() {
        let mut g = AirwayGraph::new();
        g.add_waypoint(1, "A", 0.0, 0.0);
        g.add_waypoint(2, "B", lon_for_pixel_x(10.0), 0.0);
        g.add_airway_segment(1, 2).unwrap();

        let wf = identity_world_file();
        let index = HazardIndex::build(&g, &wf);

        let mut data = vec![0u8; 20 * 20];
        data[19 * 20 + 19] = 1;
        let raster = HazardRaster::new(20, 20, data);

        assert!(index.blocked_edges(&raster).is_empty());
    }
}
