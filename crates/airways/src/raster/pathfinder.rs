//! Layered geometric A* that routes a detour polyline around a hazard mask.
//!
//! Purpose
//! - Given two pixels with a hazardous run between them, synthesize a
//!   detour polyline that avoids every hazardous pixel and respects a
//!   turn-angle gate.
//!
//! Why this design
//! - The candidate graph is a DAG of consecutive "levels" (origin, N-1
//!   interior candidate sets, destination); a priority queue keyed by
//!   `actual + heuristic` still applies, just over a small bounded node set.
//! - Failure is represented solely by an empty output sequence — the
//!   pathfinder never raises (spec: raster pathfinder has no hard errors).

use std::collections::BinaryHeap;

use super::geom::{bresenham_line, perpendicular_equant_lines, Pixel};
use super::hazard::HazardRaster;
use crate::util::MinScored;

/// Tunables for the raster pathfinder. The 0.9 heuristic factor keeps the
/// A* heuristic admissible (consistent with the true Euclidean cost); the
/// 0.5 radius factor and segment count of 3 are the detour-shape defaults.
#[derive(Debug, Clone, Copy)]
pub struct RasterPathConfig {
    /// Number of segments `N`; there are `N - 1` interior candidate levels.
    pub segment_count: i32,
    /// Fraction of the direct origin-destination distance used as the
    /// transverse line radius.
    pub radius_factor: f64,
    /// Scalar applied to the Euclidean heuristic (must stay <= 1 to remain
    /// admissible).
    pub heuristic_factor: f64,
}

impl Default for RasterPathConfig {
    fn default() -> Self { Self { segment_count: 3, radius_factor: 0.5, heuristic_factor: 0.9 } }
}

#[derive(Debug, Clone, Copy)]
struct NodeRef {
    level: usize,
    idx: usize,
}

struct NodeInfo {
    pixel: Pixel,
    distance: f64,
    heuristic: f64,
    previous: Option<NodeRef>,
}

/// Builds the candidate levels between `origin` and `destination`: the
/// hazardous sub-run of the direct Bresenham segment is replaced by `N - 1`
/// perpendicular candidate sets, each pruned of hazardous pixels.
///
/// Returns `None` if the direct segment has no hazard (the caller should not
/// have invoked the raster pathfinder in that case).
fn build_candidate_levels(
    raster: &HazardRaster,
    origin: Pixel,
    destination: Pixel,
    cfg: RasterPathConfig,
) -> Option<Vec<Vec<Pixel>>> {
    let direct = bresenham_line(origin, destination);
    let mut head = 0usize;
    while head < direct.len() && !raster.is_hazardous(direct[head]) {
        head += 1;
    }
    let mut tail = direct.len().wrapping_sub(1);
    while tail < direct.len() && !raster.is_hazardous(direct[tail]) {
        if tail == 0 {
            tail = usize::MAX;
            break;
        }
        tail -= 1;
    }
    if tail == usize::MAX || head >= tail {
        return None;
    }

    let direct_distance = origin.distance(destination);
    let radius = direct_distance * cfg.radius_factor;
    let mut levels = perpendicular_equant_lines(direct[head], direct[tail], cfg.segment_count, radius);
    for level in &mut levels {
        level.retain(|p| !raster.is_hazardous(*p));
    }
    Some(levels)
}

/// Runs the layered A* over `levels` (level 0 is `[origin]`, the last level
/// is `[destination]`), accepting an edge `(u, v)` iff `admissible` returns
/// true for it given `u`'s stored predecessor pixel, and the Bresenham line
/// from `u` to `v` has no hazardous pixel.
fn run_layered_astar(
    raster: &HazardRaster,
    levels: &[Vec<Pixel>],
    destination: Pixel,
    cfg: RasterPathConfig,
    mut admissible: impl FnMut(Pixel, Pixel, Option<Pixel>) -> bool,
) -> Vec<Pixel> {
    let mut infos: Vec<Vec<NodeInfo>> = levels
        .iter()
        .map(|level| {
            level
                .iter()
                .map(|&pixel| NodeInfo {
                    pixel,
                    distance: f64::INFINITY,
                    heuristic: pixel.distance(destination) * cfg.heuristic_factor,
                    previous: None,
                })
                .collect()
        })
        .collect();
    infos[0][0].distance = 0.0;

    let last_level = infos.len() - 1;
    let mut queue = BinaryHeap::new();
    queue.push(MinScored(infos[0][0].heuristic, NodeRef { level: 0, idx: 0 }));

    while let Some(MinScored(_, current)) = queue.pop() {
        if current.level == last_level {
            break;
        }
        let (current_pixel, current_distance, current_prev_pixel) = {
            let info = &infos[current.level][current.idx];
            (info.pixel, info.distance, info.previous.map(|p| infos[p.level][p.idx].pixel))
        };
        let next_level = current.level + 1;
        for idx in 0..infos[next_level].len() {
            let candidate_pixel = infos[next_level][idx].pixel;
            if !admissible(current_pixel, candidate_pixel, current_prev_pixel) {
                continue;
            }
            if bresenham_line(current_pixel, candidate_pixel).iter().any(|p| raster.is_hazardous(*p)) {
                continue;
            }
            let through = current_distance + current_pixel.distance(candidate_pixel);
            if through < infos[next_level][idx].distance {
                infos[next_level][idx].distance = through;
                infos[next_level][idx].previous = Some(NodeRef { level: current.level, idx: current.idx });
                let key = through + infos[next_level][idx].heuristic;
                queue.push(MinScored(key, NodeRef { level: next_level, idx }));
            }
        }
    }

    if infos[last_level][0].previous.is_none() {
        return Vec::new();
    }
    let mut path = Vec::new();
    let mut cursor = Some(NodeRef { level: last_level, idx: 0 });
    while let Some(node) = cursor {
        let info = &infos[node.level][node.idx];
        path.push(info.pixel);
        cursor = info.previous;
    }
    path.reverse();
    path
}

/// Cosine of the turn angle at `current` in pixel space.
fn pixel_turn_cosine(previous: Pixel, current: Pixel, next: Pixel) -> f64 {
    let pc = (f64::from(current.x - previous.x), f64::from(current.y - previous.y));
    let cn = (f64::from(next.x - current.x), f64::from(next.y - current.y));
    let dot = pc.0 * cn.0 + pc.1 * cn.1;
    let norm = (pc.0 * pc.0 + pc.1 * pc.1).sqrt() * (cn.0 * cn.0 + cn.1 * cn.1).sqrt();
    dot / norm
}

/// Computes a detour polyline from `origin` to `destination` avoiding every
/// hazardous pixel, gated by a turn-angle constraint: at `origin`, the
/// cosine of `previous_origin -> origin -> next` must exceed zero (unless
/// `previous_origin` is `None`, disabling the check there); at every
/// interior node, `previous -> current -> next` must exceed zero.
///
/// Returns an empty sequence if no detour is found (including when the
/// direct segment between `origin` and `destination` has no hazard at all —
/// callers should not invoke this pathfinder in that case).
#[must_use]
pub fn find_path_with_angle(
    raster: &HazardRaster,
    origin: Pixel,
    destination: Pixel,
    previous_origin: Option<Pixel>,
    cfg: RasterPathConfig,
) -> Vec<Pixel> {
    let Some(candidate_levels) = build_candidate_levels(raster, origin, destination, cfg) else {
        return Vec::new();
    };

    let mut levels = Vec::with_capacity(candidate_levels.len() + 2);
    levels.push(vec![origin]);
    levels.extend(candidate_levels);
    levels.push(vec![destination]);

    run_layered_astar(raster, &levels, destination, cfg, move |current, next, maybe_previous| {
        match maybe_previous {
            None => match previous_origin {
                None => true,
                Some(prev) => pixel_turn_cosine(prev, current, next) > 0.0,
            },
            Some(previous) => pixel_turn_cosine(previous, current, next) > 0.0,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor_raster(width: usize, height: usize, blocked: impl Fn(i32, i32) -> bool) -> HazardRaster {
        let mut data = vec![0u8; width * height];
        for y in 0..height {
            for x in 0..width {
                if blocked(x as i32, y as i32) {
                    data[y * width + x] = 1;
                }
            }
        }
        HazardRaster::new(width, height, data)
    }

    #[test]
    fn routes_around_a_thin_hazard_strip() {
        // A vertical hazard strip crossing the direct horizontal line y=10
        // at more than one column, so the direct segment has a genuine
        // multi-pixel hazardous run rather than a single touching pixel.
        let raster = corridor_raster(40, 40, |x, y| (19..=21).contains(&x) && (5..=15).contains(&y));
        let origin = Pixel::new(0, 10);
        let destination = Pixel::new(39, 10);
        let path = find_path_with_angle(&raster, origin, destination, None, RasterPathConfig::default());
        assert!(!path.is_empty());
        assert_eq!(*path.first().unwrap(), origin);
        assert_eq!(*path.last().unwrap(), destination);
        for window in path.windows(2) {
            for p in bresenham_line(window[0], window[1]) {
                assert!(!raster.is_hazardous(p), "path crosses hazard at {p:?}");
            }
        }
    }

    #[test]
    fn fully_blocked_corridor_yields_empty_path() {
        let raster = corridor_raster(40, 60, |x, _y| (15..=25).contains(&x));
        let origin = Pixel::new(0, 30);
        let destination = Pixel::new(39, 30);
        let path = find_path_with_angle(&raster, origin, destination, None, RasterPathConfig::default());
        assert!(path.is_empty());
    }

    #[test]
    fn unobstructed_segment_yields_empty_path() {
        let raster = HazardRaster::new(10, 10, vec![0; 100]);
        let path = find_path_with_angle(&raster, Pixel::new(0, 0), Pixel::new(9, 9), None, RasterPathConfig::default());
        assert!(path.is_empty());
    }
}
