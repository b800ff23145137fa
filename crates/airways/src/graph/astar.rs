//! Topological A* over the airway graph.
//!
//! Purpose
//! - Find a least-cost path between two registered waypoints, where
//!   "cost" and "which edges exist" are both mediated by a caller-supplied
//!   predicate rather than fixed at the graph level.
//!
//! Why this design
//! - The predicate is handed the projected coordinate of the edge source's
//!   predecessor (if any) so it can run a turn-angle gate, and an output
//!   slot it may fill with synthetic waypoints to splice a detour into the
//!   path. This lets the dynamic orchestrator reuse this search unchanged:
//!   it is the one place that ever returns `false` or inserts anything.
//! - Per-search scratch state (tentative distance, predecessor) lives in a
//!   side-table keyed by a search-local node handle, never on `Waypoint`
//!   itself, so two searches over the same graph can run without
//!   interfering with each other. The handle resolves to a plain
//!   coordinate rather than a borrowed waypoint, so the table holding
//!   inserted synthetic waypoints can keep growing while a lookup from an
//!   earlier iteration is still in scope.

use std::collections::{HashMap, HashSet};

use nalgebra::Vector2;

use super::types::{Path, PathNode, SyntheticWaypoint, WaypointId};
use super::AirwayGraph;
use crate::geo::{great_circle_distance, LonLat};
use crate::util::MinScored;

/// Tunable for the A* heuristic. 0.9 keeps `heuristic_factor * great-circle`
/// an underestimate of the true remaining airway distance, since airway
/// routes never beat the great-circle bound between two points.
#[derive(Debug, Clone, Copy)]
pub struct AStarConfig {
    pub heuristic_factor: f64,
}

impl Default for AStarConfig {
    fn default() -> Self { Self { heuristic_factor: 0.9 } }
}

/// A node visited during one search: a registered waypoint, or a synthetic
/// waypoint spliced in by the predicate, indexed into this search's private
/// arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SearchNode {
    Registered(WaypointId),
    Synthetic(usize),
}

struct NodeInfo {
    actual_distance: f64,
    predecessor: Option<SearchNode>,
}

fn projected_of(node: SearchNode, graph: &AirwayGraph, arena: &[SyntheticWaypoint]) -> Vector2<f64> {
    match node {
        SearchNode::Registered(id) => {
            graph.waypoint(id).expect("predecessor must be a registered waypoint").projected()
        }
        SearchNode::Synthetic(idx) => arena[idx].projected,
    }
}

/// Runs the search. The predicate is called once per candidate edge
/// `(u, v)` with the projected coordinate of `u`'s predecessor (`None` at
/// the origin) and a mutable `inserted` slot; returning `false` rejects the
/// edge outright, and a non-empty `inserted` splices those waypoints
/// between `u` and `v` in the resulting path.
///
/// Returns an empty [`Path`] if `origin` or `destination` are not
/// registered, or if no path satisfying every predicate call exists.
pub fn find_path(
    graph: &AirwayGraph,
    origin: WaypointId,
    destination: WaypointId,
    cfg: AStarConfig,
    predicate: &mut dyn FnMut(WaypointId, WaypointId, Option<Vector2<f64>>, &mut Vec<SyntheticWaypoint>) -> bool,
) -> Path {
    let (Some(_origin_wp), Some(dest_wp)) = (graph.waypoint(origin), graph.waypoint(destination)) else {
        return Path::empty();
    };
    let dest_location = dest_wp.location();
    let heuristic = |id: WaypointId| {
        cfg.heuristic_factor * great_circle_distance(graph.waypoint(id).unwrap().location(), dest_location)
    };

    let mut info: HashMap<SearchNode, NodeInfo> = HashMap::new();
    let mut synthetic_arena: Vec<SyntheticWaypoint> = Vec::new();
    let mut synthetic_predecessor: Vec<SearchNode> = Vec::new();
    let mut synthetic_distance: Vec<f64> = Vec::new();
    let mut closed: HashSet<WaypointId> = HashSet::new();
    let mut heap = std::collections::BinaryHeap::new();

    let origin_node = SearchNode::Registered(origin);
    info.insert(origin_node, NodeInfo { actual_distance: 0.0, predecessor: None });
    heap.push(MinScored(heuristic(origin), origin_node));

    while let Some(MinScored(_, current)) = heap.pop() {
        let SearchNode::Registered(current_id) = current else { continue };
        if current_id == destination {
            break;
        }
        if !closed.insert(current_id) {
            continue;
        }
        let current_actual = info[&current].actual_distance;
        let current_predecessor =
            info[&current].predecessor.map(|p| projected_of(p, graph, &synthetic_arena));
        let u_location = graph.waypoint(current_id).unwrap().location();

        for edge in graph.neighbors(current_id) {
            let v = edge.target;
            let mut inserted = Vec::new();
            if !predicate(current_id, v, current_predecessor, &mut inserted) {
                continue;
            }

            let had_insertions = !inserted.is_empty();
            let mut predecessor = current;
            let mut prev_location = u_location;
            let mut running = current_actual;
            for w in inserted {
                let w_location = LonLat::new(w.lon, w.lat);
                running += great_circle_distance(prev_location, w_location);
                prev_location = w_location;
                synthetic_arena.push(w);
                synthetic_predecessor.push(predecessor);
                synthetic_distance.push(running);
                predecessor = SearchNode::Synthetic(synthetic_arena.len() - 1);
            }
            let v_location = graph.waypoint(v).unwrap().location();
            let final_leg =
                if had_insertions { great_circle_distance(prev_location, v_location) } else { edge.distance };
            let through = running + final_leg;

            let v_node = SearchNode::Registered(v);
            let improves = info.get(&v_node).map_or(true, |i| through < i.actual_distance);
            if improves {
                info.insert(v_node, NodeInfo { actual_distance: through, predecessor: Some(predecessor) });
                heap.push(MinScored(through + heuristic(v), v_node));
            }
        }
    }

    if !info.contains_key(&SearchNode::Registered(destination)) {
        return Path::empty();
    }

    let mut chain = Vec::new();
    let mut cursor = Some(SearchNode::Registered(destination));
    while let Some(node) = cursor {
        chain.push(node);
        cursor = match node {
            SearchNode::Registered(_) => info.get(&node).and_then(|i| i.predecessor),
            SearchNode::Synthetic(idx) => Some(synthetic_predecessor[idx]),
        };
    }
    chain.reverse();

    let nodes = chain
        .iter()
        .map(|&n| match n {
            SearchNode::Registered(id) => PathNode::Registered(id),
            SearchNode::Synthetic(idx) => PathNode::Synthetic(synthetic_arena[idx].clone()),
        })
        .collect();
    let cumulative_distances = chain
        .iter()
        .map(|&n| match n {
            SearchNode::Registered(_) => info[&n].actual_distance,
            SearchNode::Synthetic(idx) => synthetic_distance[idx],
        })
        .collect();
    Path { nodes, cumulative_distances }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AirwayGraph;

    fn line_graph() -> AirwayGraph {
        let mut g = AirwayGraph::new();
        g.add_waypoint(1, "A", 0.0, 0.0);
        g.add_waypoint(2, "B", 0.01, 0.0);
        g.add_waypoint(3, "C", 0.02, 0.0);
        g.add_airway_segment(1, 2).unwrap();
        g.add_airway_segment(2, 3).unwrap();
        g
    }

    #[test]
    fn finds_shortest_path_through_intermediate_waypoint() {
        let g = line_graph();
        let path = find_path(&g, 1, 3, AStarConfig::default(), &mut |_, _, _, _| true);
        assert_eq!(path.nodes.iter().map(PathNode::id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(path.total_length() > 0.0);
    }

    #[test]
    fn rejecting_predicate_yields_empty_path() {
        let g = line_graph();
        let path = find_path(&g, 1, 3, AStarConfig::default(), &mut |_, _, _, _| false);
        assert!(path.is_empty());
    }

    #[test]
    fn origin_equals_destination_is_a_single_node_path() {
        let g = line_graph();
        let path = find_path(&g, 1, 1, AStarConfig::default(), &mut |_, _, _, _| true);
        assert_eq!(path.len(), 1);
        assert_eq!(path.total_length(), 0.0);
    }

    #[test]
    fn unregistered_endpoint_yields_empty_path() {
        let g = line_graph();
        let path = find_path(&g, 1, 999, AStarConfig::default(), &mut |_, _, _, _| true);
        assert!(path.is_empty());
    }

    #[test]
    fn predicate_can_splice_synthetic_waypoints() {
        let g = line_graph();
        let path = find_path(&g, 1, 2, AStarConfig::default(), &mut |_, _, _, inserted| {
            inserted.push(SyntheticWaypoint {
                name: "DETOUR".to_string(),
                lon: 0.005,
                lat: 0.001,
                projected: Vector2::new(500.0, 100.0),
            });
            true
        });
        assert_eq!(path.len(), 3);
        assert!(path.nodes[1].is_synthetic());
    }

    #[test]
    fn synthetic_leg_cost_uses_great_circle_not_planar_distance() {
        let g = line_graph();
        let synthetic_lon = 0.005;
        let synthetic_lat = 0.001;
        let path = find_path(&g, 1, 2, AStarConfig::default(), &mut |_, _, _, inserted| {
            inserted.push(SyntheticWaypoint {
                name: "DETOUR".to_string(),
                lon: synthetic_lon,
                lat: synthetic_lat,
                // Deliberately far from where this lon/lat actually projects,
                // so a cost computed from this field instead of lon/lat
                // would disagree with `expected` below.
                projected: Vector2::new(1.0e9, 1.0e9),
            });
            true
        });
        let a_location = g.waypoint(1).unwrap().location();
        let b_location = g.waypoint(2).unwrap().location();
        let w_location = LonLat::new(synthetic_lon, synthetic_lat);
        let expected = great_circle_distance(a_location, w_location) + great_circle_distance(w_location, b_location);
        assert!((path.total_length() - expected).abs() < 1e-6, "total={}, expected={expected}", path.total_length());
    }

    #[test]
    fn predecessor_coordinate_is_passed_to_the_predicate() {
        let g = line_graph();
        let mut saw_predecessor_at_second_hop = false;
        let path = find_path(&g, 1, 3, AStarConfig::default(), &mut |u, _, predecessor, _| {
            if u == 2 {
                saw_predecessor_at_second_hop = predecessor.is_some();
            }
            true
        });
        assert!(!path.is_empty());
        assert!(saw_predecessor_at_second_hop);
    }
}
