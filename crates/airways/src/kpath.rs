//! Yen's k-shortest-paths algorithm, layered over any search that accepts a
//! forbidden-edge set — the bare graph A* or the dynamic orchestrator.
//!
//! Why this design
//! - Spur paths are produced by re-running the underlying search with a
//!   forbidden-edge set, never by mutating the graph and restoring it
//!   afterward. This keeps the algorithm correct under concurrent searches
//!   and avoids a whole class of "forgot to restore an edge" bugs.

use std::collections::{BinaryHeap, HashSet};

use crate::graph::{AirwayGraph, Path, PathNode, UndirectedPair, WaypointId};
use crate::util::MinScored;

fn nodes_match(a: &PathNode, b: &PathNode) -> bool {
    match (a, b) {
        (PathNode::Registered(x), PathNode::Registered(y)) => x == y,
        (PathNode::Synthetic(x), PathNode::Synthetic(y)) => {
            (x.lon - y.lon).abs() < 1e-12 && (x.lat - y.lat).abs() < 1e-12
        }
        _ => false,
    }
}

fn shares_root(path: &Path, root: &[PathNode]) -> bool {
    path.len() > root.len() && path.nodes[..root.len()].iter().zip(root).all(|(a, b)| nodes_match(a, b))
}

/// Finds up to `k` paths from `origin` to `destination` in increasing
/// order of length, using `search` to run each underlying shortest-path
/// query against a forbidden-edge set. `graph` is used only to enumerate
/// edges incident to root-path waypoints, so spur searches can't loop back
/// through the already-fixed root.
///
/// Returns fewer than `k` paths if the graph doesn't have that many
/// distinct simple-in-structure routes.
pub fn find_k_shortest_paths(
    graph: &AirwayGraph,
    origin: WaypointId,
    destination: WaypointId,
    k: usize,
    mut search: impl FnMut(WaypointId, WaypointId, &HashSet<UndirectedPair>) -> Path,
) -> Vec<Path> {
    let mut found: Vec<Path> = Vec::new();
    let first = search(origin, destination, &HashSet::new());
    if first.is_empty() || k == 0 {
        return found;
    }
    found.push(first);

    let mut candidates: BinaryHeap<MinScored<Path>> = BinaryHeap::new();

    while found.len() < k {
        let previous = found.last().unwrap().clone();
        for i in 0..previous.len().saturating_sub(1) {
            let spur_node = previous.nodes[i].id();
            let root = previous.prefix(i + 1);

            let mut forbidden_edges: HashSet<UndirectedPair> = HashSet::new();
            for accepted in &found {
                if shares_root(accepted, &root.nodes) {
                    let u = accepted.nodes[i].id();
                    let v = accepted.nodes[i + 1].id();
                    forbidden_edges.insert(UndirectedPair::new(u, v));
                }
            }
            for node in &root.nodes[..i] {
                if let PathNode::Registered(id) = node {
                    for edge in graph.neighbors(*id) {
                        forbidden_edges.insert(UndirectedPair::new(*id, edge.target));
                    }
                }
            }

            let spur = search(spur_node, destination, &forbidden_edges);
            if spur.is_empty() {
                continue;
            }
            let Ok(total) = root.concat(&spur) else { continue };
            if found.iter().any(|p| same_route(p, &total)) {
                continue;
            }
            if candidates.iter().any(|MinScored(_, p)| same_route(p, &total)) {
                continue;
            }
            candidates.push(MinScored(total.total_length(), total));
        }

        let Some(MinScored(_, next)) = candidates.pop() else { break };
        found.push(next);
    }

    found
}

fn same_route(a: &Path, b: &Path) -> bool {
    a.len() == b.len() && a.nodes.iter().zip(&b.nodes).all(|(x, y)| nodes_match(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{find_path, AStarConfig};

    fn diamond_graph() -> AirwayGraph {
        let mut g = AirwayGraph::new();
        g.add_waypoint(1, "A", 0.0, 0.0);
        g.add_waypoint(2, "B", 0.01, 0.01);
        g.add_waypoint(3, "C", 0.01, -0.01);
        g.add_waypoint(4, "D", 0.02, 0.0);
        g.add_airway_segment(1, 2).unwrap();
        g.add_airway_segment(1, 3).unwrap();
        g.add_airway_segment(2, 4).unwrap();
        g.add_airway_segment(3, 4).unwrap();
        g
    }

    #[test]
    fn finds_two_distinct_paths_through_a_diamond() {
        let g = diamond_graph();
        let paths = find_k_shortest_paths(&g, 1, 4, 2, |origin, destination, forbidden| {
            find_path(&g, origin, destination, AStarConfig::default(), &mut |u, v, _, _| {
                !forbidden.contains(&UndirectedPair::new(u, v))
            })
        });
        assert_eq!(paths.len(), 2);
        assert!(paths[0].total_length() <= paths[1].total_length());
        assert!(!same_route(&paths[0], &paths[1]));
    }

    #[test]
    fn stops_early_when_no_more_routes_exist() {
        let g = diamond_graph();
        let paths = find_k_shortest_paths(&g, 1, 4, 10, |origin, destination, forbidden| {
            find_path(&g, origin, destination, AStarConfig::default(), &mut |u, v, _, _| {
                !forbidden.contains(&UndirectedPair::new(u, v))
            })
        });
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn no_path_yields_empty_result() {
        let mut g = AirwayGraph::new();
        g.add_waypoint(1, "A", 0.0, 0.0);
        g.add_waypoint(2, "B", 0.01, 0.0);
        let paths = find_k_shortest_paths(&g, 1, 2, 3, |origin, destination, forbidden| {
            find_path(&g, origin, destination, AStarConfig::default(), &mut |u, v, _, _| {
                !forbidden.contains(&UndirectedPair::new(u, v))
            })
        });
        assert!(paths.is_empty());
    }
}
