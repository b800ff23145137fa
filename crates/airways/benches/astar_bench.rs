use airways::graph::{find_path, AStarConfig, AirwayGraph};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A grid graph: `side * side` waypoints, each connected to its 4
/// orthogonal neighbors, roughly a degree-4 lattice of the kind a regional
/// airway network forms around a hub.
fn grid_graph(side: i32) -> AirwayGraph {
    let mut g = AirwayGraph::new();
    for row in 0..side {
        for col in 0..side {
            let id = row * side + col;
            let lon = f64::from(col) * 0.05;
            let lat = f64::from(row) * 0.05;
            g.add_waypoint(id, format!("W{id}"), lon, lat);
        }
    }
    for row in 0..side {
        for col in 0..side {
            let id = row * side + col;
            if col + 1 < side {
                g.add_airway_segment(id, id + 1).unwrap();
            }
            if row + 1 < side {
                g.add_airway_segment(id, id + side).unwrap();
            }
        }
    }
    g
}

fn bench_astar(c: &mut Criterion) {
    let side = 30;
    let graph = grid_graph(side);
    let origin = 0;
    let destination = side * side - 1;

    c.bench_function("astar_grid_corner_to_corner", |b| {
        b.iter(|| {
            let path = find_path(
                black_box(&graph),
                black_box(origin),
                black_box(destination),
                AStarConfig::default(),
                &mut |_, _, _, _| true,
            );
            black_box(path);
        });
    });
}

criterion_group!(benches, bench_astar);
criterion_main!(benches);
