use airways::graph::{AirwayGraph, WorldFile};
use airways::hazard_index::HazardIndex;
use airways::raster::HazardRaster;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn grid_graph(side: i32) -> AirwayGraph {
    let mut g = AirwayGraph::new();
    for row in 0..side {
        for col in 0..side {
            let id = row * side + col;
            g.add_waypoint(id, format!("W{id}"), f64::from(col) * 0.05, f64::from(row) * 0.05);
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

fn bench_build(c: &mut Criterion) {
    let graph = grid_graph(30);
    let world_file = WorldFile { a: 2_000.0, b: 0.0, c: 0.0, d: 0.0, e: 2_000.0, f: 0.0 };

    c.bench_function("hazard_index_build_grid", |b| {
        b.iter(|| {
            let index = HazardIndex::build(black_box(&graph), black_box(&world_file));
            black_box(index);
        });
    });
}

fn bench_blocked_edges(c: &mut Criterion) {
    let graph = grid_graph(30);
    let world_file = WorldFile { a: 2_000.0, b: 0.0, c: 0.0, d: 0.0, e: 2_000.0, f: 0.0 };
    let index = HazardIndex::build(&graph, &world_file);

    let width = 3_000;
    let height = 3_000;
    let mut data = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            if (x / 10 + y / 10) % 7 == 0 {
                data[y * width + x] = 1;
            }
        }
    }
    let raster = HazardRaster::new(width, height, data);

    c.bench_function("hazard_index_blocked_edges_sparse_hazard", |b| {
        b.iter(|| {
            let blocked = index.blocked_edges(black_box(&raster));
            black_box(blocked);
        });
    });
}

criterion_group!(benches, bench_build, bench_blocked_edges);
criterion_main!(benches);
