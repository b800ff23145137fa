use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use airways::graph::{find_path, AStarConfig, AirwayGraph, Path, PathNode, UndirectedPair, WaypointId, WorldFile};
use airways::hazard_index::HazardIndex;
use airways::kpath::find_k_shortest_paths;
use airways::orchestrator::{DynamicConfig, DynamicRouter};
use airways::raster::HazardRaster;

#[derive(Parser)]
#[command(name = "airways")]
#[command(about = "Deviation-routing engine over a persisted airway graph")]
struct Cli {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Static topological search: no hazard raster, no detours.
    FindPath {
        #[arg(long)]
        graph: PathBuf,
        #[arg(long)]
        origin: WaypointId,
        #[arg(long)]
        dest: WaypointId,
    },
    /// Full orchestrated search: unblocked segments pass a turn-angle gate,
    /// blocked segments are routed around via a raster detour.
    FindDynamic {
        #[arg(long)]
        graph: PathBuf,
        #[arg(long = "world-file")]
        world_file: PathBuf,
        #[arg(long)]
        raster: PathBuf,
        #[arg(long)]
        origin: WaypointId,
        #[arg(long)]
        dest: WaypointId,
    },
    /// Yen's k-shortest-paths loop over the full orchestrated search.
    FindK {
        #[arg(long)]
        graph: PathBuf,
        #[arg(long = "world-file")]
        world_file: PathBuf,
        #[arg(long)]
        raster: PathBuf,
        #[arg(long)]
        origin: WaypointId,
        #[arg(long)]
        dest: WaypointId,
        #[arg(long, default_value_t = 3)]
        k: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let cli = Cli::parse();
    match cli.action {
        Action::FindPath { graph, origin, dest } => find_path_cmd(graph, origin, dest),
        Action::FindDynamic { graph, world_file, raster, origin, dest } => {
            find_dynamic_cmd(graph, world_file, raster, origin, dest)
        }
        Action::FindK { graph, world_file, raster, origin, dest, k } => {
            find_k_cmd(graph, world_file, raster, origin, dest, k)
        }
    }
}

fn load_graph(path: &PathBuf) -> Result<AirwayGraph> {
    let file = File::open(path).with_context(|| format!("opening graph file {}", path.display()))?;
    AirwayGraph::load_from_file(BufReader::new(file)).with_context(|| format!("loading graph {}", path.display()))
}

fn load_world_file(path: &PathBuf) -> Result<WorldFile> {
    let file = File::open(path).with_context(|| format!("opening world file {}", path.display()))?;
    WorldFile::parse(BufReader::new(file)).with_context(|| format!("parsing world file {}", path.display()))
}

/// Loads a hazard raster from a plain-text grid: a `width height` header
/// line followed by `height` lines of `width` `0`/`1` characters. Decoding
/// an actual radar image format is out of scope for this crate.
fn load_raster(path: &PathBuf) -> Result<HazardRaster> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading raster {}", path.display()))?;
    let mut lines = text.lines();
    let header = lines.next().context("raster file is empty")?;
    let mut dims = header.split_whitespace();
    let width: usize = dims.next().context("missing raster width")?.parse()?;
    let height: usize = dims.next().context("missing raster height")?.parse()?;

    let mut data = vec![0u8; width * height];
    for (row, line) in lines.enumerate().take(height) {
        for (col, ch) in line.chars().enumerate().take(width) {
            if ch != '0' {
                data[row * width + col] = 1;
            }
        }
    }
    Ok(HazardRaster::new(width, height, data))
}

#[derive(Serialize)]
struct PathReport {
    waypoints: Vec<serde_json::Value>,
    total_length_m: f64,
    turn_angle_sum_rad: Option<f64>,
}

fn report_path(graph: &AirwayGraph, path: &Path) -> PathReport {
    let waypoints = path
        .nodes
        .iter()
        .map(|node| match node {
            PathNode::Registered(id) => serde_json::json!({ "id": id }),
            PathNode::Synthetic(w) => serde_json::json!({
                "synthetic": true,
                "name": w.name,
                "lon": w.lon,
                "lat": w.lat,
            }),
        })
        .collect();
    PathReport {
        waypoints,
        total_length_m: path.total_length(),
        turn_angle_sum_rad: path.total_turn_angle_radians(graph).ok(),
    }
}

fn find_path_cmd(graph_path: PathBuf, origin: WaypointId, dest: WaypointId) -> Result<()> {
    let graph = load_graph(&graph_path)?;
    tracing::info!(origin, dest, "find-path");
    let path = find_path(&graph, origin, dest, AStarConfig::default(), &mut |_, _, _, _| true);
    println!("{}", serde_json::to_string_pretty(&report_path(&graph, &path))?);
    Ok(())
}

fn find_dynamic_cmd(
    graph_path: PathBuf,
    world_file_path: PathBuf,
    raster_path: PathBuf,
    origin: WaypointId,
    dest: WaypointId,
) -> Result<()> {
    let graph = load_graph(&graph_path)?;
    let world_file = load_world_file(&world_file_path)?;
    let raster = load_raster(&raster_path)?;
    tracing::info!(origin, dest, "find-dynamic");

    let hazard_index = HazardIndex::build(&graph, &world_file);
    let router = DynamicRouter::new(&graph, &world_file, &raster, &hazard_index, DynamicConfig::default());
    let path = router.find_dynamic_full_path(origin, dest, &HashSet::new());
    println!("{}", serde_json::to_string_pretty(&report_path(&graph, &path))?);
    Ok(())
}

fn find_k_cmd(
    graph_path: PathBuf,
    world_file_path: PathBuf,
    raster_path: PathBuf,
    origin: WaypointId,
    dest: WaypointId,
    k: usize,
) -> Result<()> {
    let graph = load_graph(&graph_path)?;
    let world_file = load_world_file(&world_file_path)?;
    let raster = load_raster(&raster_path)?;
    tracing::info!(origin, dest, k, "find-k");

    let hazard_index = HazardIndex::build(&graph, &world_file);
    let router = DynamicRouter::new(&graph, &world_file, &raster, &hazard_index, DynamicConfig::default());

    let paths = find_k_shortest_paths(&graph, origin, dest, k, |o, d, forbidden: &HashSet<UndirectedPair>| {
        router.find_dynamic_full_path(o, d, forbidden)
    });
    tracing::info!(found = paths.len(), "find-k complete");

    let reports: Vec<_> = paths.iter().map(|p| report_path(&graph, p)).collect();
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
