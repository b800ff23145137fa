//! Raster-level hazard representation and the detour pathfinder over it.

mod geom;
mod hazard;
mod pathfinder;

pub use geom::{bresenham_line, perpendicular_equant_lines, Pixel};
pub use hazard::HazardRaster;
pub use pathfinder::{find_path_with_angle, RasterPathConfig};
