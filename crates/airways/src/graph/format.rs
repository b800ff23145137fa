//! Binary graph persistence and world-file affine-transform parsing.
//!
//! Why this design
//! - The on-disk layout is little-endian and byte-packed rather than using
//!   a self-describing format: the graph is a closed, version-controlled
//!   artifact produced and consumed by this crate alone, so there is no
//!   forward-compatibility surface to buy with a heavier encoding.
//! - The world file's six numbers are read in the order `A B D E C F`, not
//!   the conventional `A D B E C F` pairing. This is kept exactly as found
//!   upstream rather than "corrected," since flipping it would silently
//!   swap B and D against every world file already in use.

use std::io::{self, BufRead, Read, Write};

use nalgebra::{Matrix2, Vector2};

use super::types::{Waypoint, WaypointId};
use super::AirwayGraph;
use crate::error::{AirwaysError, Result};
use crate::raster::Pixel;

fn io_err(e: impl std::fmt::Display) -> AirwaysError { AirwaysError::Io(e.to_string()) }

fn write_u32(w: &mut impl Write, v: u32) -> io::Result<()> { w.write_all(&v.to_le_bytes()) }
fn write_f64(w: &mut impl Write, v: f64) -> io::Result<()> { w.write_all(&v.to_le_bytes()) }

fn read_u32(r: &mut impl Read) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}
fn read_f64(r: &mut impl Read) -> io::Result<f64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

impl AirwayGraph {
    /// Serializes the graph: a `u32` waypoint count, that many waypoint
    /// records (`u32` id, `u32` name length, name bytes, `f64` lon, `f64`
    /// lat), then one adjacency record per waypoint (`u32` id, `u32`
    /// neighbor count, repeated `u32` neighbor id + `f64` distance).
    ///
    /// # Errors
    /// Returns [`AirwaysError::Io`] if the writer fails.
    pub fn save_to_file(&self, mut w: impl Write) -> Result<()> {
        let mut ids: Vec<WaypointId> = self.waypoint_ids().collect();
        ids.sort_unstable();

        write_u32(&mut w, ids.len() as u32).map_err(io_err)?;
        for &id in &ids {
            let wp = self.waypoint(id).expect("id came from waypoint_ids");
            let name_bytes = wp.name.as_bytes();
            write_u32(&mut w, id as u32).map_err(io_err)?;
            write_u32(&mut w, name_bytes.len() as u32).map_err(io_err)?;
            w.write_all(name_bytes).map_err(io_err)?;
            write_f64(&mut w, wp.lon).map_err(io_err)?;
            write_f64(&mut w, wp.lat).map_err(io_err)?;
        }
        for &id in &ids {
            let neighbors = self.neighbors(id);
            write_u32(&mut w, id as u32).map_err(io_err)?;
            write_u32(&mut w, neighbors.len() as u32).map_err(io_err)?;
            for edge in neighbors {
                write_u32(&mut w, edge.target as u32).map_err(io_err)?;
                write_f64(&mut w, edge.distance).map_err(io_err)?;
            }
        }
        Ok(())
    }

    /// Reverses [`Self::save_to_file`]. Edges are reconstructed directly
    /// from the stored adjacency records rather than re-derived from
    /// distance, so a file saved with stale distances loads with those same
    /// distances rather than silently recomputing them.
    ///
    /// # Errors
    /// Returns [`AirwaysError::Io`] on truncated input, a malformed UTF-8
    /// name, or a neighbor referencing an id absent from the waypoint table.
    pub fn load_from_file(mut r: impl Read) -> Result<AirwayGraph> {
        let mut graph = AirwayGraph::new();

        let count = read_u32(&mut r).map_err(io_err)? as usize;
        for _ in 0..count {
            let id = read_u32(&mut r).map_err(io_err)? as WaypointId;
            let name_len = read_u32(&mut r).map_err(io_err)? as usize;
            let mut name_bytes = vec![0u8; name_len];
            r.read_exact(&mut name_bytes).map_err(io_err)?;
            let name = String::from_utf8(name_bytes).map_err(io_err)?;
            let lon = read_f64(&mut r).map_err(io_err)?;
            let lat = read_f64(&mut r).map_err(io_err)?;
            graph.insert_waypoint(Waypoint::new(id, name, lon, lat));
        }

        for _ in 0..count {
            let id = read_u32(&mut r).map_err(io_err)? as WaypointId;
            let neighbor_count = read_u32(&mut r).map_err(io_err)? as usize;
            for _ in 0..neighbor_count {
                let target = read_u32(&mut r).map_err(io_err)? as WaypointId;
                let distance = read_f64(&mut r).map_err(io_err)?;
                graph.insert_directed_edge(id, target, distance).map_err(io_err)?;
            }
        }
        Ok(graph)
    }
}

/// Affine pixel <-> Mercator-projected transform read from a world file.
///
/// Field names match the conventional world-file letters; the constructor
/// reads them off disk in the upstream order (`A B D E C F`), not the
/// alphabetic pairing a fresh implementation would guess. The transform
/// operates on projected (Mercator) coordinates, not geodetic lon/lat;
/// callers convert at the boundary with `lonlat_to_merc`/`merc_to_lonlat`.
#[derive(Debug, Clone, Copy)]
pub struct WorldFile {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl WorldFile {
    /// Parses six whitespace/newline-separated numbers in the literal order
    /// `A B D E C F`.
    ///
    /// # Errors
    /// Returns [`AirwaysError::Io`] if fewer than six numbers are present or
    /// any fails to parse as `f64`.
    pub fn parse(r: impl BufRead) -> Result<WorldFile> {
        let mut numbers = Vec::with_capacity(6);
        for line in r.lines() {
            let line = line.map_err(io_err)?;
            for token in line.split_whitespace() {
                numbers.push(token.parse::<f64>().map_err(io_err)?);
            }
        }
        if numbers.len() < 6 {
            return Err(AirwaysError::Io(format!("world file has {} numbers, need 6", numbers.len())));
        }
        let (a, b, d, e, c, f) = (numbers[0], numbers[1], numbers[2], numbers[3], numbers[4], numbers[5]);
        Ok(WorldFile { a, b, c, d, e, f })
    }

    /// Maps a raster pixel to its Mercator-projected coordinate.
    #[must_use]
    pub fn pixel_to_coordinate(&self, pixel: Pixel) -> Vector2<f64> {
        let (col, row) = (f64::from(pixel.x), f64::from(pixel.y));
        Vector2::new(self.a * col + self.b * row + self.c, self.d * col + self.e * row + self.f)
    }

    /// Inverse of [`Self::pixel_to_coordinate`], rounded to the nearest
    /// pixel. `projected` is a Mercator coordinate, not geodetic lon/lat.
    #[must_use]
    pub fn coordinate_to_pixel(&self, projected: Vector2<f64>) -> Pixel {
        let m = Matrix2::new(self.a, self.b, self.d, self.e);
        let rhs = Vector2::new(projected.x - self.c, projected.y - self.f);
        let col_row = m.try_inverse().map(|inv| inv * rhs).unwrap_or(Vector2::new(0.0, 0.0));
        Pixel::new(col_row.x.round() as i32, col_row.y.round() as i32)
    }
}
