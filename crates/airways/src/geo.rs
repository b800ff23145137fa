//! Geodetic primitives: Mercator projection, great-circle distance, turn angle.
//!
//! Purpose
//! - Convert between geodetic (longitude/latitude, radians) and projected
//!   (Mercator, metres) coordinates.
//! - Provide the great-circle distance used for all edge/heuristic costs.
//! - Provide the turn-angle cosine used by every turn-constraint gate.
//!
//! Why this design
//! - Kept dependency-light and numerically explicit (eps-aware iteration),
//!   matching the rest of the crate's small free-function style.
//! - Mercator forward/inverse parameters are fixed constants (not a general
//!   projection config) because exactly one ellipsoid/scale is in scope.

use nalgebra::Vector2;

use crate::error::{AirwaysError, Result};

/// WGS84-ish semi-major axis used by the Mercator projection, in metres.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Eccentricity of the reference ellipsoid used by the Mercator projection.
const MERC_ECCENTRICITY: f64 = 0.081_819_190_842_621_486;

/// Radians-to-degrees conversion factor used for synthetic waypoint naming.
pub const RAD_TO_DEG: f64 = 57.295_779_513_082_32;

const NEWTON_TOL: f64 = 1.0e-10;
const NEWTON_MAX_ITER: u32 = 15;

/// A point on the reference ellipsoid, longitude/latitude in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    #[must_use]
    pub fn new(lon: f64, lat: f64) -> Self { Self { lon, lat } }
}

/// Isometric-latitude helper: `tan(pi/4 - phi/2) / ((1 - e sin phi)/(1 + e sin phi))^(e/2)`.
fn tsfn(phi: f64, e: f64) -> f64 {
    let sinphi = phi.sin() * e;
    (std::f64::consts::FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - sinphi) / (1.0 + sinphi)).powf(e / 2.0)
}

/// Inverse isometric latitude via Newton iteration (bounded, tolerance-gated).
fn inv_tsfn(ts: f64, e: f64) -> f64 {
    let eccnth = e / 2.0;
    let mut phi = std::f64::consts::FRAC_PI_2 - 2.0 * ts.atan();
    for _ in 0..NEWTON_MAX_ITER {
        let con = e * phi.sin();
        let dphi = std::f64::consts::FRAC_PI_2
            - 2.0 * (ts * ((1.0 - con) / (1.0 + con)).powf(eccnth)).atan()
            - phi;
        phi += dphi;
        if dphi.abs() <= NEWTON_TOL {
            break;
        }
    }
    phi
}

/// Projects geodetic coordinates to planar Mercator metres.
#[must_use]
pub fn lonlat_to_merc(lon: f64, lat: f64) -> Vector2<f64> {
    let x = lon * EARTH_RADIUS_M;
    let y = -tsfn(lat, MERC_ECCENTRICITY).ln() * EARTH_RADIUS_M;
    Vector2::new(x, y)
}

/// Inverse of [`lonlat_to_merc`]: planar Mercator metres back to radians.
#[must_use]
pub fn merc_to_lonlat(xy: Vector2<f64>) -> LonLat {
    let lon = xy.x / EARTH_RADIUS_M;
    let lat = inv_tsfn((-xy.y / EARTH_RADIUS_M).exp(), MERC_ECCENTRICITY);
    LonLat::new(lon, lat)
}

/// Great-circle distance between two geodetic points, in metres (haversine).
#[must_use]
pub fn great_circle_distance(a: LonLat, b: LonLat) -> f64 {
    let delta_lat = b.lat - a.lat;
    let delta_lon = b.lon - a.lon;
    let sin_half_lat = (delta_lat / 2.0).sin();
    let sin_half_lon = (delta_lon / 2.0).sin();
    let h = sin_half_lat * sin_half_lat + a.lat.cos() * b.lat.cos() * sin_half_lon * sin_half_lon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Cosine of the turn angle at `current`, between the incoming direction
/// `previous -> current` and the outgoing direction `current -> next`,
/// evaluated on projected (planar) coordinates. Positive means turn < 90deg.
///
/// # Errors
/// Returns [`AirwaysError::Precondition`] if any of the three points lacks a
/// projected coordinate.
pub fn turn_angle_cosine(
    previous: Option<Vector2<f64>>,
    current: Option<Vector2<f64>>,
    next: Option<Vector2<f64>>,
) -> Result<f64> {
    let (Some(previous), Some(current), Some(next)) = (previous, current, next) else {
        return Err(AirwaysError::Precondition(
            "turn-angle cosine requires a projected coordinate on all three points".to_string(),
        ));
    };
    let incoming = current - previous;
    let outgoing = next - current;
    Ok(incoming.dot(&outgoing) / (incoming.norm() * outgoing.norm()))
}
