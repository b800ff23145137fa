//! Pixel type, Bresenham rasterization, and perpendicular equant lines.
//!
//! Purpose
//! - `Pixel`: integer raster coordinate.
//! - `bresenham_line`: classical 8-connected line rasterization, endpoint
//!   order preserved.
//! - `perpendicular_equant_lines`: interior subdivision points along a
//!   segment, each with a transverse Bresenham line, used to seed detour
//!   candidate levels.

/// An integer raster coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
}

impl Pixel {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self { Self { x, y } }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Classical 8-connected Bresenham line from `start` to `end`, inclusive,
/// in traversal order (the multiset is symmetric under endpoint swap, but
/// the order is reversed).
#[must_use]
pub fn bresenham_line(start: Pixel, end: Pixel) -> Vec<Pixel> {
    let (mut x0, mut y0) = (start.x, start.y);
    let (mut x1, mut y1) = (end.x, end.y);

    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    let reverse = x0 > x1;
    if reverse {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let deltax = x1 - x0;
    let deltay = (y1 - y0).abs();
    let mut error = deltax / 2;
    let mut yy = y0;
    let ystep = if y0 < y1 { 1 } else { -1 };

    let mut result = Vec::with_capacity((deltax + 1) as usize);
    for xx in x0..=x1 {
        result.push(if steep { Pixel::new(yy, xx) } else { Pixel::new(xx, yy) });
        error -= deltay;
        if error < 0 {
            yy += ystep;
            error += deltax;
        }
    }
    if reverse {
        result.reverse();
    }
    result
}

/// For each of the `segment_count - 1` interior subdivision points of the
/// segment `start -> end`, returns a Bresenham-rasterized transverse line of
/// length `2 * radius` centered on that point and perpendicular to the
/// segment. Symmetric under axis swap (steep vs. shallow segments).
#[must_use]
pub fn perpendicular_equant_lines(
    start: Pixel,
    end: Pixel,
    segment_count: i32,
    radius: f64,
) -> Vec<Vec<Pixel>> {
    let (mut x0, mut y0) = (start.x, start.y);
    let (mut x1, mut y1) = (end.x, end.y);

    // Note: inverted steepness test vs. `bresenham_line` on purpose — the
    // transverse frame is chosen so the perpendicular direction stays
    // well-conditioned regardless of which axis the segment runs along.
    let steep = (y1 - y0).abs() < (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }

    let dy_total = f64::from(y1 - y0);
    let dx_total = f64::from(x1 - x0);
    let k = if dy_total == 0.0 { 0.0 } else { -dx_total / dy_total };

    let dx = (1.0 / (k * k + 1.0)).sqrt() * radius;
    let dx = dx.round() as i32;
    let dy = (k * f64::from(dx)).round() as i32;

    let segment_dx = dx_total / f64::from(segment_count);
    let segment_dy = dy_total / f64::from(segment_count);

    let mut result = Vec::with_capacity((segment_count - 1).max(0) as usize);
    for i in 1..segment_count {
        let point = Pixel::new(
            x0 + (segment_dx * f64::from(i)).round() as i32,
            y0 + (segment_dy * f64::from(i)).round() as i32,
        );
        let (vertical_start, vertical_end) = if steep {
            (Pixel::new(point.y - dy, point.x - dx), Pixel::new(point.y + dy, point.x + dx))
        } else {
            (Pixel::new(point.x - dx, point.y - dy), Pixel::new(point.x + dx, point.y + dy))
        };
        result.push(bresenham_line(vertical_start, vertical_end));
    }
    result
}
