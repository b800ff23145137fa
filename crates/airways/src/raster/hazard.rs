//! Hazard raster: an owned byte grid with 0 = clear, non-zero = hazardous.

use super::geom::Pixel;

/// Owning width x height byte grid. Replaced wholesale on update; no partial
/// mutation.
#[derive(Debug, Clone, Default)]
pub struct HazardRaster {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl HazardRaster {
    /// Builds a raster from a flat row-major byte grid.
    ///
    /// # Panics
    /// Panics if `data.len() != width * height`.
    #[must_use]
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), width * height, "hazard raster data size mismatch");
        Self { width, height, data }
    }

    #[must_use]
    pub fn empty() -> Self { Self { width: 0, height: 0, data: Vec::new() } }

    #[must_use]
    pub fn width(&self) -> usize { self.width }

    #[must_use]
    pub fn height(&self) -> usize { self.height }

    /// Byte at `pixel`; 0 when out of bounds.
    #[must_use]
    pub fn get(&self, pixel: Pixel) -> u8 {
        if pixel.x < 0 || pixel.y < 0 {
            return 0;
        }
        let (x, y) = (pixel.x as usize, pixel.y as usize);
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[y * self.width + x]
    }

    #[must_use]
    pub fn is_hazardous(&self, pixel: Pixel) -> bool { self.get(pixel) > 0 }

    /// Iterates every hazardous pixel with its coordinates.
    pub fn hazardous_pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        let width = self.width;
        self.data.iter().enumerate().filter_map(move |(idx, &byte)| {
            (byte > 0).then(|| Pixel::new((idx % width) as i32, (idx / width) as i32))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_clear() {
        let r = HazardRaster::new(2, 2, vec![0, 1, 0, 0]);
        assert_eq!(r.get(Pixel::new(-1, 0)), 0);
        assert_eq!(r.get(Pixel::new(5, 5)), 0);
    }

    #[test]
    fn iterates_only_hazardous_pixels() {
        let r = HazardRaster::new(2, 2, vec![0, 1, 0, 2]);
        let mut got: Vec<_> = r.hazardous_pixels().collect();
        got.sort_by_key(|p| (p.y, p.x));
        assert_eq!(got, vec![Pixel::new(1, 0), Pixel::new(1, 1)]);
    }

    #[test]
    fn empty_raster_has_no_hazards() {
        let r = HazardRaster::empty();
        assert_eq!(r.hazardous_pixels().count(), 0);
        assert_eq!(r.get(Pixel::new(0, 0)), 0);
    }
}
