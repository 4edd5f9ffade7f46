//! Single-band elevation rasters and resampled value grids.

use crate::{BoundingBox, TilerError, TilerResult};

/// Whether `value` is missing data for the given sentinel.
///
/// Sentinel comparison is exact. Non-finite samples (NaN and infinities) are
/// always treated as missing, which also covers a NaN sentinel.
#[inline]
pub fn is_nodata(value: f32, nodata: f32) -> bool {
    !value.is_finite() || value == nodata
}

/// An immutable, single-band elevation raster in its native CRS.
///
/// Samples are row-major with row 0 at the north edge (`bounds.max_y`).
#[derive(Debug, Clone)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<f32>,
    bounds: BoundingBox,
    nodata: f32,
}

impl Raster {
    /// Create a raster, checking that the sample count and bounds are usable.
    pub fn new(
        width: usize,
        height: usize,
        data: Vec<f32>,
        bounds: BoundingBox,
        nodata: f32,
    ) -> TilerResult<Self> {
        if width == 0 || height == 0 {
            return Err(TilerError::InvalidRaster(format!(
                "dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if data.len() != width * height {
            return Err(TilerError::InvalidRaster(format!(
                "expected {} samples for {}x{}, got {}",
                width * height,
                width,
                height,
                data.len()
            )));
        }
        if !bounds.is_valid() {
            return Err(TilerError::InvalidRaster(format!(
                "bounds must be finite with positive extent, got {:?}",
                bounds
            )));
        }

        Ok(Self {
            width,
            height,
            data,
            bounds,
            nodata,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn nodata(&self) -> f32 {
        self.nodata
    }

    /// Native units per pixel along (x, y).
    pub fn resolution(&self) -> (f64, f64) {
        (
            self.bounds.width() / self.width as f64,
            self.bounds.height() / self.height as f64,
        )
    }

    /// Sample at a pixel, or `None` outside the grid.
    #[inline]
    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }
}

/// Output of the resampling engine: one value per destination pixel,
/// with `nodata` marking cells that could not be interpolated.
#[derive(Debug, Clone)]
pub struct ResampledGrid {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
    pub nodata: f32,
}

impl ResampledGrid {
    pub fn new(width: usize, height: usize, data: Vec<f32>, nodata: f32) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
            nodata,
        }
    }

    /// Number of cells holding a valid value.
    pub fn valid_count(&self) -> usize {
        self.data
            .iter()
            .filter(|v| !is_nodata(**v, self.nodata))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_bounds() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 1.0, 1.0)
    }

    #[test]
    fn test_nodata_exact_match() {
        assert!(is_nodata(-9999.0, -9999.0));
        assert!(!is_nodata(-9999.001, -9999.0));
        assert!(is_nodata(f32::NAN, -9999.0));
        assert!(is_nodata(f32::NAN, f32::NAN));
        assert!(!is_nodata(0.0, f32::NAN));
    }

    #[test]
    fn test_infinities_are_nodata() {
        assert!(is_nodata(f32::INFINITY, -9999.0));
        assert!(is_nodata(f32::NEG_INFINITY, f32::NAN));
        assert!(!is_nodata(f32::MAX, -9999.0));
    }

    #[test]
    fn test_raster_rejects_wrong_sample_count() {
        let err = Raster::new(3, 3, vec![0.0; 8], unit_bounds(), -1.0).unwrap_err();
        assert!(matches!(err, TilerError::InvalidRaster(_)));
    }

    #[test]
    fn test_raster_rejects_inverted_bounds() {
        let bounds = BoundingBox::new(1.0, 0.0, 0.0, 1.0);
        assert!(Raster::new(1, 1, vec![0.0], bounds, -1.0).is_err());
    }

    #[test]
    fn test_raster_resolution() {
        let raster = Raster::new(4, 2, vec![0.0; 8], unit_bounds(), -1.0).unwrap();
        assert_eq!(raster.resolution(), (0.25, 0.5));
        assert_eq!(raster.get(3, 1), Some(0.0));
        assert_eq!(raster.get(4, 0), None);
    }
}
