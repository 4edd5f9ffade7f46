//! Elevation to 8-bit grayscale normalization.
//!
//! Valid samples map linearly onto 0..=255 across the grid's value range and
//! are written as opaque gray RGBA. Nodata cells become fully transparent.

use rayon::prelude::*;
use tiler_common::{is_nodata, ResampledGrid, TilerError, TilerResult, ValueRange};

/// Transparent RGBA written for nodata cells.
pub const NODATA_PIXEL: [u8; 4] = [0, 0, 0, 0];

/// Row-major RGBA buffer, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedGrid {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl NormalizedGrid {
    /// RGBA of pixel (x, y), or `None` outside the grid.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * 4;
        self.pixels
            .get(offset..offset + 4)
            .and_then(|p| p.try_into().ok())
    }
}

/// Minimum and maximum over all valid cells.
///
/// Non-finite samples count as nodata, so the range is always finite.
/// Fails with [`TilerError::EmptyRange`] when no cell is valid.
pub fn value_range(grid: &ResampledGrid) -> TilerResult<ValueRange> {
    let nodata = grid.nodata;
    grid.data
        .par_iter()
        .copied()
        .filter(|&v| !is_nodata(v, nodata))
        .fold(
            || None,
            |acc: Option<(f32, f32)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            },
        )
        .reduce(
            || None,
            |a, b| match (a, b) {
                (Some((lo_a, hi_a)), Some((lo_b, hi_b))) => Some((lo_a.min(lo_b), hi_a.max(hi_b))),
                (a, None) => a,
                (None, b) => b,
            },
        )
        .map(|(min, max)| ValueRange { min, max })
        .ok_or(TilerError::EmptyRange)
}

/// Intensity of a valid sample within `range`.
///
/// A single-valued range maps everything to 255.
#[inline]
pub fn normalize_value(value: f32, range: &ValueRange) -> u8 {
    if range.is_degenerate() {
        return 255;
    }
    let t = (value as f64 - range.min as f64) / range.span();
    (t * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Compute the value range, then encode every cell as RGBA.
pub fn normalize(grid: &ResampledGrid) -> TilerResult<(ValueRange, NormalizedGrid)> {
    let range = value_range(grid)?;
    let nodata = grid.nodata;
    let width = grid.width;
    let mut pixels = vec![0u8; grid.width * grid.height * 4];

    pixels
        .par_chunks_mut(width * 4)
        .zip(grid.data.par_chunks(width))
        .for_each(|(out, row)| {
            for (px, &value) in out.chunks_exact_mut(4).zip(row) {
                if is_nodata(value, nodata) {
                    px.copy_from_slice(&NODATA_PIXEL);
                } else {
                    let v = normalize_value(value, &range);
                    px.copy_from_slice(&[v, v, v, 255]);
                }
            }
        });

    tracing::debug!(min = range.min, max = range.max, "Normalized grid");

    Ok((
        range,
        NormalizedGrid {
            width: grid.width,
            height: grid.height,
            pixels,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(data: Vec<f32>, width: usize, nodata: f32) -> ResampledGrid {
        let height = data.len() / width;
        ResampledGrid::new(width, height, data, nodata)
    }

    #[test]
    fn test_range_skips_nodata_and_nan() {
        let g = grid(vec![-9999.0, 5.0, f32::NAN, -3.0, 12.5, -9999.0], 3, -9999.0);
        let range = value_range(&g).unwrap();
        assert_eq!(range, ValueRange { min: -3.0, max: 12.5 });
    }

    #[test]
    fn test_all_nodata_is_empty_range() {
        let g = grid(vec![-9999.0; 16], 4, -9999.0);
        assert!(matches!(value_range(&g), Err(TilerError::EmptyRange)));
        assert!(matches!(normalize(&g), Err(TilerError::EmptyRange)));
    }

    #[test]
    fn test_all_nan_with_nan_sentinel_is_empty_range() {
        let g = grid(vec![f32::NAN; 4], 2, f32::NAN);
        assert!(matches!(value_range(&g), Err(TilerError::EmptyRange)));
    }

    #[test]
    fn test_infinite_samples_are_transparent_and_excluded() {
        let g = grid(
            vec![f32::INFINITY, 2.0, f32::NEG_INFINITY, 4.0],
            2,
            -9999.0,
        );
        let (range, out) = normalize(&g).unwrap();
        assert_eq!(range, ValueRange { min: 2.0, max: 4.0 });
        assert!(range.min.is_finite() && range.max.is_finite());
        assert_eq!(out.pixel(0, 0), Some(NODATA_PIXEL));
        assert_eq!(out.pixel(0, 1), Some(NODATA_PIXEL));
        assert_eq!(out.pixel(1, 1), Some([255, 255, 255, 255]));

        let only_inf = grid(vec![f32::INFINITY; 4], 2, -9999.0);
        assert!(matches!(value_range(&only_inf), Err(TilerError::EmptyRange)));
    }

    #[test]
    fn test_endpoints() {
        let range = ValueRange { min: 100.0, max: 200.0 };
        assert_eq!(normalize_value(100.0, &range), 0);
        assert_eq!(normalize_value(200.0, &range), 255);
        assert_eq!(normalize_value(150.0, &range), 128); // 127.5 rounds up
    }

    #[test]
    fn test_degenerate_range_is_full_intensity() {
        let range = ValueRange { min: 7.0, max: 7.0 };
        assert_eq!(normalize_value(7.0, &range), 255);
    }

    #[test]
    fn test_pixels_are_gray_with_alpha() {
        let g = grid(vec![0.0, -1.0, 10.0, 5.0], 2, -1.0);
        let (range, out) = normalize(&g).unwrap();
        assert_eq!(range, ValueRange { min: 0.0, max: 10.0 });
        assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(out.pixel(1, 0), Some(NODATA_PIXEL));
        assert_eq!(out.pixel(0, 1), Some([255, 255, 255, 255]));
        assert_eq!(out.pixel(1, 1), Some([128, 128, 128, 255]));
        assert_eq!(out.pixel(2, 0), None);
    }
}
