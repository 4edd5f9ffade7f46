//! Reprojection of a raster onto its destination footprint.
//!
//! Each destination pixel is handled independently: its centre is mapped
//! back into the source CRS and sampled bilinearly. Rows are written to
//! disjoint slices of the output buffer, so they run in parallel without
//! locking.

use std::time::Instant;

use projection::CoordinateTransform;
use rayon::prelude::*;
use tiler_common::{Raster, ResampledGrid};

use super::bilinear_interpolate;
use crate::Footprint;

/// Fractional source pixel position of a source-CRS coordinate.
///
/// Integer results address pixel centres; row 0 is the north edge.
#[inline]
pub fn source_pixel(raster: &Raster, sx: f64, sy: f64) -> (f64, f64) {
    let bounds = raster.bounds();
    let (res_x, res_y) = raster.resolution();
    (
        (sx - bounds.min_x) / res_x - 0.5,
        (bounds.max_y - sy) / res_y - 0.5,
    )
}

/// Value of destination pixel (x, y), or the raster's sentinel.
///
/// A pixel whose centre cannot be transformed back is nodata.
pub fn resample_pixel<T>(
    raster: &Raster,
    footprint: &Footprint,
    transform: &T,
    x: usize,
    y: usize,
) -> f32
where
    T: CoordinateTransform + ?Sized,
{
    let (dx, dy) = footprint.pixel_center(x, y);
    let Ok((sx, sy)) = transform.inverse(dx, dy) else {
        return raster.nodata();
    };
    let (px, py) = source_pixel(raster, sx, sy);

    bilinear_interpolate(
        raster.data(),
        raster.width(),
        raster.height(),
        raster.nodata(),
        px,
        py,
    )
    .unwrap_or(raster.nodata())
}

/// Resample `raster` onto `footprint`'s destination grid.
///
/// The output has the raster's width and height and carries its sentinel.
/// `transform` must be the one `footprint` was computed with.
pub fn resample<T>(raster: &Raster, footprint: &Footprint, transform: &T) -> ResampledGrid
where
    T: CoordinateTransform + ?Sized,
{
    let start = Instant::now();
    let width = footprint.width;
    let height = footprint.height;
    let mut data = vec![raster.nodata(); width * height];

    data.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = resample_pixel(raster, footprint, transform, x, y);
            }
        });

    let grid = ResampledGrid::new(width, height, data, raster.nodata());
    tracing::debug!(
        width,
        height,
        valid = grid.valid_count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Resampled raster"
    );
    grid
}
