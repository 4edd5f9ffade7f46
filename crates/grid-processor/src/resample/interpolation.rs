//! Nodata-aware interpolation for grid resampling.

use tiler_common::is_nodata;

/// Bilinear interpolation with strict nodata propagation.
///
/// `(x, y)` is a fractional pixel position where integer values address
/// pixel centres. The 2x2 neighbourhood is `(x0, y0)..=(x0 + 1, y0 + 1)`
/// with `x0 = floor(x)`. Returns `None` when any neighbour lies outside the
/// grid or equals the sentinel (or is NaN); a missing neighbour is never
/// blended away. The last row and column therefore always yield `None`.
pub fn bilinear_interpolate(
    data: &[f32],
    width: usize,
    height: usize,
    nodata: f32,
    x: f64,
    y: f64,
) -> Option<f32> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }

    let x0f = x.floor();
    let y0f = y.floor();
    if x0f < 0.0 || y0f < 0.0 {
        return None;
    }

    let x0 = x0f as usize;
    let y0 = y0f as usize;
    let x1 = x0.checked_add(1)?;
    let y1 = y0.checked_add(1)?;
    if x1 >= width || y1 >= height {
        return None;
    }

    let v00 = data[y0 * width + x0];
    let v10 = data[y0 * width + x1];
    let v01 = data[y1 * width + x0];
    let v11 = data[y1 * width + x1];

    if [v00, v10, v01, v11].iter().any(|&v| is_nodata(v, nodata)) {
        return None;
    }

    let fx = x - x0f;
    let fy = y - y0f;

    let value = v00 as f64 * (1.0 - fx) * (1.0 - fy)
        + v10 as f64 * fx * (1.0 - fy)
        + v01 as f64 * (1.0 - fx) * fy
        + v11 as f64 * fx * fy;

    Some(value as f32)
}
