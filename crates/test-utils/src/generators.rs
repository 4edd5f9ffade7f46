//! Test data generators for creating synthetic elevation rasters.
//!
//! These generators create predictable, verifiable data patterns that can
//! be used across the test suite.

/// Creates a ramp grid whose values count up in row-major order.
///
/// Each cell value is `row * width + col`, so a 10x10 ramp spans 0..=99.
///
/// # Example
///
/// ```
/// use test_utils::create_ramp_grid;
///
/// let grid = create_ramp_grid(10, 10);
/// assert_eq!(grid.len(), 100);
/// assert_eq!(grid[0], 0.0);
/// assert_eq!(grid[11], 11.0); // row 1, col 1
/// assert_eq!(grid[99], 99.0);
/// ```
pub fn create_ramp_grid(width: usize, height: usize) -> Vec<f32> {
    (0..width * height).map(|i| i as f32).collect()
}

/// Creates a grid with terrain-like elevations in metres.
///
/// A smooth hill centred in the grid, rising from roughly 400 m at the
/// corners to about 2400 m at the summit.
pub fn create_elevation_grid(width: usize, height: usize) -> Vec<f32> {
    let cx = (width as f32 - 1.0) / 2.0;
    let cy = (height as f32 - 1.0) / 2.0;
    let radius = cx.max(cy).max(1.0);

    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let dx = (col as f32 - cx) / radius;
            let dy = (row as f32 - cy) / radius;
            let falloff = (-(dx * dx + dy * dy) * 1.6).exp();
            data.push(400.0 + 2000.0 * falloff);
        }
    }
    data
}

/// Creates a grid where every sample equals `nodata`.
pub fn create_nodata_grid(width: usize, height: usize, nodata: f32) -> Vec<f32> {
    vec![nodata; width * height]
}

/// Replaces every `step`-th sample (starting at index 0) with `nodata`.
pub fn punch_nodata_holes(data: &mut [f32], step: usize, nodata: f32) {
    for value in data.iter_mut().step_by(step.max(1)) {
        *value = nodata;
    }
}
