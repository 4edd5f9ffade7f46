//! Integration tests for footprint transformation and resampling.

use grid_processor::{compute_footprint, resample, resample_pixel};
use projection::{CoordinateTransform, CrsRegistry};
use test_utils::{bbox, create_ramp_grid, elevation_raster, punch_nodata_holes, ramp_raster};
use tiler_common::{is_nodata, BoundingBox, CrsId, Raster, TilerError, TilerResult};

fn identity() -> projection::Transformer {
    let registry = CrsRegistry::with_epsg_database();
    registry
        .transformer(&CrsId::epsg(32633), &CrsId::epsg(32633))
        .unwrap()
}

// ============================================================================
// Identity resampling
// ============================================================================

#[test]
fn test_identity_reproduces_interior_samples() {
    let raster = ramp_raster(10, 10);
    let transform = identity();
    let footprint = compute_footprint(&raster, &transform).unwrap();
    let grid = resample(&raster, &footprint, &transform);

    assert_eq!((grid.width, grid.height), (10, 10));
    assert_eq!(grid.nodata, -9999.0);

    for y in 0..10 {
        for x in 0..10 {
            let value = grid.data[y * 10 + x];
            if x == 9 || y == 9 {
                // The bilinear neighbourhood runs off the grid
                assert_eq!(value, -9999.0, "edge pixel ({}, {})", x, y);
            } else {
                assert_eq!(value, (y * 10 + x) as f32, "pixel ({}, {})", x, y);
            }
        }
    }
    assert_eq!(grid.valid_count(), 81);
}

#[test]
fn test_single_pixel_raster_resamples_to_nodata() {
    let raster = Raster::new(1, 1, vec![42.0], BoundingBox::new(0.0, 0.0, 1.0, 1.0), -9999.0)
        .unwrap();
    let transform = identity();
    let footprint = compute_footprint(&raster, &transform).unwrap();
    let grid = resample(&raster, &footprint, &transform);

    assert_eq!((grid.width, grid.height), (1, 1));
    assert_eq!(grid.valid_count(), 0);
}

// ============================================================================
// Nodata propagation
// ============================================================================

#[test]
fn test_single_hole_spreads_to_its_neighbourhood() {
    let mut data = create_ramp_grid(10, 10);
    data[4 * 10 + 4] = -9999.0;
    let raster = Raster::new(10, 10, data, bbox::unit_pixels(10, 10), -9999.0).unwrap();
    let transform = identity();
    let footprint = compute_footprint(&raster, &transform).unwrap();
    let grid = resample(&raster, &footprint, &transform);

    for (x, y) in [(3, 3), (4, 3), (3, 4), (4, 4)] {
        assert_eq!(grid.data[y * 10 + x], -9999.0, "pixel ({}, {})", x, y);
    }
    assert_eq!(grid.data[5 * 10 + 5], 55.0);
    assert_eq!(grid.data[2 * 10 + 2], 22.0);
}

#[test]
fn test_nodata_neighbourhood_is_never_blended() {
    let mut data = create_ramp_grid(20, 20);
    punch_nodata_holes(&mut data, 7, -9999.0);
    let raster = Raster::new(20, 20, data, bbox::unit_pixels(20, 20), -9999.0).unwrap();

    // The inverse lands a quarter pixel off every centre, so each output is
    // a true 4-way blend.
    struct Shift(CrsId);
    impl CoordinateTransform for Shift {
        fn source(&self) -> &CrsId {
            &self.0
        }
        fn target(&self) -> &CrsId {
            &self.0
        }
        fn forward(&self, x: f64, y: f64) -> TilerResult<(f64, f64)> {
            Ok((x, y))
        }
        fn inverse(&self, x: f64, y: f64) -> TilerResult<(f64, f64)> {
            Ok((x + 0.25, y - 0.25))
        }
    }

    let transform = Shift(CrsId::epsg(32633));
    let footprint = compute_footprint(&raster, &transform).unwrap();
    let grid = resample(&raster, &footprint, &transform);

    for y in 0..20 {
        for x in 0..20 {
            let (dx, dy) = footprint.pixel_center(x, y);
            let (sx, sy) = transform.inverse(dx, dy).unwrap();
            let (px, py) = grid_processor::source_pixel(&raster, sx, sy);
            let (x0, y0) = (px.floor(), py.floor());

            let neighbourhood_ok = x0 >= 0.0
                && y0 >= 0.0
                && (x0 as usize + 1) < 20
                && (y0 as usize + 1) < 20
                && [(0, 0), (1, 0), (0, 1), (1, 1)].iter().all(|&(ox, oy)| {
                    let v = raster
                        .get(x0 as usize + ox, y0 as usize + oy)
                        .unwrap_or(-9999.0);
                    !is_nodata(v, -9999.0)
                });

            let value = grid.data[y * 20 + x];
            assert_eq!(
                !is_nodata(value, grid.nodata),
                neighbourhood_ok,
                "pixel ({}, {}) = {}",
                x,
                y,
                value
            );
        }
    }
}

#[test]
fn test_failed_inverse_is_nodata() {
    struct HalfBroken(CrsId);
    impl CoordinateTransform for HalfBroken {
        fn source(&self) -> &CrsId {
            &self.0
        }
        fn target(&self) -> &CrsId {
            &self.0
        }
        fn forward(&self, x: f64, y: f64) -> TilerResult<(f64, f64)> {
            Ok((x, y))
        }
        fn inverse(&self, x: f64, y: f64) -> TilerResult<(f64, f64)> {
            if x > 5.0 {
                Err(TilerError::Projection("outside domain".to_string()))
            } else {
                Ok((x, y))
            }
        }
    }

    let raster = ramp_raster(10, 10);
    let transform = HalfBroken(CrsId::epsg(32633));
    let footprint = compute_footprint(&raster, &transform).unwrap();

    assert_eq!(resample_pixel(&raster, &footprint, &transform, 2, 2), 22.0);
    assert_eq!(resample_pixel(&raster, &footprint, &transform, 7, 2), -9999.0);
}

// ============================================================================
// Real reprojection
// ============================================================================

#[test]
fn test_wgs84_to_utm_keeps_dimensions_and_value_range() {
    let registry = CrsRegistry::with_epsg_database();
    let transform = registry
        .transformer(&CrsId::wgs84(), &CrsId::epsg(32633))
        .unwrap();
    let raster = elevation_raster(60, 40, bbox::alps_wgs84());
    let footprint = compute_footprint(&raster, &transform).unwrap();
    let grid = resample(&raster, &footprint, &transform);

    assert_eq!((grid.width, grid.height), (60, 40));

    let (src_min, src_max) = raster
        .data()
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    // The envelope is slightly larger than the rotated footprint, so a thin
    // border is nodata, but most of the grid is covered.
    assert!(grid.valid_count() > 60 * 40 * 3 / 4, "valid = {}", grid.valid_count());
    for &v in grid.data.iter().filter(|&&v| !is_nodata(v, grid.nodata)) {
        assert!(v >= src_min - 1e-3 && v <= src_max + 1e-3, "value {}", v);
    }
}

#[test]
fn test_southern_hemisphere_utm() {
    let registry = CrsRegistry::with_epsg_database();
    let target = projection::utm_zone_for(-70.4, -33.4);
    assert_eq!(target, CrsId::epsg(32719));

    let transform = registry.transformer(&CrsId::wgs84(), &target).unwrap();
    let raster = elevation_raster(32, 32, bbox::andes_wgs84());
    let footprint = compute_footprint(&raster, &transform).unwrap();
    let grid = resample(&raster, &footprint, &transform);

    // Southern zones carry a 10,000 km false northing.
    assert!(footprint.target_bounds.min_y > 6_000_000.0);
    assert!(grid.valid_count() > 32 * 32 / 2);
}
