//! Destination-space footprint of a raster.

use projection::CoordinateTransform;
use tiler_common::{BoundingBox, CrsId, Raster, TilerError, TilerResult};

/// Where a raster lands in the destination CRS.
///
/// The destination grid keeps the source pixel counts, so the destination
/// resolution is the projected extent divided by the source width/height.
/// This does not model resolution varying across the footprint; distortion
/// grows with the size of the raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub source_crs: CrsId,
    pub target_crs: CrsId,
    /// Transformed corners in [`BoundingBox::corners`] order.
    pub corners: [(f64, f64); 4],
    pub source_bounds: BoundingBox,
    /// Axis-aligned envelope of `corners`.
    pub target_bounds: BoundingBox,
    /// Source units per pixel (x, y).
    pub source_resolution: (f64, f64),
    /// Destination units per pixel (x, y).
    pub target_resolution: (f64, f64),
    pub width: usize,
    pub height: usize,
}

impl Footprint {
    /// Destination coordinate of the centre of pixel (x, y).
    ///
    /// Row 0 is the north edge, so y decreases as the row index grows.
    #[inline]
    pub fn pixel_center(&self, x: usize, y: usize) -> (f64, f64) {
        let (res_x, res_y) = self.target_resolution;
        (
            self.target_bounds.min_x + (x as f64 + 0.5) * res_x,
            self.target_bounds.max_y - (y as f64 + 0.5) * res_y,
        )
    }
}

/// Project the four corners of `raster` and derive the destination grid.
///
/// Fails with [`TilerError::Projection`] if any corner cannot be
/// transformed or the envelope is degenerate.
pub fn compute_footprint<T>(raster: &Raster, transform: &T) -> TilerResult<Footprint>
where
    T: CoordinateTransform + ?Sized,
{
    let source_bounds = raster.bounds();
    let source_corners = source_bounds.corners();

    let mut corners = [(0.0, 0.0); 4];
    for (slot, &(x, y)) in corners.iter_mut().zip(source_corners.iter()) {
        let projected = transform.forward(x, y)?;
        if !projected.0.is_finite() || !projected.1.is_finite() {
            return Err(TilerError::Projection(format!(
                "corner ({}, {}) projected to non-finite ({}, {})",
                x, y, projected.0, projected.1
            )));
        }
        *slot = projected;
    }

    let target_bounds = BoundingBox::enclosing(corners.iter().copied())
        .filter(BoundingBox::is_valid)
        .ok_or_else(|| {
            TilerError::Projection(format!(
                "{} -> {} footprint of {:?} is degenerate",
                transform.source(),
                transform.target(),
                source_bounds
            ))
        })?;

    let width = raster.width();
    let height = raster.height();
    let target_resolution = (
        target_bounds.width() / width as f64,
        target_bounds.height() / height as f64,
    );

    tracing::debug!(
        source = %transform.source(),
        target = %transform.target(),
        min_x = target_bounds.min_x,
        min_y = target_bounds.min_y,
        max_x = target_bounds.max_x,
        max_y = target_bounds.max_y,
        res_x = target_resolution.0,
        res_y = target_resolution.1,
        "Computed footprint"
    );

    Ok(Footprint {
        source_crs: transform.source().clone(),
        target_crs: transform.target().clone(),
        corners,
        source_bounds,
        target_bounds,
        source_resolution: raster.resolution(),
        target_resolution,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use projection::CrsRegistry;
    use test_utils::{bbox, ramp_raster};

    /// Scales x by 2 and y by 3 without touching any CRS database.
    struct Scale;

    static SOURCE: std::sync::OnceLock<CrsId> = std::sync::OnceLock::new();
    static TARGET: std::sync::OnceLock<CrsId> = std::sync::OnceLock::new();

    impl CoordinateTransform for Scale {
        fn source(&self) -> &CrsId {
            SOURCE.get_or_init(|| CrsId::parse("LOCAL:src").unwrap())
        }
        fn target(&self) -> &CrsId {
            TARGET.get_or_init(|| CrsId::parse("LOCAL:dst").unwrap())
        }
        fn forward(&self, x: f64, y: f64) -> TilerResult<(f64, f64)> {
            Ok((x * 2.0, y * 3.0))
        }
        fn inverse(&self, x: f64, y: f64) -> TilerResult<(f64, f64)> {
            Ok((x / 2.0, y / 3.0))
        }
    }

    /// Rotates by 90 degrees, so corners swap roles.
    struct Rotate;

    impl CoordinateTransform for Rotate {
        fn source(&self) -> &CrsId {
            Scale.source()
        }
        fn target(&self) -> &CrsId {
            Scale.target()
        }
        fn forward(&self, x: f64, y: f64) -> TilerResult<(f64, f64)> {
            Ok((-y, x))
        }
        fn inverse(&self, x: f64, y: f64) -> TilerResult<(f64, f64)> {
            Ok((y, -x))
        }
    }

    struct Infinite;

    impl CoordinateTransform for Infinite {
        fn source(&self) -> &CrsId {
            Scale.source()
        }
        fn target(&self) -> &CrsId {
            Scale.target()
        }
        fn forward(&self, _x: f64, _y: f64) -> TilerResult<(f64, f64)> {
            Ok((f64::INFINITY, 0.0))
        }
        fn inverse(&self, x: f64, y: f64) -> TilerResult<(f64, f64)> {
            Ok((x, y))
        }
    }

    #[test]
    fn test_resolution_is_extent_over_source_pixels() {
        let raster = ramp_raster(10, 5);
        let fp = compute_footprint(&raster, &Scale).unwrap();
        assert_eq!(fp.target_bounds, BoundingBox::new(0.0, 0.0, 20.0, 15.0));
        assert_eq!(fp.target_resolution, (2.0, 3.0));
        assert_eq!(fp.source_resolution, (1.0, 1.0));
        assert_eq!((fp.width, fp.height), (10, 5));
    }

    #[test]
    fn test_rotated_footprint_uses_envelope() {
        let raster = ramp_raster(4, 2);
        let fp = compute_footprint(&raster, &Rotate).unwrap();
        // (0..4, 0..2) rotated -> x in -2..0, y in 0..4
        assert_eq!(fp.target_bounds, BoundingBox::new(-2.0, 0.0, 0.0, 4.0));
        assert_eq!(fp.target_resolution, (0.5, 2.0));
    }

    #[test]
    fn test_pixel_center() {
        let raster = ramp_raster(10, 5);
        let fp = compute_footprint(&raster, &Scale).unwrap();
        assert_eq!(fp.pixel_center(0, 0), (1.0, 13.5));
        assert_eq!(fp.pixel_center(9, 4), (19.0, 1.5));
    }

    #[test]
    fn test_non_finite_corner_is_projection_error() {
        let raster = ramp_raster(2, 2);
        assert!(matches!(
            compute_footprint(&raster, &Infinite),
            Err(TilerError::Projection(_))
        ));
    }

    #[test]
    fn test_wgs84_to_utm_footprint() {
        let registry = CrsRegistry::with_epsg_database();
        let transform = registry
            .transformer(&CrsId::wgs84(), &CrsId::epsg(32633))
            .unwrap();
        let raster = test_utils::elevation_raster(50, 50, bbox::alps_wgs84());
        let fp = compute_footprint(&raster, &transform).unwrap();

        assert_eq!(fp.target_crs, CrsId::epsg(32633));
        // Half a degree is roughly 38 km east-west and 55 km north-south here.
        assert!(fp.target_bounds.width() > 35_000.0 && fp.target_bounds.width() < 42_000.0);
        assert!(fp.target_bounds.height() > 53_000.0 && fp.target_bounds.height() < 58_000.0);
        assert!(fp.target_bounds.min_y > 5_100_000.0 && fp.target_bounds.max_y < 5_250_000.0);
        assert!((fp.target_resolution.0 - fp.target_bounds.width() / 50.0).abs() < 1e-9);
    }
}
