//! Test fixtures for common elevation raster scenarios.
//!
//! These fixtures provide pre-configured bounds and rasters for
//! consistent testing across the codebase.

use tiler_common::{BoundingBox, Raster};

use crate::generators::{create_elevation_grid, create_ramp_grid};

/// Common bounding boxes used in tests.
pub mod bbox {
    use tiler_common::BoundingBox;

    /// A half-degree square in the Eastern Alps (EPSG:4326, UTM zone 33N).
    pub fn alps_wgs84() -> BoundingBox {
        BoundingBox::new(14.0, 46.5, 14.5, 47.0)
    }

    /// A small patch in the Andes (EPSG:4326, UTM zone 19S).
    pub fn andes_wgs84() -> BoundingBox {
        BoundingBox::new(-70.5, -33.5, -70.25, -33.25)
    }

    /// A 10 km square in UTM zone 33N (EPSG:32633), metres.
    pub fn utm33_square() -> BoundingBox {
        BoundingBox::new(400_000.0, 5_100_000.0, 410_000.0, 5_110_000.0)
    }

    /// Pixel-unit bounds: one unit per pixel with the origin at bottom-left.
    pub fn unit_pixels(width: usize, height: usize) -> BoundingBox {
        BoundingBox::new(0.0, 0.0, width as f64, height as f64)
    }
}

/// A ramp raster in pixel-unit bounds with a `-9999` sentinel.
pub fn ramp_raster(width: usize, height: usize) -> Raster {
    Raster::new(
        width,
        height,
        create_ramp_grid(width, height),
        bbox::unit_pixels(width, height),
        -9999.0,
    )
    .expect("ramp fixture is valid")
}

/// A terrain-like raster over the given bounds with a `-9999` sentinel.
pub fn elevation_raster(width: usize, height: usize, bounds: BoundingBox) -> Raster {
    Raster::new(
        width,
        height,
        create_elevation_grid(width, height),
        bounds,
        -9999.0,
    )
    .expect("elevation fixture is valid")
}
