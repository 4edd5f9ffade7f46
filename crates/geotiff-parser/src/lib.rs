//! GeoTIFF parser for elevation rasters.
//!
//! Reads the first band of a GeoTIFF together with the georeferencing the
//! tiling pipeline needs:
//!
//! - **Bounds** from ModelTiepoint (33922) + ModelPixelScale (33550)
//! - **Nodata** from GDAL_NODATA (42113)
//! - **CRS** from the GeoKeyDirectory (34735)
//!
//! All numeric sample types are widened to `f32`.

pub mod error;
pub mod geokeys;
pub mod reader;

pub use error::{GeoTiffError, GeoTiffResult};
pub use geokeys::epsg_from_geokeys;
pub use reader::{read_geotiff, GeoTiff};
