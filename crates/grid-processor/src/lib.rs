//! Footprint transformation and resampling for elevation rasters.
//!
//! This crate moves a single-band raster from its native CRS into a
//! destination CRS while keeping the pixel counts fixed:
//!
//! ```text
//! Raster (native CRS)
//!      │
//!      ▼
//! compute_footprint()    four corners → destination bbox + resolution
//!      │
//!      ▼
//! resample()             per destination pixel:
//!      │                   pixel centre → inverse transform → source
//!      │                   fractional pixel → bilinear or nodata
//!      ▼
//! ResampledGrid (destination CRS, same width × height)
//! ```
//!
//! Rows are resampled in parallel on the current rayon pool.
//!
//! # Example
//!
//! ```ignore
//! use grid_processor::{compute_footprint, resample};
//! use projection::CrsRegistry;
//!
//! let registry = CrsRegistry::with_epsg_database();
//! let transform = registry.transformer(&CrsId::wgs84(), &CrsId::epsg(32633))?;
//! let footprint = compute_footprint(&raster, &transform)?;
//! let grid = resample(&raster, &footprint, &transform);
//! ```

pub mod footprint;
pub mod resample;

// Re-export commonly used types at crate root
pub use footprint::{compute_footprint, Footprint};
pub use resample::{bilinear_interpolate, resample, resample_pixel, source_pixel};
