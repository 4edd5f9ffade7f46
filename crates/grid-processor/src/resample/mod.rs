//! Inverse-mapped resampling into the destination grid.

pub mod interpolation;
pub mod reproject;

pub use interpolation::bilinear_interpolate;
pub use reproject::{resample, resample_pixel, source_pixel};
