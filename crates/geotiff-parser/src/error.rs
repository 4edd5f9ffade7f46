//! Error types for GeoTIFF parsing operations.

use thiserror::Error;
use tiler_common::TilerError;

/// Result type for GeoTIFF parser operations.
pub type GeoTiffResult<T> = Result<T, GeoTiffError>;

/// Error types for GeoTIFF parsing.
#[derive(Error, Debug)]
pub enum GeoTiffError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error reported by the TIFF decoder
    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    /// Missing required tag
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl From<GeoTiffError> for TilerError {
    fn from(err: GeoTiffError) -> Self {
        TilerError::Decode(err.to_string())
    }
}
