//! Error types for the terrain tiler.

use thiserror::Error;

/// Result type alias using TilerError.
pub type TilerResult<T> = Result<T, TilerError>;

/// Primary error type for raster-to-tile processing.
///
/// Every variant aborts the job for the raster being processed; a batch
/// runner reports it and moves on to the next input.
#[derive(Debug, Error)]
pub enum TilerError {
    // === Core pipeline errors ===
    #[error("Projection error: {0}")]
    Projection(String),

    #[error("No valid elevation samples: value range is empty")]
    EmptyRange,

    #[error("Invalid tile size {0}: must be greater than zero")]
    InvalidTileSize(i64),

    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    // === Collaborator errors ===
    #[error("Failed to decode raster: {0}")]
    Decode(String),

    #[error("Failed to encode tile: {0}")]
    Encode(String),

    #[error("Mesh tool failed: {0}")]
    MeshTool(String),

    // === Infrastructure errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl TilerError {
    /// Short machine-readable kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            TilerError::Projection(_) => "projection",
            TilerError::EmptyRange => "empty_range",
            TilerError::InvalidTileSize(_) => "invalid_tile_size",
            TilerError::InvalidRaster(_) => "invalid_raster",
            TilerError::Decode(_) => "decode",
            TilerError::Encode(_) => "encode",
            TilerError::MeshTool(_) => "mesh_tool",
            TilerError::Config(_) => "config",
            TilerError::Io(_) => "io",
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for TilerError {
    fn from(err: std::io::Error) -> Self {
        TilerError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TilerError {
    fn from(err: serde_json::Error) -> Self {
        TilerError::Io(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TilerError::InvalidTileSize(0).to_string(),
            "Invalid tile size 0: must be greater than zero"
        );
        assert!(TilerError::Projection("EPSG:1 unknown".into())
            .to_string()
            .contains("EPSG:1 unknown"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.tif");
        let err: TilerError = io.into();
        assert_eq!(err.kind(), "io");
        assert!(err.to_string().contains("missing.tif"));
    }
}
