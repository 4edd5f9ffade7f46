//! The tileset metadata record.
//!
//! Written once per raster as `metadata.json` next to the tiles. Viewers and
//! mesh converters rely on nothing else, so key names are fixed.

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, CrsId};

/// Pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

/// Number of tile columns and rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGridShape {
    pub columns: usize,
    pub rows: usize,
}

/// Minimum and maximum over all valid samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub fn span(&self) -> f64 {
        self.max as f64 - self.min as f64
    }

    /// Single-valued range; every valid sample normalizes to full intensity.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Destination units per pixel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub x: f64,
    pub y: f64,
    pub unit: String,
}

impl Resolution {
    pub fn mean(&self) -> f64 {
        (self.x + self.y) / 2.0
    }
}

/// Metadata describing one reprojected, tiled raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilesetMetadata {
    #[serde(rename = "sourceCRS")]
    pub source_crs: CrsId,
    #[serde(rename = "targetCRS")]
    pub target_crs: CrsId,
    pub original_bounds: BoundingBox,
    /// Destination-space bounding box. The key is historical and used for
    /// any target CRS.
    pub utm_bounds: BoundingBox,
    pub original_dimensions: Dimensions,
    pub reprojected_dimensions: Dimensions,
    pub tile_size: i64,
    pub tile_grid: TileGridShape,
    pub value_range: ValueRange,
    pub resolution: Resolution,
}

impl TilesetMetadata {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
