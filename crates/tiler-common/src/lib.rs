//! Common types shared across all terrain-tiler crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod grid;
pub mod metadata;
pub mod raster;

pub use bbox::BoundingBox;
pub use crs::CrsId;
pub use error::{TilerError, TilerResult};
pub use grid::{checked_tile_size, tile_file_name, TileExtent, TileGrid};
pub use metadata::{Dimensions, Resolution, TileGridShape, TilesetMetadata, ValueRange};
pub use raster::{is_nodata, Raster, ResampledGrid};
