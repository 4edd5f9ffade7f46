//! Normalization, tiling and PNG encoding of resampled elevation grids.
//!
//! - [`normalize`]: value range and 8-bit grayscale RGBA with transparent nodata
//! - [`tiles`]: row-major slicing into fixed-size tiles, truncated at the edges
//! - [`png`]: indexed/RGBA PNG encoder for tile images

pub mod normalize;
pub mod png;
pub mod tiles;

pub use normalize::{normalize, normalize_value, value_range, NormalizedGrid, NODATA_PIXEL};
pub use tiles::{encode_tiles, slice, Tile};
