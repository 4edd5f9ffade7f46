//! Tile grid geometry.
//!
//! This is the single implementation of the tile sizing rule: the slicer
//! uses it to cut tiles and metadata consumers use it to rebuild the
//! layout from `tileSize`, `tileGrid` and `reprojectedDimensions`.

use serde::{Deserialize, Serialize};

use crate::metadata::{TileGridShape, TilesetMetadata};
use crate::{TilerError, TilerResult};

/// File name for a tile image: `tile_<row>_<col>.<ext>`.
pub fn tile_file_name(row: usize, col: usize, ext: &str) -> String {
    format!("tile_{}_{}.{}", row, col, ext)
}

/// Validate a signed tile size from configuration or metadata.
pub fn checked_tile_size(tile_size: i64) -> TilerResult<usize> {
    usize::try_from(tile_size)
        .ok()
        .filter(|&size| size > 0)
        .ok_or(TilerError::InvalidTileSize(tile_size))
}

/// Row/column partition of a `width` x `height` raster into square tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    pub width: usize,
    pub height: usize,
    pub tile_size: usize,
    pub columns: usize,
    pub rows: usize,
}

/// Pixel rectangle covered by one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileExtent {
    pub row: usize,
    pub col: usize,
    /// Left pixel column in the full raster.
    pub x: usize,
    /// Top pixel row in the full raster.
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl TileExtent {
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl TileGrid {
    /// Build the grid for a raster. At least one row and column always exist.
    pub fn new(width: usize, height: usize, tile_size: usize) -> TilerResult<Self> {
        if tile_size == 0 {
            return Err(TilerError::InvalidTileSize(0));
        }
        if width == 0 || height == 0 {
            return Err(TilerError::InvalidRaster(format!(
                "cannot tile an empty {}x{} raster",
                width, height
            )));
        }

        Ok(Self {
            width,
            height,
            tile_size,
            columns: width.div_ceil(tile_size),
            rows: height.div_ceil(tile_size),
        })
    }

    /// Rebuild the grid from a metadata record alone.
    ///
    /// Fails if the stored `tileGrid` disagrees with what `tileSize` and
    /// `reprojectedDimensions` imply.
    pub fn from_metadata(metadata: &TilesetMetadata) -> TilerResult<Self> {
        let dims = metadata.reprojected_dimensions;
        let tile_size = checked_tile_size(metadata.tile_size)?;
        let grid = Self::new(dims.width, dims.height, tile_size)?;

        if grid.shape() != metadata.tile_grid {
            return Err(TilerError::InvalidRaster(format!(
                "metadata tileGrid {}x{} does not match {}x{} implied by dimensions",
                metadata.tile_grid.columns, metadata.tile_grid.rows, grid.columns, grid.rows
            )));
        }
        Ok(grid)
    }

    pub fn shape(&self) -> TileGridShape {
        TileGridShape {
            columns: self.columns,
            rows: self.rows,
        }
    }

    pub fn tile_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Span of tile `index` along an axis of length `dimension`.
    ///
    /// Only the last tile can be short: `dimension mod tile_size`, or a
    /// full tile when the dimension divides evenly.
    fn span(&self, index: usize, dimension: usize) -> usize {
        self.tile_size.min(dimension - index * self.tile_size)
    }

    /// Extent of the tile at (row, col), or `None` outside the grid.
    pub fn extent(&self, row: usize, col: usize) -> Option<TileExtent> {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        Some(TileExtent {
            row,
            col,
            x: col * self.tile_size,
            y: row * self.tile_size,
            width: self.span(col, self.width),
            height: self.span(row, self.height),
        })
    }

    /// All tile extents in row-major order (row 0 first, columns left to right).
    pub fn extents(&self) -> impl Iterator<Item = TileExtent> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.columns).filter_map(move |col| self.extent(row, col)))
    }
}
