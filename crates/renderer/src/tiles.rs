//! Slicing a normalized grid into fixed-size tiles.

use rayon::prelude::*;
use tiler_common::{checked_tile_size, tile_file_name, TileExtent, TileGrid, TilerResult};

use crate::normalize::NormalizedGrid;
use crate::png;

/// One RGBA tile, owning its pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub row: usize,
    pub col: usize,
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl Tile {
    /// `tile_<row>_<col>.<ext>`
    pub fn file_name(&self, ext: &str) -> String {
        tile_file_name(self.row, self.col, ext)
    }

    /// Encode as PNG, indexed when the tile has few enough colors.
    pub fn encode_png(&self) -> TilerResult<Vec<u8>> {
        png::create_png_auto(&self.pixels, self.width, self.height)
    }
}

fn copy_extent(grid: &NormalizedGrid, extent: TileExtent) -> Tile {
    let stride = grid.width * 4;
    let row_bytes = extent.width * 4;
    let mut pixels = Vec::with_capacity(extent.area() * 4);

    for y in extent.y..extent.y + extent.height {
        let start = y * stride + extent.x * 4;
        pixels.extend_from_slice(&grid.pixels[start..start + row_bytes]);
    }

    Tile {
        row: extent.row,
        col: extent.col,
        width: extent.width,
        height: extent.height,
        pixels,
    }
}

/// Cut `grid` into tiles of `tile_size`, in row-major order.
///
/// Edge tiles are truncated to the remaining pixels. Fails with
/// `InvalidTileSize` when `tile_size <= 0`.
pub fn slice(grid: &NormalizedGrid, tile_size: i64) -> TilerResult<(Vec<Tile>, TileGrid)> {
    let tile_size = checked_tile_size(tile_size)?;
    let tile_grid = TileGrid::new(grid.width, grid.height, tile_size)?;

    let extents: Vec<TileExtent> = tile_grid.extents().collect();
    let tiles: Vec<Tile> = extents
        .into_par_iter()
        .map(|extent| copy_extent(grid, extent))
        .collect();

    tracing::debug!(
        columns = tile_grid.columns,
        rows = tile_grid.rows,
        tile_size,
        "Sliced tiles"
    );
    Ok((tiles, tile_grid))
}

/// Encode every tile as PNG in parallel, preserving order.
pub fn encode_tiles(tiles: &[Tile]) -> TilerResult<Vec<Vec<u8>>> {
    tiles.par_iter().map(Tile::encode_png).collect()
}
