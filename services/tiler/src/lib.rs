//! GeoTIFF reprojection and tiling service.
//!
//! Turns elevation GeoTIFFs into per-raster directories of grayscale PNG
//! tiles plus a `metadata.json` describing the tile grid, optionally
//! handing each tile to an external mesh generator.

pub mod config;
pub mod discovery;
pub mod mesh;
pub mod output;
pub mod pipeline;

pub use config::{ImageFormat, MeshConfig, TargetCrs, TilerConfig};
pub use discovery::discover_inputs;
pub use mesh::MeshParams;
pub use output::{write_tileset, METADATA_FILE};
pub use pipeline::{build_tileset, output_stem, process_file, run_batch, BatchReport, Tileset};
