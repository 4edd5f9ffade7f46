//! Per-raster processing and the batch runner.
//!
//! ```text
//! GeoTIFF ─► Raster ─► Footprint ─► ResampledGrid ─► NormalizedGrid ─► tiles + metadata
//! ```
//!
//! Each raster is all-or-nothing: nothing is written until every stage has
//! succeeded. A failing raster never stops the rest of a batch.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use grid_processor::{compute_footprint, resample, Footprint};
use projection::{utm_zone_for, CoordinateTransform, CrsRegistry};
use rayon::prelude::*;
use renderer::{encode_tiles, normalize, slice, Tile};
use tiler_common::{
    checked_tile_size, CrsId, Dimensions, Raster, Resolution, TileGridShape, TilerError,
    TilerResult, TilesetMetadata, ValueRange,
};
use tracing::{error, info};

use crate::config::{TargetCrs, TilerConfig};
use crate::mesh::{run_mesh_tool, MeshParams};
use crate::output::write_tileset;

/// A fully computed tileset, ready to be written.
#[derive(Debug, Clone)]
pub struct Tileset {
    pub metadata: TilesetMetadata,
    pub tiles: Vec<Tile>,
    /// Encoded tile images, parallel to `tiles`.
    pub encoded: Vec<Vec<u8>>,
}

/// Resolve `target` for a raster in `source`.
///
/// `Auto` picks the UTM zone containing the centre of the raster.
pub fn resolve_target_crs(
    registry: &CrsRegistry,
    raster: &Raster,
    source: &CrsId,
    target: &TargetCrs,
) -> TilerResult<CrsId> {
    match target {
        TargetCrs::Fixed(id) => Ok(id.clone()),
        TargetCrs::Auto => {
            let (cx, cy) = raster.bounds().center();
            let (lon, lat) = registry.transformer(source, &CrsId::wgs84())?.forward(cx, cy)?;
            Ok(utm_zone_for(lon, lat))
        }
    }
}

/// Build the metadata record for a processed raster.
pub fn build_metadata(
    raster: &Raster,
    footprint: &Footprint,
    tile_size: i64,
    tile_grid: TileGridShape,
    value_range: ValueRange,
    unit: &str,
) -> TilesetMetadata {
    TilesetMetadata {
        source_crs: footprint.source_crs.clone(),
        target_crs: footprint.target_crs.clone(),
        original_bounds: raster.bounds(),
        utm_bounds: footprint.target_bounds,
        original_dimensions: Dimensions {
            width: raster.width(),
            height: raster.height(),
        },
        reprojected_dimensions: Dimensions {
            width: footprint.width,
            height: footprint.height,
        },
        tile_size,
        tile_grid,
        value_range,
        resolution: Resolution {
            x: footprint.target_resolution.0,
            y: footprint.target_resolution.1,
            unit: unit.to_string(),
        },
    }
}

/// Reproject, normalize and tile one raster entirely in memory.
pub fn build_tileset(
    registry: &CrsRegistry,
    raster: &Raster,
    source: &CrsId,
    target: &TargetCrs,
    tile_size: i64,
) -> TilerResult<Tileset> {
    // Reject bad sizes before the expensive stages
    checked_tile_size(tile_size)?;

    let target = resolve_target_crs(registry, raster, source, target)?;
    let transform = registry.transformer(source, &target)?;
    let footprint = compute_footprint(raster, &transform)?;
    let grid = resample(raster, &footprint, &transform);
    let (value_range, normalized) = normalize(&grid)?;
    let (tiles, tile_grid) = slice(&normalized, tile_size)?;
    let encoded = encode_tiles(&tiles)?;

    let metadata = build_metadata(
        raster,
        &footprint,
        tile_size,
        tile_grid.shape(),
        value_range,
        registry.unit_name(&target)?,
    );

    Ok(Tileset {
        metadata,
        tiles,
        encoded,
    })
}

/// Name of the output directory for `path`: its file stem.
pub fn output_stem(path: &Path) -> TilerResult<&str> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| TilerError::Io(format!("Cannot derive a name from {}", path.display())))
}

/// Process one GeoTIFF and return its committed output directory.
pub fn process_file(
    path: &Path,
    config: &TilerConfig,
    registry: &CrsRegistry,
) -> TilerResult<PathBuf> {
    let start = Instant::now();
    let stem = output_stem(path)?;

    let geotiff = geotiff_parser::read_geotiff(path)?;
    let source = config
        .source_crs
        .clone()
        .or_else(|| geotiff.crs.clone())
        .unwrap_or_else(CrsId::wgs84);
    let raster = geotiff.into_raster(config.nodata_override)?;

    let tileset = build_tileset(
        registry,
        &raster,
        &source,
        &config.target_crs,
        config.tile_size,
    )?;
    let extension = config.image_format.extension();
    let out_dir = write_tileset(
        &config.output_dir,
        stem,
        &tileset,
        extension,
        config.overwrite,
    )?;

    info!(
        file = %path.display(),
        output = %out_dir.display(),
        source = %tileset.metadata.source_crs,
        target = %tileset.metadata.target_crs,
        columns = tileset.metadata.tile_grid.columns,
        rows = tileset.metadata.tile_grid.rows,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Wrote tileset"
    );

    if let Some(mesh) = &config.mesh {
        let params = MeshParams::from_metadata(&tileset.metadata, mesh.max_error);
        let tile_paths: Vec<PathBuf> = tileset
            .tiles
            .iter()
            .map(|t| out_dir.join(t.file_name(extension)))
            .collect();
        run_mesh_tool(&mesh.command, &params, &tile_paths)?;
        info!(file = %path.display(), z_scale = params.z_scale, "Generated meshes");
    }

    Ok(out_dir)
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// (input, output directory)
    pub succeeded: Vec<(PathBuf, PathBuf)>,
    /// (input, error)
    pub failed: Vec<(PathBuf, TilerError)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Process every input as an independent job on the rayon pool.
///
/// Inputs that share a file stem would share an output directory, so all of
/// them fail with a config error before any job starts.
pub fn run_batch(inputs: &[PathBuf], config: &TilerConfig, registry: &CrsRegistry) -> BatchReport {
    let mut stem_counts: HashMap<&str, usize> = HashMap::new();
    for path in inputs {
        if let Ok(stem) = output_stem(path) {
            *stem_counts.entry(stem).or_default() += 1;
        }
    }

    let results: Vec<(PathBuf, TilerResult<PathBuf>)> = inputs
        .par_iter()
        .map(|path| {
            let result = match output_stem(path) {
                Ok(stem) if stem_counts.get(stem).copied().unwrap_or(0) > 1 => {
                    Err(TilerError::Config(format!(
                        "{} shares the output name '{}' with another input",
                        path.display(),
                        stem
                    )))
                }
                _ => process_file(path, config, registry),
            };
            (path.clone(), result)
        })
        .collect();

    let mut report = BatchReport::default();
    for (path, result) in results {
        match result {
            Ok(out_dir) => report.succeeded.push((path, out_dir)),
            Err(e) => {
                error!(file = %path.display(), kind = e.kind(), error = %e, "Failed to process raster");
                report.failed.push((path, e));
            }
        }
    }

    info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "Batch complete"
    );
    report
}
