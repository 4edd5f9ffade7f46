//! Writing a finished tileset to disk.
//!
//! Everything is written into a hidden staging directory next to the final
//! location and renamed into place once complete, so a failed job never
//! leaves partial tiles or metadata behind.

use std::fs;
use std::path::{Path, PathBuf};

use tiler_common::{TilerError, TilerResult};

use crate::pipeline::Tileset;

/// Name of the metadata record inside each output directory.
pub const METADATA_FILE: &str = "metadata.json";

/// Staging directory used while writing `<output_dir>/<stem>/`.
pub fn staging_dir(output_dir: &Path, stem: &str) -> PathBuf {
    output_dir.join(format!(".{}.partial", stem))
}

/// Write tiles and metadata to `<output_dir>/<stem>/`.
///
/// An existing directory is an error unless `overwrite` is set, in which
/// case it is replaced only after the new one is complete.
pub fn write_tileset(
    output_dir: &Path,
    stem: &str,
    tileset: &Tileset,
    extension: &str,
    overwrite: bool,
) -> TilerResult<PathBuf> {
    let final_dir = output_dir.join(stem);
    if final_dir.exists() && !overwrite {
        return Err(TilerError::Io(format!(
            "Output directory {} already exists (set overwrite to replace it)",
            final_dir.display()
        )));
    }

    fs::create_dir_all(output_dir)?;
    let staging = staging_dir(output_dir, stem);
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }

    if let Err(e) = write_contents(&staging, tileset, extension) {
        // Best effort; the original error is what gets reported
        let _ = fs::remove_dir_all(&staging);
        return Err(e);
    }

    if final_dir.exists() {
        fs::remove_dir_all(&final_dir)?;
    }
    fs::rename(&staging, &final_dir).map_err(|e| {
        let _ = fs::remove_dir_all(&staging);
        TilerError::Io(format!(
            "Failed to move {} to {}: {}",
            staging.display(),
            final_dir.display(),
            e
        ))
    })?;

    Ok(final_dir)
}

fn write_contents(dir: &Path, tileset: &Tileset, extension: &str) -> TilerResult<()> {
    fs::create_dir_all(dir)?;

    for (tile, bytes) in tileset.tiles.iter().zip(&tileset.encoded) {
        fs::write(dir.join(tile.file_name(extension)), bytes)?;
    }

    let json = tileset.metadata.to_json_pretty()?;
    fs::write(dir.join(METADATA_FILE), json)?;
    Ok(())
}
