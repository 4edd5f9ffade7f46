//! Input discovery.

use std::path::{Path, PathBuf};

use tiler_common::{TilerError, TilerResult};
use walkdir::WalkDir;

/// Whether `path` has a `.tif`/`.tiff` extension (any case).
pub fn is_geotiff_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff"))
        .unwrap_or(false)
}

/// Expand input paths into a sorted, de-duplicated list of rasters.
///
/// Files are taken as given; directories are walked recursively for
/// GeoTIFFs, skipping hidden entries such as staging directories.
pub fn discover_inputs<P: AsRef<Path>>(inputs: &[P]) -> TilerResult<Vec<PathBuf>> {
    let mut found = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        if input.is_file() {
            found.push(input.to_path_buf());
            continue;
        }
        if !input.is_dir() {
            return Err(TilerError::Io(format!(
                "Input path does not exist: {}",
                input.display()
            )));
        }

        let walker = WalkDir::new(input)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
        for entry in walker {
            let entry = entry.map_err(|e| TilerError::Io(e.to_string()))?;
            if entry.file_type().is_file() && is_geotiff_path(entry.path()) {
                found.push(entry.into_path());
            }
        }
    }

    found.sort();
    found.dedup();
    tracing::debug!(count = found.len(), "Discovered input rasters");
    Ok(found)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().map(|s| s.starts_with('.')).unwrap_or(false)
}
