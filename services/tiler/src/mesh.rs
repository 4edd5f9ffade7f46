//! Hook for the external heightmap-to-mesh tool.
//!
//! Tiles encode elevation linearly within `valueRange`, so the tool needs
//! the elevation span expressed in ground units per pixel to rebuild a
//! correctly proportioned surface.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use tiler_common::{TilerError, TilerResult, TilesetMetadata};

/// Arguments for one mesh tool invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshParams {
    /// `(valueRange.max - valueRange.min) / mean(resolution.x, resolution.y)`
    pub z_scale: f64,
    pub max_error: f64,
}

impl MeshParams {
    pub fn from_metadata(metadata: &TilesetMetadata, max_error: f64) -> Self {
        Self {
            z_scale: metadata.value_range.span() / metadata.resolution.mean(),
            max_error,
        }
    }

    /// `-z <z_scale> -e <max_error> <tile>`
    pub fn args(&self, tile: &Path) -> Vec<OsString> {
        vec![
            "-z".into(),
            self.z_scale.to_string().into(),
            "-e".into(),
            self.max_error.to_string().into(),
            tile.as_os_str().to_owned(),
        ]
    }
}

/// Run `command` once per tile, stopping at the first failure.
pub fn run_mesh_tool<P: AsRef<Path>>(
    command: &str,
    params: &MeshParams,
    tiles: &[P],
) -> TilerResult<()> {
    for tile in tiles {
        let tile = tile.as_ref();
        let status = Command::new(command)
            .args(params.args(tile))
            .status()
            .map_err(|e| TilerError::MeshTool(format!("Failed to start {}: {}", command, e)))?;

        if !status.success() {
            return Err(TilerError::MeshTool(format!(
                "{} exited with {} for {}",
                command,
                status,
                tile.display()
            )));
        }
        tracing::debug!(tile = %tile.display(), "Mesh generated");
    }
    Ok(())
}
