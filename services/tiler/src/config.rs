//! Tiler configuration.
//!
//! Layered as defaults, then an optional YAML file, then `TILER_*`
//! environment variables, then command-line flags (applied by `main`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tiler_common::{checked_tile_size, CrsId, TilerError, TilerResult};

/// Destination CRS selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TargetCrs {
    /// WGS84 UTM zone containing the raster's centre.
    Auto,
    Fixed(CrsId),
}

impl FromStr for TargetCrs {
    type Err = TilerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(TargetCrs::Auto)
        } else {
            CrsId::parse(s).map(TargetCrs::Fixed)
        }
    }
}

impl TryFrom<String> for TargetCrs {
    type Error = TilerError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TargetCrs> for String {
    fn from(target: TargetCrs) -> Self {
        target.to_string()
    }
}

impl fmt::Display for TargetCrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetCrs::Auto => write!(f, "auto"),
            TargetCrs::Fixed(id) => write!(f, "{}", id),
        }
    }
}

/// Tile image format. Only PNG is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = TilerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            other => Err(TilerError::Config(format!(
                "Unsupported image format '{}': only png is supported",
                other
            ))),
        }
    }
}

/// External heightmap-to-mesh tool invoked per tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Executable name or path
    pub command: String,

    /// Maximum triangulation error passed as `-e`
    #[serde(default = "default_max_error")]
    pub max_error: f64,
}

/// Mesh error tolerance used when none is configured.
pub const DEFAULT_MESH_MAX_ERROR: f64 = 0.5;

fn default_max_error() -> f64 {
    DEFAULT_MESH_MAX_ERROR
}

/// Top-level tiler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilerConfig {
    /// Destination CRS, or `auto` for the UTM zone of the raster centre
    pub target_crs: TargetCrs,

    /// Source CRS override; otherwise read from the GeoTIFF, else EPSG:4326
    pub source_crs: Option<CrsId>,

    /// Tile edge length in pixels
    pub tile_size: i64,

    /// Root output directory; each raster gets `<output_dir>/<stem>/`
    pub output_dir: PathBuf,

    pub image_format: ImageFormat,

    /// Sentinel used when a file declares none
    pub nodata_override: Option<f32>,

    /// Worker threads (default: rayon's choice)
    pub threads: Option<usize>,

    pub mesh: Option<MeshConfig>,

    /// Replace existing per-raster output directories
    pub overwrite: bool,
}

impl Default for TilerConfig {
    fn default() -> Self {
        Self {
            target_crs: TargetCrs::Auto,
            source_crs: None,
            tile_size: 256,
            output_dir: PathBuf::from("output"),
            image_format: ImageFormat::Png,
            nodata_override: None,
            threads: None,
            mesh: None,
            overwrite: false,
        }
    }
}

impl TilerConfig {
    /// Load from a YAML file. Missing keys take their defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> TilerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TilerError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
            .map_err(|e| TilerError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml_str(content: &str) -> TilerResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| TilerError::Config(format!("Invalid YAML configuration: {}", e)))
    }

    /// Apply `TILER_*` variables from the process environment.
    pub fn apply_env(&mut self) -> TilerResult<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `TILER_*` variables from any lookup function.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> TilerResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TILER_TARGET_CRS") {
            self.target_crs = v.parse()?;
        }
        if let Some(v) = lookup("TILER_SOURCE_CRS") {
            self.source_crs = Some(CrsId::parse(&v)?);
        }
        if let Some(v) = lookup("TILER_TILE_SIZE") {
            self.tile_size = parse_var("TILER_TILE_SIZE", &v)?;
        }
        if let Some(v) = lookup("TILER_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("TILER_THREADS") {
            self.threads = Some(parse_var("TILER_THREADS", &v)?);
        }
        if let Some(command) = lookup("TILER_MESH_COMMAND") {
            let max_error = self
                .mesh
                .as_ref()
                .map(|m| m.max_error)
                .unwrap_or_else(default_max_error);
            self.mesh = Some(MeshConfig { command, max_error });
        }
        if let Some(v) = lookup("TILER_MESH_MAX_ERROR") {
            let max_error = parse_var("TILER_MESH_MAX_ERROR", &v)?;
            match self.mesh.as_mut() {
                Some(mesh) => mesh.max_error = max_error,
                None => {
                    tracing::warn!("TILER_MESH_MAX_ERROR set without a mesh command, ignoring")
                }
            }
        }
        Ok(())
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> TilerResult<()> {
        checked_tile_size(self.tile_size)?;

        if self.threads == Some(0) {
            return Err(TilerError::Config("threads must be at least 1".to_string()));
        }
        if let Some(mesh) = &self.mesh {
            if mesh.command.trim().is_empty() {
                return Err(TilerError::Config("mesh.command is empty".to_string()));
            }
            if !(mesh.max_error.is_finite() && mesh.max_error > 0.0) {
                return Err(TilerError::Config(format!(
                    "mesh.max_error must be positive, got {}",
                    mesh.max_error
                )));
            }
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> TilerResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| TilerError::Config(format!("Invalid value for {}: '{}'", key, value)))
}
