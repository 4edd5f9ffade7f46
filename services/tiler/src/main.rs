//! Elevation GeoTIFF tiler.
//!
//! Reprojects each input raster, normalizes it to 8-bit grayscale and
//! writes fixed-size PNG tiles with a metadata record per raster.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use projection::CrsRegistry;
use tiler::config::DEFAULT_MESH_MAX_ERROR;
use tiler::{discover_inputs, run_batch, MeshConfig, TilerConfig};
use tiler_common::CrsId;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "tiler")]
#[command(about = "Reproject elevation GeoTIFFs and cut them into PNG tiles")]
struct Args {
    /// GeoTIFF files or directories to process
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Tile edge length in pixels
    #[arg(short, long, allow_negative_numbers = true)]
    tile_size: Option<i64>,

    /// Destination CRS (e.g. EPSG:32633) or "auto"
    #[arg(long)]
    target_crs: Option<String>,

    /// Source CRS override (default: from the GeoTIFF, else EPSG:4326)
    #[arg(long)]
    source_crs: Option<String>,

    /// Nodata sentinel for files that do not declare one
    #[arg(long, allow_negative_numbers = true)]
    nodata: Option<f32>,

    /// Worker threads
    #[arg(long)]
    threads: Option<usize>,

    /// Mesh generator command run per tile
    #[arg(long)]
    mesh_command: Option<String>,

    /// Mesh generator maximum error
    #[arg(long)]
    mesh_max_error: Option<f64>,

    /// Replace existing output directories
    #[arg(long)]
    overwrite: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format (text or json)
    #[arg(long, default_value = "text")]
    log_format: String,
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // RUST_LOG, when set, takes precedence over --log-level
    let builder = FmtSubscriber::builder().with_target(true);
    if std::env::var_os("RUST_LOG").is_some() {
        let builder = builder.with_env_filter(EnvFilter::from_default_env());
        if json {
            tracing::subscriber::set_global_default(builder.json().finish())?;
        } else {
            tracing::subscriber::set_global_default(builder.finish())?;
        }
    } else {
        let builder = builder.with_max_level(level);
        if json {
            tracing::subscriber::set_global_default(builder.json().finish())?;
        } else {
            tracing::subscriber::set_global_default(builder.finish())?;
        }
    }
    Ok(())
}

/// Defaults, then YAML, then environment, then flags.
fn load_config(args: &Args) -> Result<TilerConfig> {
    let mut config = match &args.config {
        Some(path) => TilerConfig::from_yaml_file(path)?,
        None => TilerConfig::default(),
    };
    config.apply_env()?;

    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(size) = args.tile_size {
        config.tile_size = size;
    }
    if let Some(target) = &args.target_crs {
        config.target_crs = target.parse()?;
    }
    if let Some(source) = &args.source_crs {
        config.source_crs = Some(CrsId::parse(source)?);
    }
    if let Some(nodata) = args.nodata {
        config.nodata_override = Some(nodata);
    }
    if let Some(threads) = args.threads {
        config.threads = Some(threads);
    }
    if let Some(command) = &args.mesh_command {
        let max_error = config.mesh.as_ref().map(|m| m.max_error).unwrap_or(DEFAULT_MESH_MAX_ERROR);
        config.mesh = Some(MeshConfig {
            command: command.clone(),
            max_error,
        });
    }
    if let Some(max_error) = args.mesh_max_error {
        match config.mesh.as_mut() {
            Some(mesh) => mesh.max_error = max_error,
            None => warn!("--mesh-max-error given without a mesh command, ignoring"),
        }
    }
    if args.overwrite {
        config.overwrite = true;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_format.eq_ignore_ascii_case("json"))?;

    let config = load_config(&args)?;
    info!(
        target_crs = %config.target_crs,
        tile_size = config.tile_size,
        output_dir = %config.output_dir.display(),
        "Loaded configuration"
    );

    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let inputs = discover_inputs(&args.inputs)?;
    if inputs.is_empty() {
        bail!("No GeoTIFF inputs found");
    }
    info!(count = inputs.len(), "Processing rasters");

    let registry = CrsRegistry::with_epsg_database();
    let report = run_batch(&inputs, &config, &registry);

    for (input, output) in &report.succeeded {
        println!("{} -> {}", input.display(), output.display());
    }
    for (input, error) in &report.failed {
        eprintln!("{}: {}", input.display(), error);
    }

    if !report.all_succeeded() {
        bail!("{} of {} rasters failed", report.failed.len(), report.total());
    }
    Ok(())
}
