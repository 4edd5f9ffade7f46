//! GeoTIFF decoding.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tiler_common::{BoundingBox, CrsId, Raster, TilerResult};
use tracing::debug;

use crate::geokeys::epsg_from_geokeys;
use crate::{GeoTiffError, GeoTiffResult};

// tiff parses these into named variants; `Tag::Unknown(n)` never matches them.
const MODEL_PIXEL_SCALE: Tag = Tag::ModelPixelScaleTag;
const MODEL_TIEPOINT: Tag = Tag::ModelTiepointTag;
const GEO_KEY_DIRECTORY: Tag = Tag::GeoKeyDirectoryTag;
const GDAL_NODATA: Tag = Tag::GdalNodata;

/// A decoded single-band GeoTIFF.
#[derive(Debug, Clone)]
pub struct GeoTiff {
    pub width: usize,
    pub height: usize,
    /// First-band samples, row-major, row 0 at the north edge.
    pub data: Vec<f32>,
    pub bounds: BoundingBox,
    /// Sentinel declared by the file, if any.
    pub nodata: Option<f32>,
    /// CRS declared in the GeoKeyDirectory, if it names an EPSG code.
    pub crs: Option<CrsId>,
}

impl GeoTiff {
    /// Convert into a pipeline raster.
    ///
    /// The sentinel is the file's declared value, else `fallback_nodata`,
    /// else NaN (so only NaN samples count as missing).
    pub fn into_raster(self, fallback_nodata: Option<f32>) -> TilerResult<Raster> {
        let nodata = self.nodata.or(fallback_nodata).unwrap_or(f32::NAN);
        Raster::new(self.width, self.height, self.data, self.bounds, nodata)
    }
}

/// Read a GeoTIFF elevation raster from disk.
pub fn read_geotiff<P: AsRef<Path>>(path: P) -> GeoTiffResult<GeoTiff> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut decoder = Decoder::new(file)?;

    // Large DEMs exceed the default decoder limits
    let mut limits = Limits::default();
    limits.decoding_buffer_size = 1024 * 1024 * 1024; // 1 GB
    limits.intermediate_buffer_size = 1024 * 1024 * 1024; // 1 GB
    limits.ifd_value_size = 1024 * 1024 * 1024;
    decoder = decoder.with_limits(limits);

    let (width, height) = decoder.dimensions()?;
    let (width, height) = (width as usize, height as usize);

    let bounds = read_bounds(&mut decoder, width, height)?;
    let nodata = read_nodata_value(&mut decoder);
    let crs = read_crs(&mut decoder);
    let data = decode_first_band(&mut decoder, width, height)?;

    debug!(
        file = %path.display(),
        width,
        height,
        nodata = ?nodata,
        crs = ?crs.as_ref().map(|c| c.to_string()),
        "Decoded GeoTIFF"
    );

    Ok(GeoTiff {
        width,
        height,
        data,
        bounds,
        nodata,
        crs,
    })
}

/// Bounds from the tiepoint/pixel-scale pair.
///
/// The tiepoint ties raster position (i, j) to model (x, y); the top-left
/// corner is recovered from it, and the grid extends east and south.
fn read_bounds<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    width: usize,
    height: usize,
) -> GeoTiffResult<BoundingBox> {
    let tiepoint = decoder
        .get_tag_f64_vec(MODEL_TIEPOINT)
        .map_err(|_| GeoTiffError::MissingData("ModelTiepoint tag (33922)".to_string()))?;
    let scale = decoder
        .get_tag_f64_vec(MODEL_PIXEL_SCALE)
        .map_err(|_| GeoTiffError::MissingData("ModelPixelScale tag (33550)".to_string()))?;

    if tiepoint.len() < 6 || scale.len() < 2 {
        return Err(GeoTiffError::InvalidFormat(format!(
            "tiepoint has {} values and pixel scale {}; expected at least 6 and 2",
            tiepoint.len(),
            scale.len()
        )));
    }

    let (tie_i, tie_j, tie_x, tie_y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);
    let (scale_x, scale_y) = (scale[0], scale[1]);
    if !(scale_x > 0.0 && scale_y > 0.0) {
        return Err(GeoTiffError::InvalidFormat(format!(
            "pixel scale must be positive, got ({}, {})",
            scale_x, scale_y
        )));
    }

    let min_x = tie_x - tie_i * scale_x;
    let max_y = tie_y + tie_j * scale_y;
    Ok(BoundingBox::new(
        min_x,
        max_y - height as f64 * scale_y,
        min_x + width as f64 * scale_x,
        max_y,
    ))
}

/// GDAL_NODATA is stored as an ASCII string.
fn read_nodata_value<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<f32> {
    let raw = decoder.get_tag_ascii_string(GDAL_NODATA).ok()?;
    let trimmed = raw.trim_matches(char::from(0)).trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "nan" | "-nan" => Some(f32::NAN),
        other => other.parse().ok(),
    }
}

fn read_crs<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<CrsId> {
    let directory = decoder.get_tag_u16_vec(GEO_KEY_DIRECTORY).ok()?;
    epsg_from_geokeys(&directory).map(CrsId::epsg)
}

fn decode_first_band<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    width: usize,
    height: usize,
) -> GeoTiffResult<Vec<f32>> {
    let samples = match decoder.read_image()? {
        DecodingResult::F32(data) => data,
        DecodingResult::F64(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I16(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I32(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U16(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U32(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U8(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I8(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U64(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I64(data) => data.into_iter().map(|v| v as f32).collect(),
    };

    let pixels = width * height;
    if pixels == 0 || samples.len() % pixels != 0 {
        return Err(GeoTiffError::InvalidFormat(format!(
            "{} samples do not divide into {}x{} pixels",
            samples.len(),
            width,
            height
        )));
    }

    // Chunky multi-band images interleave samples; keep band 1.
    let samples_per_pixel = samples.len() / pixels;
    if samples_per_pixel == 1 {
        return Ok(samples);
    }
    debug!(samples_per_pixel, "Multi-band GeoTIFF, using first band");
    Ok(samples.into_iter().step_by(samples_per_pixel).collect())
}
