//! Minimal GeoTIFF writer for decoder and end-to-end tests.
//!
//! Writes a single-band `f32` image with the ModelPixelScale and
//! ModelTiepoint tags, an optional GDAL_NODATA string and an optional
//! GeoKeyDirectory naming an EPSG code.

use std::fs::File;
use std::path::Path;

use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;
use tiff::TiffResult;
use tiler_common::BoundingBox;

/// GeoKey for a projected CRS code.
const PROJECTED_CS_TYPE: u16 = 3072;
/// GeoKey for a geographic CRS code.
const GEOGRAPHIC_TYPE: u16 = 2048;
/// GeoKey for the raster model type (1 = projected, 2 = geographic).
const MODEL_TYPE: u16 = 1024;

/// Description of a GeoTIFF to write.
#[derive(Debug, Clone)]
pub struct GeoTiffSpec<'a> {
    pub width: u32,
    pub height: u32,
    pub data: &'a [f32],
    pub bounds: BoundingBox,
    pub nodata: Option<f32>,
    pub epsg: Option<u16>,
}

/// Write `spec` to `path` as a striped, uncompressed GeoTIFF.
pub fn write_test_geotiff<P: AsRef<Path>>(path: P, spec: &GeoTiffSpec<'_>) -> TiffResult<()> {
    let file = File::create(path)?;
    let mut encoder = TiffEncoder::new(file)?;
    let mut image = encoder.new_image::<colortype::Gray32Float>(spec.width, spec.height)?;

    let scale_x = spec.bounds.width() / spec.width as f64;
    let scale_y = spec.bounds.height() / spec.height as f64;
    image
        .encoder()
        .write_tag(Tag::ModelPixelScaleTag, &[scale_x, scale_y, 0.0][..])?;
    image.encoder().write_tag(
        Tag::ModelTiepointTag,
        &[0.0, 0.0, 0.0, spec.bounds.min_x, spec.bounds.max_y, 0.0][..],
    )?;

    if let Some(nodata) = spec.nodata {
        image
            .encoder()
            .write_tag(Tag::GdalNodata, nodata.to_string().as_str())?;
    }

    if let Some(code) = spec.epsg {
        let directory = geokey_directory(code);
        image
            .encoder()
            .write_tag(Tag::GeoKeyDirectoryTag, &directory[..])?;
    }

    image.write_data(spec.data)
}

/// Write a GeoTIFF without any georeferencing tags.
pub fn write_plain_tiff<P: AsRef<Path>>(
    path: P,
    width: u32,
    height: u32,
    data: &[f32],
) -> TiffResult<()> {
    let file = File::create(path)?;
    let mut encoder = TiffEncoder::new(file)?;
    encoder.write_image::<colortype::Gray32Float>(width, height, data)
}

fn geokey_directory(code: u16) -> Vec<u16> {
    // Codes 4000-4999 are geographic systems in the EPSG registry.
    let geographic = (4000..5000).contains(&code);
    let (model, key) = if geographic {
        (2, GEOGRAPHIC_TYPE)
    } else {
        (1, PROJECTED_CS_TYPE)
    };
    vec![1, 1, 0, 2, MODEL_TYPE, 0, 1, model, key, 0, 1, code]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geokey_directory_layout() {
        assert_eq!(
            geokey_directory(4326),
            vec![1, 1, 0, 2, 1024, 0, 1, 2, 2048, 0, 1, 4326]
        );
        assert_eq!(
            geokey_directory(32633),
            vec![1, 1, 0, 2, 1024, 0, 1, 1, 3072, 0, 1, 32633]
        );
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.tif");
        let data = crate::create_ramp_grid(4, 3);
        write_test_geotiff(
            &path,
            &GeoTiffSpec {
                width: 4,
                height: 3,
                data: &data,
                bounds: BoundingBox::new(0.0, 0.0, 4.0, 3.0),
                nodata: Some(-9999.0),
                epsg: Some(32633),
            },
        )
        .unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }
}
