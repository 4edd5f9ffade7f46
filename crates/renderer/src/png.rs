//! PNG encoding for RGBA tile data.
//!
//! Supports two encoding modes:
//! - **Indexed PNG (color type 3)**: used when a tile has ≤256 unique RGBA
//!   values. Grayscale elevation tiles usually qualify, with the transparent
//!   nodata color taking one palette slot.
//! - **RGBA PNG (color type 6)**: fallback for tiles with more colors.
//!
//! Use [`create_png_auto`] for automatic mode selection, or [`create_png`]
//! for explicit RGBA encoding.

use std::collections::HashMap;
use std::io::Write;

use tiler_common::{TilerError, TilerResult};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

const COLOR_TYPE_INDEXED: u8 = 3;
const COLOR_TYPE_RGBA: u8 = 6;

/// Palette colors plus one index per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub colors: Vec<[u8; 4]>,
    pub indices: Vec<u8>,
}

impl Palette {
    fn has_transparency(&self) -> bool {
        self.colors.iter().any(|c| c[3] < 255)
    }
}

/// Encode RGBA pixels, choosing indexed mode when the colors fit.
pub fn create_png_auto(pixels: &[u8], width: usize, height: usize) -> TilerResult<Vec<u8>> {
    check_rgba_len(pixels, width, height)?;
    match extract_palette(pixels) {
        Some(palette) => create_png_indexed(width, height, &palette),
        None => create_png(pixels, width, height),
    }
}

/// Build a palette in first-seen order, or `None` past 256 colors.
pub fn extract_palette(pixels: &[u8]) -> Option<Palette> {
    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut colors: Vec<[u8; 4]> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let rgba = [px[0], px[1], px[2], px[3]];
        let key = u32::from_le_bytes(rgba);

        let index = match lookup.get(&key) {
            Some(&idx) => idx,
            None => {
                if colors.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = colors.len() as u8;
                colors.push(rgba);
                lookup.insert(key, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some(Palette { colors, indices })
}

/// Create an indexed PNG (color type 3) with a tRNS chunk when needed.
pub fn create_png_indexed(width: usize, height: usize, palette: &Palette) -> TilerResult<Vec<u8>> {
    if width == 0 || height == 0 || palette.indices.len() != width * height {
        return Err(TilerError::Encode(format!(
            "{} palette indices for a {}x{} image",
            palette.indices.len(),
            width,
            height
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    write_header(&mut png, width, height, COLOR_TYPE_INDEXED)?;

    let plte: Vec<u8> = palette.colors.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.has_transparency() {
        let trns: Vec<u8> = palette.colors.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    let idat = deflate_scanlines(&palette.indices, width, height)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Create a truecolor-with-alpha PNG (color type 6).
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> TilerResult<Vec<u8>> {
    check_rgba_len(pixels, width, height)?;

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    write_header(&mut png, width, height, COLOR_TYPE_RGBA)?;

    let idat = deflate_scanlines(pixels, width * 4, height)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn check_rgba_len(pixels: &[u8], width: usize, height: usize) -> TilerResult<()> {
    if width == 0 || height == 0 || pixels.len() != width * height * 4 {
        return Err(TilerError::Encode(format!(
            "{} bytes is not a {}x{} RGBA image",
            pixels.len(),
            width,
            height
        )));
    }
    Ok(())
}

/// IHDR with bit depth 8 and no interlacing.
fn write_header(png: &mut Vec<u8>, width: usize, height: usize, color_type: u8) -> TilerResult<()> {
    let (w, h) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(TilerError::Encode(format!(
                "{}x{} exceeds PNG dimension limits",
                width, height
            )))
        }
    };

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&w.to_be_bytes());
    ihdr.extend_from_slice(&h.to_be_bytes());
    ihdr.extend_from_slice(&[8, color_type, 0, 0, 0]);
    write_chunk(png, b"IHDR", &ihdr);
    Ok(())
}

/// Length, type, data, then CRC over type and data.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Prefix each `row_bytes` scanline with filter type 0 and zlib-compress.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> TilerResult<Vec<u8>> {
    let mut raw = Vec::with_capacity(height * (1 + row_bytes));
    for row in data.chunks_exact(row_bytes).take(height) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let compress = || -> std::io::Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
        encoder.write_all(&raw)?;
        encoder.finish()
    };
    compress().map_err(|e| TilerError::Encode(format!("IDAT compression failed: {}", e)))
}
