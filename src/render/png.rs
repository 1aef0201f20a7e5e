//! Indexed PNG input and output.
//!
//! Sprites are read without colour expansion so the compositor sees raw
//! palette indices. Sub-byte bit depths are unpacked to one index per pixel.
//! Output is always written as 8-bit indexed PNG.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use png::{BitDepth, ColorType, Transformations};

use crate::error::{PurchaserError, Result};
use crate::types::{Palette, PaletteImage};

/// Read an indexed PNG from disk.
pub fn read_indexed_png(path: &Path) -> Result<PaletteImage> {
    let file = File::open(path).map_err(|e| PurchaserError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to open image: {}", e),
    })?;

    decode_indexed_png(BufReader::new(file), path)
}

/// Decode an indexed PNG stream. `path` is only used for error messages.
pub fn decode_indexed_png(reader: impl Read, path: &Path) -> Result<PaletteImage> {
    let image_error = |message: String| PurchaserError::Image {
        path: path.to_path_buf(),
        message,
    };

    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(Transformations::IDENTITY);

    let mut reader = decoder
        .read_info()
        .map_err(|e| image_error(format!("Failed to decode PNG: {}", e)))?;

    let (color_type, bit_depth) = reader.output_color_type();
    if color_type != ColorType::Indexed {
        return Err(image_error(format!(
            "Expected an indexed (palette) image, found {:?}",
            color_type
        )));
    }

    let info = reader.info();
    let rgb = info
        .palette
        .as_ref()
        .map(|p| p.to_vec())
        .ok_or_else(|| image_error("Indexed image has no palette".to_string()))?;
    let alpha = info.trns.as_ref().map(|t| t.to_vec());

    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| image_error(format!("Failed to decode PNG: {}", e)))?;

    let indices = unpack_indices(&buf, frame.width, frame.height, frame.line_size, bit_depth);

    let palette = match alpha {
        Some(alpha) => Palette::new(rgb).with_alpha(alpha),
        None => Palette::new(rgb),
    };

    PaletteImage::new(frame.width, frame.height, indices, Arc::new(palette))
}

/// Expand packed scanlines into one index per pixel.
fn unpack_indices(buf: &[u8], width: u32, height: u32, line_size: usize, depth: BitDepth) -> Vec<u8> {
    let bits = depth as u8 as usize;
    let width = width as usize;
    let mut indices = Vec::with_capacity(width * height as usize);

    for row in buf.chunks(line_size).take(height as usize) {
        if bits >= 8 {
            indices.extend_from_slice(&row[..width]);
            continue;
        }

        let per_byte = 8 / bits;
        let mask = (1u8 << bits) - 1;
        for x in 0..width {
            let byte = row[x / per_byte];
            let shift = 8 - bits * (x % per_byte + 1);
            indices.push((byte >> shift) & mask);
        }
    }

    indices
}

/// Encode an image as an 8-bit indexed PNG.
pub fn encode_indexed_png(image: &PaletteImage) -> Result<Vec<u8>> {
    let encode_error = |e: png::EncodingError| PurchaserError::Encode {
        message: format!("Failed to encode PNG: {}", e),
    };

    let max_index = image.indices().iter().copied().max().unwrap_or(0);
    let palette = image.palette();

    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, image.width(), image.height());
        encoder.set_color(ColorType::Indexed);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_palette(palette.padded_rgb(max_index));
        if let Some(alpha) = palette.alpha() {
            encoder.set_trns(alpha.to_vec());
        }

        let mut writer = encoder.write_header().map_err(encode_error)?;
        writer.write_image_data(image.indices()).map_err(encode_error)?;
        writer.finish().map_err(encode_error)?;
    }

    Ok(bytes)
}

/// Write an image to disk as an 8-bit indexed PNG.
///
/// The file is only created once encoding has succeeded.
pub fn save_indexed_png(image: &PaletteImage, path: &Path) -> Result<()> {
    let bytes = encode_indexed_png(image)?;

    fs::write(path, bytes).map_err(|e| PurchaserError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write PNG: {}", e),
    })
}
