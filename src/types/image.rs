//! Indexed images and the output canvas.
//!
//! A [`PaletteImage`] is an immutable grid of palette indices sharing a colour
//! table with every image decoded from the same source. A [`Canvas`] is the
//! mutable buffer a unit is composed into.

use std::sync::Arc;

use crate::error::{PurchaserError, Result};

/// Background index. Never counts as content.
pub const TRANSPARENT: u8 = 0;

/// Mask index. Never drawn.
pub const MASK: u8 = 255;

/// Whether a palette index is real content (neither background nor mask).
pub fn is_drawable(index: u8) -> bool {
    index != TRANSPARENT && index != MASK
}

/// Colour table of an indexed image, stored as packed RGB triples with an
/// optional per-entry alpha table (the PNG `tRNS` chunk).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl Palette {
    pub fn new(rgb: Vec<u8>) -> Self {
        Self { rgb, alpha: None }
    }

    pub fn with_alpha(mut self, alpha: Vec<u8>) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// A full 256-entry greyscale ramp with index 0 transparent.
    pub fn greyscale() -> Self {
        let rgb = (0..=255u8).flat_map(|v| [v, v, v]).collect();
        Self::new(rgb).with_alpha(vec![0])
    }

    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    pub fn alpha(&self) -> Option<&[u8]> {
        self.alpha.as_deref()
    }

    /// RGB table extended with black entries so that `max_index` is addressable.
    ///
    /// Returns a copy; the shared table is left untouched.
    pub fn padded_rgb(&self, max_index: u8) -> Vec<u8> {
        let needed = (max_index as usize + 1) * 3;
        let mut rgb = self.rgb.clone();
        if rgb.len() < needed {
            rgb.resize(needed, 0);
        }
        rgb
    }
}

/// Immutable indexed image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteImage {
    width: u32,
    height: u32,
    indices: Vec<u8>,
    palette: Arc<Palette>,
}

impl PaletteImage {
    /// Build an image from row-major indices.
    pub fn new(width: u32, height: u32, indices: Vec<u8>, palette: Arc<Palette>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if indices.len() != expected {
            return Err(PurchaserError::Parse {
                message: format!(
                    "Image data has {} pixels, expected {} for {}x{}",
                    indices.len(),
                    expected,
                    width,
                    height
                ),
                help: None,
            });
        }

        Ok(Self {
            width,
            height,
            indices,
            palette,
        })
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: u32,
        height: u32,
        palette: Arc<Palette>,
        f: impl Fn(u32, u32) -> u8,
    ) -> Self {
        let mut indices = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                indices.push(f(x, y));
            }
        }

        Self {
            width,
            height,
            indices,
            palette,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn palette(&self) -> &Arc<Palette> {
        &self.palette
    }

    /// Palette index at `(x, y)`; anything outside the image reads as transparent.
    pub fn index_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return TRANSPARENT;
        }
        self.indices[y as usize * self.width as usize + x as usize]
    }
}

/// Mutable output buffer for one unit at one scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    palette: Arc<Palette>,
}

impl Canvas {
    /// Blank (all transparent) canvas.
    pub fn new(width: u32, height: u32, palette: Arc<Palette>) -> Self {
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; width as usize * height as usize],
            palette,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn palette(&self) -> &Arc<Palette> {
        &self.palette
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return TRANSPARENT;
        }
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Set a pixel. Writes outside the canvas are dropped.
    pub fn set(&mut self, x: u32, y: u32, index: u8) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.pixels[y as usize * self.width as usize + x as usize] = index;
    }

    /// Signed variant of [`Canvas::set`] for placements that may start off-canvas.
    pub fn set_signed(&mut self, x: i64, y: i64, index: u8) {
        if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
            self.set(x, y, index);
        }
    }

    /// Freeze the canvas into an image sharing the same palette.
    pub fn into_image(self) -> PaletteImage {
        PaletteImage {
            width: self.width,
            height: self.height,
            indices: self.pixels,
            palette: self.palette,
        }
    }
}
