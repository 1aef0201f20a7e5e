//! Column extraction.
//!
//! Sprite sheets render a vehicle at several viewing angles across a wide
//! image. The purchase icon only needs the side-on view, which sits at a fixed
//! column window. Extraction walks that window and copies every column that
//! contains content into the canvas, so longer vehicles contribute more
//! columns than short ones.

use crate::config::{LayoutConfig, Window};
use crate::types::{is_drawable, Canvas, PaletteImage, UnitSpec};

/// Where a unit starts drawing, and how far the first sprite is shifted
/// to centre it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub cursor: u32,
    pub offset: u32,
}

/// Initial cursor for a unit.
///
/// Single vehicles (`car_count <= 1`) with declared articulated lengths are
/// centred on the canvas. Everything else starts at the configured cursor,
/// as do vehicles too long to centre.
pub fn initial_placement(unit: &UnitSpec, scale: u32, layout: &LayoutConfig) -> Placement {
    let default = Placement {
        cursor: layout.start_cursor,
        offset: 0,
    };

    if unit.car_count > 1 || unit.articulated_lengths.is_empty() {
        return default;
    }

    let half_canvas = layout.canvas_width(scale) / 2;
    let half_length = unit.articulated_pixels().saturating_mul(scale) / 2;
    if half_length >= half_canvas {
        return default;
    }

    let cursor = half_canvas - half_length;
    Placement {
        cursor,
        offset: cursor,
    }
}

/// Furthest the cursor may sit after the first sprite when no override applies.
///
/// Saturates rather than wrapping; the caller caps the cursor to the canvas.
pub fn length_bound(unit: &UnitSpec, scale: u32, placement: Placement) -> u32 {
    unit.base_length_pixels
        .saturating_add(1)
        .saturating_mul(scale)
        .saturating_add(placement.offset)
}

/// Copy occupied columns of `source[window.start..window.end]` into `canvas`.
///
/// A pixel from `animation` replaces the source pixel when it is drawable.
/// Drawable pixels are written at the cursor column; with `copy_background`
/// every scanned pixel is written. A column is occupied when it holds at
/// least one drawable pixel, and each occupied column advances the cursor.
///
/// Returns the new cursor. Scanning stops as soon as the cursor reaches the
/// canvas width.
pub fn extract_columns(
    canvas: &mut Canvas,
    cursor: u32,
    source: &PaletteImage,
    animation: Option<&PaletteImage>,
    window: Window,
    copy_background: bool,
) -> u32 {
    let mut cursor = cursor;

    for x in window.start..window.end {
        if cursor >= canvas.width() {
            break;
        }

        let mut occupied = false;

        for y in 0..source.height() {
            let mut c = source.index_at(x, y);
            if let Some(anim) = animation {
                let a = anim.index_at(x, y);
                if is_drawable(a) {
                    c = a;
                }
            }

            let drawable = is_drawable(c);
            if drawable || copy_background {
                canvas.set(cursor, y, c);
            }
            occupied |= drawable;
        }

        if occupied {
            cursor += 1;
        }
    }

    cursor
}
