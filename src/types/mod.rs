//! Core domain types for purchaser.
//!
//! - `UnitSpec` - one normalized row of the unit table
//! - `PaletteImage` - an immutable indexed image
//! - `Canvas` - the mutable icon buffer a unit is composed into

mod image;
mod unit;

pub use self::image::{is_drawable, Canvas, Palette, PaletteImage, MASK, TRANSPARENT};
pub use unit::{TemplateKind, UnitSpec, LENGTH_UNIT_PIXELS};
