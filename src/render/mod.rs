//! Rendering module for purchaser.
//!
//! This module turns unit records into purchase icons: it loads indexed
//! sprites, extracts their side-on columns, stamps the marker icon and
//! writes the result through the timestamp cache.

mod cache;
mod compose;
mod extract;
mod marker;
mod png;
mod sprite;

pub use cache::{is_newer_than, write_if_stale, WriteOutcome};
pub use compose::{Composition, RenderedUnit, UnitComposer, UnitLayout};
pub use extract::{extract_columns, initial_placement, length_bound, Placement};
pub use marker::{blit_marker, Marker};
pub use self::png::{decode_indexed_png, encode_indexed_png, read_indexed_png, save_indexed_png};
pub use sprite::{modified_time, SpriteLoader};
