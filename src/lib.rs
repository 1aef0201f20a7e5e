//! purchaser - Purchase-menu icon compositor
//!
//! A library for turning tables of rolling-stock units into small indexed
//! purchase icons, built from the units' existing vehicle sprites.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod paths;
pub mod render;
pub mod report;
pub mod types;

pub use config::{Config, LayoutConfig, SheetLayout, Window};
pub use error::{PurchaserError, Result};
pub use parser::{load_units, parse_units};
pub use paths::AssetPaths;
pub use render::{Composition, Marker, UnitComposer, WriteOutcome};
pub use report::{BatchReport, UnitStatus};
pub use types::{Canvas, Palette, PaletteImage, TemplateKind, UnitSpec};
