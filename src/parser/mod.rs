//! Parsers for unit tables.
//!
//! A unit table is comma-separated text with a header row. Each data row
//! describes one rolling-stock unit.
//!
//! # Usage
//!
//! ```ignore
//! use purchaser::parser::load_units;
//!
//! let units = load_units(Path::new("units.csv"))?;
//! for unit in units {
//!     println!("Found: {}", unit.id);
//! }
//! ```

pub mod table;
pub mod unit;

pub use table::{parse_table, Table};
pub use unit::{check_schema, load_units, parse_units, REQUIRED_COLUMNS};
