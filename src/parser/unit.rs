//! Unit table parsing.
//!
//! Maps table rows onto [`UnitSpec`] values. Only the schema check can fail;
//! individual cells fall back to neutral values when they do not parse.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{PurchaserError, Result};
use crate::types::{TemplateKind, UnitSpec, LENGTH_UNIT_PIXELS};

use super::table::{parse_table, Table};

/// Columns every unit table must have.
pub const REQUIRED_COLUMNS: [&str; 5] = ["id", "cars", "layout", "template", "ttd_len"];

/// Read and parse a unit table file.
pub fn load_units(path: &Path) -> Result<Vec<UnitSpec>> {
    let bytes = fs::read(path).map_err(|e| PurchaserError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read table: {}", e),
    })?;

    let source = String::from_utf8(bytes).map_err(|e| PurchaserError::Parse {
        message: format!("{} is not valid UTF-8: {}", path.display(), e),
        help: Some("Save the table as UTF-8 text".to_string()),
    })?;

    parse_units(&source)
}

/// Parse unit records from table text.
pub fn parse_units(source: &str) -> Result<Vec<UnitSpec>> {
    let table = parse_table(source)?;
    check_schema(&table)?;

    Ok(table
        .rows
        .iter()
        .map(|row| {
            let cells: HashMap<&str, &str> = table
                .headers
                .iter()
                .map(String::as_str)
                .zip(row.iter().map(String::as_str))
                .collect();
            unit_from_cells(&cells)
        })
        .collect())
}

/// Ensure every required column is present.
pub fn check_schema(table: &Table) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| table.column(name).is_none())
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PurchaserError::missing_columns(missing, &table.headers))
    }
}

fn unit_from_cells(cells: &HashMap<&str, &str>) -> UnitSpec {
    let cell = |name: &str| cells.get(name).map(|v| v.trim()).unwrap_or("");
    let non_empty = |name: &str| Some(cell(name)).filter(|v| !v.is_empty());

    let id = cell("id").to_string();

    let sprites = if let Some(tender) = non_empty("tender") {
        vec![id.clone(), tender.to_string()]
    } else if let Some(layout) = non_empty("layout") {
        split_list(layout)
    } else {
        vec![id.clone()]
    };

    let ttd_len = cell("ttd_len");
    let articulated = non_empty("articulated_lengths").unwrap_or(ttd_len);

    UnitSpec {
        car_count: cell("cars").parse().unwrap_or(0),
        sprites: if sprites.is_empty() { vec![id.clone()] } else { sprites },
        requires_second_power_car: non_empty("requires_second_power_car").is_some(),
        double_headed: non_empty("double_headed").is_some(),
        reuse_sprites_from: non_empty("reuse_sprites").map(str::to_string),
        template: TemplateKind::parse(cell("template")),
        base_length_pixels: ttd_len
            .parse::<u32>()
            .unwrap_or(0)
            .saturating_mul(LENGTH_UNIT_PIXELS),
        articulated_lengths: parse_lengths(articulated),
        override_lengths: parse_lengths(cell("purchase_length")),
        id,
    }
}

/// Comma-separated identifiers, trimmed, empties dropped.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Comma-separated lengths; entries that are not integers are skipped.
fn parse_lengths(value: &str) -> Vec<u32> {
    value
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect()
}
