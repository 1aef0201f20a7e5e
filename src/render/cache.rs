//! Timestamp build cache for composed icons.
//!
//! An output is considered up to date when it exists and was modified
//! strictly after the newest input it was built from. Content is never
//! hashed.

use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

use crate::error::{PurchaserError, Result};
use crate::types::Canvas;

use super::png::save_indexed_png;

/// What the writer did with a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    UpToDate,
}

/// Whether `path` exists and was modified strictly after `time`.
///
/// A missing file is never newer.
pub fn is_newer_than(path: &Path, time: SystemTime) -> Result<bool> {
    match std::fs::metadata(path) {
        Ok(meta) => {
            let modified = meta.modified().map_err(|e| PurchaserError::Io {
                path: path.to_path_buf(),
                message: format!("Failed to read modification time: {}", e),
            })?;
            Ok(modified > time)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(PurchaserError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to stat output: {}", e),
        }),
    }
}

/// Write `canvas` to `path` unless the existing file is newer than every input.
///
/// `force` bypasses the timestamp check.
pub fn write_if_stale(
    canvas: Canvas,
    path: &Path,
    newest_input: Option<SystemTime>,
    force: bool,
) -> Result<WriteOutcome> {
    let newest_input = newest_input.unwrap_or(SystemTime::UNIX_EPOCH);

    if !force && is_newer_than(path, newest_input)? {
        return Ok(WriteOutcome::UpToDate);
    }

    save_indexed_png(&canvas.into_image(), path)?;
    Ok(WriteOutcome::Written)
}
