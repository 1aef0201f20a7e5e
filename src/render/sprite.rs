//! Sprite loading with input timestamp tracking.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{PurchaserError, Result};
use crate::types::PaletteImage;

use super::png::read_indexed_png;

/// Modification time of a file.
pub fn modified_time(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| PurchaserError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read modification time: {}", e),
        })
}

/// Loads sprites for one unit composition and remembers the newest input.
///
/// Images are re-read on every call; nothing is cached between units.
#[derive(Debug, Default)]
pub struct SpriteLoader {
    newest_input: Option<SystemTime>,
}

impl SpriteLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an indexed image and record its modification time.
    pub fn load(&mut self, path: &Path) -> Result<PaletteImage> {
        let image = read_indexed_png(path)?;
        let modified = modified_time(path)?;

        self.newest_input = Some(match self.newest_input {
            Some(newest) if newest >= modified => newest,
            _ => modified,
        });

        Ok(image)
    }

    /// Load the first path in `candidates` that exists.
    pub fn load_first_existing(&mut self, candidates: &[PathBuf]) -> Result<Option<PaletteImage>> {
        match candidates.iter().find(|p| p.is_file()) {
            Some(path) => self.load(path).map(Some),
            None => Ok(None),
        }
    }

    /// Newest modification time among loaded files.
    pub fn newest_input(&self) -> Option<SystemTime> {
        self.newest_input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::png::save_indexed_png;
    use crate::types::Palette;
    use std::fs::File;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::tempdir;

    fn write_sprite(path: &Path, modified: SystemTime) {
        let img = PaletteImage::from_fn(2, 2, Arc::new(Palette::greyscale()), |_, _| 1);
        save_indexed_png(&img, path).unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(modified)
            .unwrap();
    }

    #[test]
    fn test_tracks_newest_input() {
        let dir = tempdir().unwrap();
        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        let new = old + Duration::from_secs(60);
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        write_sprite(&a, new);
        write_sprite(&b, old);

        let mut loader = SpriteLoader::new();
        assert_eq!(loader.newest_input(), None);
        loader.load(&a).unwrap();
        loader.load(&b).unwrap();

        assert_eq!(loader.newest_input(), Some(new));
    }

    #[test]
    fn test_failed_load_is_not_tracked() {
        let dir = tempdir().unwrap();
        let mut loader = SpriteLoader::new();

        assert!(loader.load(&dir.path().join("missing.png")).is_err());
        assert_eq!(loader.newest_input(), None);
    }

    #[test]
    fn test_load_first_existing() {
        let dir = tempdir().unwrap();
        let second = dir.path().join("second.png");
        write_sprite(&second, SystemTime::now());

        let mut loader = SpriteLoader::new();
        let candidates = vec![dir.path().join("first.png"), second];
        assert!(loader.load_first_existing(&candidates).unwrap().is_some());
        assert!(loader.newest_input().is_some());

        let none = vec![dir.path().join("nope.png")];
        assert!(loader.load_first_existing(&none).unwrap().is_none());
    }
}
