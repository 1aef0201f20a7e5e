//! File naming conventions for sprites, marker icons and outputs.

use std::path::{Path, PathBuf};

/// Companion sprites that may carry extra running-state pixels, in priority order.
pub const ANIMATION_SUFFIXES: [&str; 3] = ["purchase_overlay", "anim_1", "pan_up"];

/// Resolves every path the compositor touches against a project root.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    root: PathBuf,
    marker_dir: PathBuf,
}

impl AssetPaths {
    pub fn new(root: impl Into<PathBuf>, marker_dir: impl AsRef<Path>) -> Self {
        let root = root.into();
        let marker_dir = root.join(marker_dir);
        Self { root, marker_dir }
    }

    /// `{scale}x/`
    pub fn scale_dir(&self, scale: u32) -> PathBuf {
        self.root.join(format!("{}x", scale))
    }

    /// `{scale}x/{sprite}_8bpp.png`
    pub fn sprite(&self, scale: u32, sprite: &str) -> PathBuf {
        self.scale_dir(scale).join(format!("{}_8bpp.png", sprite))
    }

    /// Animation companions of a sprite, highest priority first.
    pub fn animation_candidates(&self, scale: u32, sprite: &str) -> Vec<PathBuf> {
        ANIMATION_SUFFIXES
            .iter()
            .map(|suffix| self.scale_dir(scale).join(format!("{}_{}_8bpp.png", sprite, suffix)))
            .collect()
    }

    /// Marker icon by file name, e.g. `x3.png`.
    pub fn marker(&self, file_name: &str) -> PathBuf {
        self.marker_dir.join(file_name)
    }

    /// `{scale}x/{unit}_purchase.png`
    pub fn output(&self, scale: u32, unit_id: &str) -> PathBuf {
        self.scale_dir(scale).join(format!("{}_purchase.png", unit_id))
    }
}
