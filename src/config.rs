//! Project configuration (purchaser.yaml) parsing.
//!
//! The config holds the sprite-sheet geometry, the output scales and the
//! compositing options. Every field has a default, so an empty file (or no
//! file at all) reproduces the standard 64-pixel purchase icons.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PurchaserError, Result};

/// The name of the config file looked up in the project root.
pub const CONFIG_FILENAME: &str = "purchaser.yaml";

/// A horizontal slice of a sprite sheet and the icon row height it implies.
///
/// Values are at 1x; use [`Window::scaled`] for other resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// First source column (inclusive).
    pub start: u32,
    /// Last source column (exclusive).
    pub end: u32,
    pub row_height: u32,
}

impl Window {
    pub fn scaled(&self, scale: u32) -> Window {
        Window {
            start: self.start.saturating_mul(scale),
            end: self.end.saturating_mul(scale),
            row_height: self.row_height.saturating_mul(scale),
        }
    }
}

/// Which of the two known sheet layouts a sprite uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetLayout {
    Large,
    Small,
}

/// Canvas and sheet geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Icon width at 1x.
    pub canvas_width: u32,
    /// Cursor position used when a unit is not centred.
    pub start_cursor: u32,
    #[serde(rename = "large_window")]
    pub large: Window,
    #[serde(rename = "small_window")]
    pub small: Window,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 64,
            start_cursor: 2,
            large: Window {
                start: 756,
                end: 818,
                row_height: 17,
            },
            small: Window {
                start: 180,
                end: 216,
                row_height: 14,
            },
        }
    }
}

impl LayoutConfig {
    /// Pick the sheet layout for a sprite of the given width.
    ///
    /// Sheets too narrow to contain the large window use the small one.
    pub fn select(&self, sprite_width: u32, scale: u32) -> (SheetLayout, Window) {
        let large = self.large.scaled(scale);
        if sprite_width < large.start {
            (SheetLayout::Small, self.small.scaled(scale))
        } else {
            (SheetLayout::Large, large)
        }
    }

    pub fn canvas_width(&self, scale: u32) -> u32 {
        self.canvas_width.saturating_mul(scale)
    }
}

/// Project configuration loaded from purchaser.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub layout: LayoutConfig,

    /// Output scales, processed in order.
    pub scales: Vec<u32>,

    /// Copy every scanned pixel, background and mask included.
    pub copy_background: bool,

    /// Directory holding the marker icons, relative to the project root.
    pub marker_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            scales: vec![1, 2],
            copy_background: false,
            marker_dir: PathBuf::from("purchase_sprites"),
        }
    }
}

impl Config {
    /// Load config from a purchaser.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PurchaserError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse and validate config from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        // An empty document deserializes as null rather than an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(content).map_err(|e| PurchaserError::Config {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load `purchaser.yaml` from the project root, or use defaults if absent.
    pub fn discover(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILENAME);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject geometry the compositor cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.scales.is_empty() || self.scales.contains(&0) {
            return Err(PurchaserError::Config {
                message: format!("Invalid scales {:?}", self.scales),
                help: Some("List at least one scale, each 1 or greater".to_string()),
            });
        }

        if self.layout.canvas_width == 0 {
            return Err(PurchaserError::Config {
                message: "canvas_width must be non-zero".to_string(),
                help: None,
            });
        }

        for (name, window) in [("large_window", &self.layout.large), ("small_window", &self.layout.small)] {
            if window.end <= window.start || window.row_height == 0 {
                return Err(PurchaserError::Config {
                    message: format!(
                        "{} must have end > start and a non-zero row_height (got {}..{}, height {})",
                        name, window.start, window.end, window.row_height
                    ),
                    help: None,
                });
            }
        }

        let largest = self.scales.iter().copied().max().unwrap_or(1);
        let extents = [
            self.layout.canvas_width,
            self.layout.large.end,
            self.layout.large.row_height,
            self.layout.small.end,
            self.layout.small.row_height,
        ];
        if extents.iter().any(|e| e.checked_mul(largest).is_none()) {
            return Err(PurchaserError::Config {
                message: format!("Scale {} is too large for the configured layout", largest),
                help: Some("Use a smaller scale or canvas".to_string()),
            });
        }

        Ok(())
    }
}
