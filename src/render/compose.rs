//! Unit composition: sprites -> canvas -> marker -> file.
//!
//! A composition owns its canvas outright and moves it through each stage.
//! Any failure abandons the unit before anything is written.

use std::path::PathBuf;
use std::time::SystemTime;

use crate::config::{Config, SheetLayout, Window};
use crate::error::{PurchaserError, Result};
use crate::paths::AssetPaths;
use crate::types::{Canvas, UnitSpec};

use super::cache::{write_if_stale, WriteOutcome};
use super::extract::{extract_columns, initial_placement, length_bound};
use super::marker::{blit_marker, Marker};
use super::sprite::SpriteLoader;

/// Layout chosen by the first sprite of a unit and reused for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitLayout {
    pub kind: SheetLayout,
    pub window: Window,
}

/// A finished canvas plus what is needed to persist it.
#[derive(Debug)]
pub struct Composition {
    pub canvas: Canvas,
    pub layout: UnitLayout,
    /// Final cursor, after extraction and clamping.
    pub cursor: u32,
    pub marker: Option<Marker>,
    pub newest_input: Option<SystemTime>,
    /// Non-fatal oddities worth reporting, e.g. mixed sheet layouts.
    pub warnings: Vec<String>,
}

/// Result of rendering one unit at one scale.
#[derive(Debug)]
pub struct RenderedUnit {
    pub path: PathBuf,
    pub outcome: WriteOutcome,
    pub warnings: Vec<String>,
}

/// Composes purchase icons for units at a single scale.
pub struct UnitComposer<'a> {
    config: &'a Config,
    paths: &'a AssetPaths,
    scale: u32,
}

impl<'a> UnitComposer<'a> {
    pub fn new(config: &'a Config, paths: &'a AssetPaths, scale: u32) -> Self {
        Self {
            config,
            paths,
            scale: scale.max(1),
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Draw every sprite of `unit` and its marker into a fresh canvas.
    pub fn compose(&self, unit: &UnitSpec) -> Result<Composition> {
        let layout_config = &self.config.layout;
        let scale = self.scale;
        let canvas_width = layout_config.canvas_width(scale);

        let mut loader = SpriteLoader::new();
        let mut warnings = Vec::new();

        let placement = initial_placement(unit, scale, layout_config);
        let mut cursor = placement.cursor;

        let mut state: Option<(UnitLayout, Canvas)> = None;

        for (idx, sprite) in unit.effective_sprites().iter().enumerate() {
            let image = loader.load(&self.paths.sprite(scale, sprite))?;
            let (kind, window) = layout_config.select(image.width(), scale);

            let first_sprite = state.is_none();
            let (layout, canvas) = state.get_or_insert_with(|| {
                let canvas = Canvas::new(canvas_width, window.row_height, image.palette().clone());
                (UnitLayout { kind, window }, canvas)
            });
            if !first_sprite && layout.kind != kind {
                warnings.push(format!(
                    "sprite {} uses the {:?} sheet layout but {} was laid out as {:?}; keeping {:?}",
                    sprite, kind, unit.id, layout.kind, layout.kind
                ));
            }
            let layout = *layout;

            let animation = loader.load_first_existing(&self.paths.animation_candidates(scale, sprite))?;

            cursor = extract_columns(
                canvas,
                cursor,
                &image,
                animation.as_ref(),
                layout.window,
                self.config.copy_background,
            );

            match unit.override_at(idx) {
                Some(length) => {
                    let slot = u32::try_from(idx + 1).unwrap_or(u32::MAX);
                    cursor = slot
                        .saturating_mul(length)
                        .saturating_mul(scale)
                        .min(canvas_width);
                }
                None if idx == 0 => {
                    cursor = cursor.min(length_bound(unit, scale, placement));
                }
                None => {}
            }

            if cursor >= canvas_width {
                break;
            }
        }

        let (layout, mut canvas) = state.ok_or_else(|| PurchaserError::Parse {
            message: format!("Unit {} has no sprites", unit.id),
            help: Some("Set a layout or id for the unit".to_string()),
        })?;

        let marker = Marker::select(unit);
        if let Some(marker) = marker {
            let icon = loader.load(&self.paths.marker(&marker.file_name()))?;
            blit_marker(&mut canvas, &icon, cursor, scale);
        }

        Ok(Composition {
            canvas,
            layout,
            cursor,
            marker,
            newest_input: loader.newest_input(),
            warnings,
        })
    }

    /// Compose `unit` and write it unless the existing output is up to date.
    pub fn render(&self, unit: &UnitSpec, force: bool) -> Result<RenderedUnit> {
        let composition = self.compose(unit)?;
        let path = self.paths.output(self.scale, &unit.id);

        let outcome = write_if_stale(composition.canvas, &path, composition.newest_input, force)?;

        Ok(RenderedUnit {
            path,
            outcome,
            warnings: composition.warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::png::{read_indexed_png, save_indexed_png};
    use crate::types::{Palette, PaletteImage, TRANSPARENT};
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    fn palette() -> Arc<Palette> {
        Arc::new(Palette::greyscale())
    }

    /// Sheet of `width` columns with content columns `[from, from + len)` set to `value`.
    fn sheet(width: u32, height: u32, from: u32, len: u32, value: u8) -> PaletteImage {
        PaletteImage::from_fn(width, height, palette(), |x, _| {
            if x >= from && x < from + len {
                value
            } else {
                TRANSPARENT
            }
        })
    }

    fn project() -> (TempDir, AssetPaths) {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("1x")).unwrap();
        fs::create_dir_all(dir.path().join("2x")).unwrap();
        fs::create_dir_all(dir.path().join("purchase_sprites")).unwrap();
        let paths = AssetPaths::new(dir.path(), "purchase_sprites");
        (dir, paths)
    }

    fn put(path: &Path, image: &PaletteImage) {
        save_indexed_png(image, path).unwrap();
    }

    fn single_config() -> Config {
        Config {
            scales: vec![1],
            ..Config::default()
        }
    }

    #[test]
    fn test_compose_large_layout() {
        let (_dir, paths) = project();
        put(&paths.sprite(1, "loco"), &sheet(900, 17, 760, 10, 5));
        let config = single_config();
        let unit = UnitSpec {
            base_length_pixels: 32,
            ..UnitSpec::new("loco")
        };

        let composition = UnitComposer::new(&config, &paths, 1).compose(&unit).unwrap();

        assert_eq!(composition.layout.kind, SheetLayout::Large);
        assert_eq!((composition.canvas.width(), composition.canvas.height()), (64, 17));
        assert_eq!(composition.cursor, 12);
        assert_eq!(composition.canvas.get(2, 0), 5);
        assert_eq!(composition.canvas.get(11, 16), 5);
        assert_eq!(composition.canvas.get(12, 0), TRANSPARENT);
        assert!(composition.newest_input.is_some());
    }

    #[test]
    fn test_compose_small_layout_at_2x() {
        let (_dir, paths) = project();
        put(&paths.sprite(2, "tram"), &sheet(500, 28, 370, 6, 9));
        let config = single_config();
        let unit = UnitSpec {
            base_length_pixels: 40,
            ..UnitSpec::new("tram")
        };

        let composition = UnitComposer::new(&config, &paths, 2).compose(&unit).unwrap();

        assert_eq!(composition.layout.kind, SheetLayout::Small);
        assert_eq!((composition.canvas.width(), composition.canvas.height()), (128, 28));
        assert_eq!(composition.cursor, 8);
    }

    #[test]
    fn test_first_sprite_clamped_to_declared_length() {
        let (_dir, paths) = project();
        put(&paths.sprite(1, "loco"), &sheet(900, 17, 756, 40, 5));
        let config = single_config();
        let unit = UnitSpec {
            base_length_pixels: 20,
            ..UnitSpec::new("loco")
        };

        let composition = UnitComposer::new(&config, &paths, 1).compose(&unit).unwrap();

        // bound = 1 + 20 + 0
        assert_eq!(composition.cursor, 21);
    }

    #[test]
    fn test_override_sets_cursor_per_index() {
        let (_dir, paths) = project();
        put(&paths.sprite(1, "a"), &sheet(900, 17, 756, 30, 5));
        put(&paths.sprite(1, "b"), &sheet(900, 17, 756, 30, 6));
        let config = single_config();
        let unit = UnitSpec {
            car_count: 2,
            sprites: vec!["a".into(), "b".into()],
            base_length_pixels: 4,
            override_lengths: vec![10, 12],
            ..UnitSpec::new("pair")
        };

        let composition = UnitComposer::new(&config, &paths, 1).compose(&unit).unwrap();

        // After sprite 0: 1 * 10; sprite 1 starts at 10, ends at (1 + 1) * 12.
        assert_eq!(composition.cursor, 24);
        assert_eq!(composition.canvas.get(9, 0), 5);
        assert_eq!(composition.canvas.get(10, 0), 6);
        // No count marker while overrides are active.
        assert_eq!(composition.marker, None);
    }

    #[test]
    fn test_oversized_override_is_capped_at_2x() {
        let (_dir, paths) = project();
        put(&paths.sprite(2, "long"), &sheet(1800, 34, 1512, 20, 5));
        let config = single_config();
        let unit = UnitSpec {
            base_length_pixels: u32::MAX,
            articulated_lengths: vec![1 << 30],
            override_lengths: vec![3_000_000_000],
            ..UnitSpec::new("long")
        };

        let composition = UnitComposer::new(&config, &paths, 2).compose(&unit).unwrap();

        assert_eq!(composition.cursor, 128);
        assert_eq!(composition.canvas.get(2, 0), 5);
    }

    #[test]
    fn test_oversized_declared_length_leaves_measured_cursor() {
        let (_dir, paths) = project();
        put(&paths.sprite(2, "long"), &sheet(1800, 34, 1512, 20, 5));
        let config = single_config();
        let unit = UnitSpec {
            base_length_pixels: u32::MAX,
            ..UnitSpec::new("long")
        };

        let composition = UnitComposer::new(&config, &paths, 2).compose(&unit).unwrap();

        assert_eq!(composition.cursor, 22);
    }

    #[test]
    fn test_second_sprite_follows_first_layout() {
        let (_dir, paths) = project();
        put(&paths.sprite(1, "big"), &sheet(900, 17, 756, 4, 5));
        put(&paths.sprite(1, "small"), &sheet(300, 14, 180, 4, 6));
        let config = single_config();
        let unit = UnitSpec {
            sprites: vec!["big".into(), "small".into()],
            base_length_pixels: 64,
            ..UnitSpec::new("mixed")
        };

        let composition = UnitComposer::new(&config, &paths, 1).compose(&unit).unwrap();

        assert_eq!(composition.layout.kind, SheetLayout::Large);
        assert_eq!(composition.canvas.height(), 17);
        assert_eq!(composition.warnings.len(), 1);
        // The small sheet is scanned through the large window, where it is empty.
        assert_eq!(composition.cursor, 6);
    }

    #[test]
    fn test_animation_overlay_priority() {
        let (_dir, paths) = project();
        put(&paths.sprite(1, "emu"), &sheet(900, 17, 756, 2, 5));
        let candidates = paths.animation_candidates(1, "emu");
        put(&candidates[1], &sheet(900, 17, 756, 2, 40));
        put(&candidates[2], &sheet(900, 17, 756, 2, 50));
        let config = single_config();
        let unit = UnitSpec {
            base_length_pixels: 32,
            ..UnitSpec::new("emu")
        };

        let composition = UnitComposer::new(&config, &paths, 1).compose(&unit).unwrap();

        assert_eq!(composition.canvas.get(2, 0), 40);
    }

    #[test]
    fn test_missing_sprite_aborts() {
        let (_dir, paths) = project();
        let config = single_config();

        let err = UnitComposer::new(&config, &paths, 1)
            .compose(&UnitSpec::new("ghost"))
            .unwrap_err();

        assert!(matches!(err, PurchaserError::Io { .. }));
    }

    #[test]
    fn test_missing_marker_aborts_without_writing() {
        let (_dir, paths) = project();
        put(&paths.sprite(1, "emu"), &sheet(900, 17, 756, 10, 5));
        let config = single_config();
        let unit = UnitSpec {
            car_count: 4,
            base_length_pixels: 32,
            ..UnitSpec::new("emu")
        };

        let result = UnitComposer::new(&config, &paths, 1).render(&unit, false);

        assert!(result.is_err());
        assert!(!paths.output(1, "emu").exists());
    }

    #[test]
    fn test_render_writes_marker() {
        let (_dir, paths) = project();
        put(&paths.sprite(1, "emu"), &sheet(900, 17, 756, 20, 5));
        put(&paths.marker("x3.png"), &PaletteImage::from_fn(3, 4, palette(), |_, _| 77));
        let config = single_config();
        let unit = UnitSpec {
            car_count: 3,
            base_length_pixels: 32,
            ..UnitSpec::new("emu")
        };

        let rendered = UnitComposer::new(&config, &paths, 1).render(&unit, false).unwrap();

        assert_eq!(rendered.outcome, WriteOutcome::Written);
        let output = read_indexed_png(&rendered.path).unwrap();
        assert_eq!((output.width(), output.height()), (64, 17));
        // cursor 22: icon spans x 18..21, y 12..16
        assert_eq!(output.index_at(18, 12), 77);
        assert_eq!(output.index_at(20, 15), 77);
        assert_eq!(output.index_at(17, 12), 5);
        assert_eq!(output.index_at(21, 12), 5);
    }
}
