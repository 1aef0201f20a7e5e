//! Unit records: one row of the input table, normalized.

use std::fmt;

/// Pixels per declared length unit.
pub const LENGTH_UNIT_PIXELS: u32 = 4;

/// Which template a unit is generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateKind {
    #[default]
    Normal,
    NotApplicable,
    Tender,
}

impl TemplateKind {
    /// Parse a `template` cell. Anything unrecognized is a normal template.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "na" => TemplateKind::NotApplicable,
            "tender" => TemplateKind::Tender,
            _ => TemplateKind::Normal,
        }
    }

    /// Units on these templates never get a purchase icon.
    pub fn is_skipped(&self) -> bool {
        matches!(self, TemplateKind::NotApplicable | TemplateKind::Tender)
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateKind::Normal => write!(f, "normal"),
            TemplateKind::NotApplicable => write!(f, "na"),
            TemplateKind::Tender => write!(f, "tender"),
        }
    }
}

/// A rolling-stock unit as described by one table row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnitSpec {
    /// Unique identifier; names the output file.
    pub id: String,
    pub car_count: u32,
    /// Sprite identifiers drawn left to right.
    pub sprites: Vec<String>,
    pub requires_second_power_car: bool,
    pub double_headed: bool,
    /// Replaces the first sprite slot when set.
    pub reuse_sprites_from: Option<String>,
    pub template: TemplateKind,
    /// Declared vehicle length in pixels (length units x 4).
    pub base_length_pixels: u32,
    /// Length units of each articulated segment.
    pub articulated_lengths: Vec<u32>,
    /// Forced cursor positions per sprite index; zero means "measure".
    pub override_lengths: Vec<u32>,
}

impl UnitSpec {
    /// A single-sprite unit whose sprite shares its id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            sprites: vec![id.clone()],
            id,
            ..Default::default()
        }
    }

    /// Sprite list with the reuse substitution applied to the first slot.
    pub fn effective_sprites(&self) -> Vec<String> {
        let mut sprites = self.sprites.clone();
        if let Some(reuse) = &self.reuse_sprites_from {
            match sprites.first_mut() {
                Some(first) => *first = reuse.clone(),
                None => sprites.push(reuse.clone()),
            }
        }
        sprites
    }

    /// Non-zero override length for a sprite index.
    pub fn override_at(&self, index: usize) -> Option<u32> {
        self.override_lengths.get(index).copied().filter(|&l| l > 0)
    }

    /// Whether any override length is in effect.
    pub fn has_override(&self) -> bool {
        self.override_lengths.iter().any(|&l| l > 0)
    }

    /// Summed articulated length in unscaled pixels, saturating at `u32::MAX`.
    pub fn articulated_pixels(&self) -> u32 {
        self.articulated_lengths
            .iter()
            .fold(0u32, |sum, &len| sum.saturating_add(len))
            .saturating_mul(LENGTH_UNIT_PIXELS)
    }
}
