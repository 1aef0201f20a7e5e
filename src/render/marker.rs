//! Marker icons blitted into the bottom-right of a purchase icon.

use crate::types::{Canvas, PaletteImage, UnitSpec, TRANSPARENT};

/// The small badge telling players what they are buying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Number of cars in a multiple unit.
    CarCount(u32),
    SecondPowerCar,
    DoubleHeaded,
}

impl Marker {
    /// Pick the marker for a unit; the first match wins.
    ///
    /// Car counts are suppressed when the unit forces its own lengths, since
    /// the drawn width no longer reflects the cars.
    pub fn select(unit: &UnitSpec) -> Option<Self> {
        if unit.car_count > 0 && !unit.has_override() {
            Some(Marker::CarCount(unit.car_count))
        } else if unit.requires_second_power_car {
            Some(Marker::SecondPowerCar)
        } else if unit.double_headed {
            Some(Marker::DoubleHeaded)
        } else {
            None
        }
    }

    pub fn file_name(&self) -> String {
        match self {
            Marker::CarCount(n) => format!("x{}.png", n),
            Marker::SecondPowerCar => "second_power_car.png".to_string(),
            Marker::DoubleHeaded => "double_headed.png".to_string(),
        }
    }
}

/// Blit `icon` so that it ends one pixel left of `cursor` and one pixel above
/// the bottom edge, upscaled by `scale` with nearest-neighbour sampling.
///
/// Non-transparent icon pixels replace whatever is underneath; transparent
/// ones leave the canvas alone. Pixels falling outside the canvas are dropped.
pub fn blit_marker(canvas: &mut Canvas, icon: &PaletteImage, cursor: u32, scale: u32) {
    let scale = i64::from(scale.max(1));
    let width = i64::from(icon.width()) * scale;
    let height = i64::from(icon.height()) * scale;

    let origin_y = i64::from(canvas.height()) - 1 - height;
    let origin_x = i64::from(cursor) - 1 - width;

    for x in 0..width {
        for y in 0..height {
            // Source coordinates are below the icon size, so they fit in u32.
            let c = icon.index_at((x / scale) as u32, (y / scale) as u32);
            if c != TRANSPARENT {
                canvas.set_signed(origin_x + x, origin_y + y, c);
            }
        }
    }
}
