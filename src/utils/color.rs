//! Deterministic per-series colours.
//!
//! Colours are a pure function of a series' position so that the same member
//! keeps the same colour across redraws.

use plotters::style::{Color, HSLColor, RGBColor};
use serde::{Deserialize, Serialize};

/// Hue step between consecutive series, in degrees.
pub const GOLDEN_ANGLE: f64 = 137.5;

/// An HSL colour with hue in degrees and saturation/lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesColor {
    pub hue: f64,
    pub saturation: u8,
    pub lightness: u8,
}

/// Colour of the series at `index`.
pub fn series_color(index: usize) -> SeriesColor {
    SeriesColor {
        hue: (index as f64 * GOLDEN_ANGLE) % 360.0,
        saturation: 75 + (index % 3) as u8 * 5,
        lightness: 45 + (index % 4) as u8 * 3,
    }
}

impl SeriesColor {
    /// CSS notation, e.g. `hsl(137.5, 80%, 48%)`.
    pub fn css(&self) -> String {
        format!("hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        HSLColor(
            self.hue / 360.0,
            f64::from(self.saturation) / 100.0,
            f64::from(self.lightness) / 100.0,
        )
        .rgb()
    }

    pub fn to_rgb_color(&self) -> RGBColor {
        let (r, g, b) = self.rgb();
        RGBColor(r, g, b)
    }
}
