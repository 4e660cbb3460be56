use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Marks inside a brush.
pub const STEELBLUE: Color32 = Color32::from_rgb(70, 130, 180);
/// Marks outside the current selection.
pub const LIGHTGRAY: Color32 = Color32::from_rgb(211, 211, 211);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.5);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category → Color32
// ---------------------------------------------------------------------------

/// Maps categories to distinct colours. Categories are
/// assigned hues in the order given.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(categories: &[String]) -> Self {
        let palette = generate_palette(categories.len());
        let mapping = categories.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a category.
    pub fn color_for(&self, category: &str) -> Color32 {
        self.mapping
            .get(category)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Category colour when emphasized, light gray otherwise.
    pub fn emphasis(&self, category: &str, emphasized: bool) -> Color32 {
        if emphasized {
            self.color_for(category)
        } else {
            LIGHTGRAY
        }
    }
}

/// Colour of a brushable mark.
pub fn brush_color(inside: bool) -> Color32 {
    if inside {
        STEELBLUE
    } else {
        LIGHTGRAY
    }
}
