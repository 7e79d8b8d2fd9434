use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use big4_dashboard::data::model::FieldValue;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// The dashboard's corporate blues, used in order for the first series.
pub const BLUE_THEME: [Color32; 5] = [
    Color32::from_rgb(0x00, 0x33, 0xA0),
    Color32::from_rgb(0x00, 0x5E, 0xB8),
    Color32::from_rgb(0xB7, 0xC9, 0xE2),
    Color32::from_rgb(0x6C, 0x7A, 0x89),
    Color32::from_rgb(0x22, 0x22, 0x22),
];

/// Hue of the generated shades once the fixed theme runs out.
const BLUE_HUE: f32 = 215.0;

/// Generates `n` colours: the fixed theme first, then evenly spaced
/// lightness steps of the theme's blue hue.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    let extra = n.saturating_sub(BLUE_THEME.len());
    let generated = (0..extra).map(|i| {
        let lightness = 0.25 + 0.5 * (i as f32 + 0.5) / extra as f32;
        let hsl = Hsl::new(BLUE_HUE, 0.65, lightness);
        let rgb: Srgb = hsl.into_color();
        Color32::from_rgb(
            (rgb.red * 255.0) as u8,
            (rgb.green * 255.0) as u8,
            (rgb.blue * 255.0) as u8,
        )
    });
    BLUE_THEME.iter().copied().take(n).chain(generated).collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the observed values of one dimension to stable colours so a firm
/// keeps its colour across every chart.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<FieldValue, Color32>,
    default_color: Color32,
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl ColorMap {
    /// Build a colour map from a dimension's values, in option order.
    pub fn new(values: &[FieldValue]) -> Self {
        let palette = generate_palette(values.len());
        let mapping: BTreeMap<FieldValue, Color32> = values
            .iter()
            .zip(palette)
            .map(|(v, c): (&FieldValue, Color32)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &FieldValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_starts_with_theme() {
        let colors = generate_palette(3);
        assert_eq!(colors, BLUE_THEME[..3].to_vec());
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_palette_extends_past_theme_with_distinct_shades() {
        let colors = generate_palette(9);
        assert_eq!(colors.len(), 9);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_unknown_value_gets_default_color() {
        let map = ColorMap::new(&[FieldValue::from("Deloitte"), FieldValue::from("PwC")]);
        assert_eq!(map.color_for(&FieldValue::from("Deloitte")), BLUE_THEME[0]);
        assert_eq!(map.color_for(&FieldValue::from("PwC")), BLUE_THEME[1]);
        assert_eq!(map.color_for(&FieldValue::from("EY")), Color32::GRAY);
    }
}
