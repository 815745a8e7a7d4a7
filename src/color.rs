use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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
            let hsl = Hsl::new(hue, 0.75, 0.55);
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
// Color mapping: country → Color32
// ---------------------------------------------------------------------------

/// Assigns every country in the dataset a stable, distinct colour so a
/// country keeps its colour across filter changes and across the line and
/// bar charts.
#[derive(Debug, Clone, Default)]
pub struct CountryColors {
    mapping: BTreeMap<String, Color32>,
}

impl CountryColors {
    /// Build the map from the dataset's full country list (not the filtered
    /// one, so colours do not shuffle when the selection changes).
    pub fn new(countries: &[String]) -> Self {
        let palette = generate_palette(countries.len());
        let mapping = countries
            .iter()
            .cloned()
            .zip(palette)
            .collect();
        CountryColors { mapping }
    }

    /// Look up the colour for a country.
    pub fn get(&self, country: &str) -> Color32 {
        self.mapping.get(country).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colors_are_distinct() {
        let palette = generate_palette(8);
        assert_eq!(palette.len(), 8);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn country_colors_are_stable_lookups() {
        let countries = vec!["Brazil".to_string(), "China".to_string()];
        let colors = CountryColors::new(&countries);
        assert_eq!(colors.get("China"), colors.get("China"));
        assert_ne!(colors.get("Brazil"), colors.get("China"));
        assert_eq!(colors.get("Atlantis"), Color32::GRAY);
    }
}
