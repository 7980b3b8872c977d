use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

use laptop_lens::FieldValue;

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
            to_color32(Hsl::new(hue, 0.75, 0.55))
        })
        .collect()
}

fn to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Colour for position `t` in `[0, 1]` on a cool-to-warm price scale.
pub fn price_gradient(t: f64) -> Color32 {
    let cheap: Hsl = Hsl::new(220.0, 0.70, 0.55);
    let pricey: Hsl = Hsl::new(10.0, 0.80, 0.55);
    to_color32(cheap.mix(pricey, t.clamp(0.0, 1.0) as f32))
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the keys of a chart (types, RAM sizes, companies) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<FieldValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Assign colours to `keys` in the order given.
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a FieldValue>) -> Self {
        let keys: Vec<&FieldValue> = keys.into_iter().collect();
        let palette = generate_palette(keys.len());
        let mapping = keys
            .into_iter()
            .cloned()
            .zip(palette)
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given key.
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
    fn palette_has_requested_size_and_distinct_colours() {
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        for (i, a) in p.iter().enumerate() {
            for b in &p[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_keys_fall_back_to_gray() {
        let keys = [
            FieldValue::String("Gaming".into()),
            FieldValue::String("Notebook".into()),
        ];
        let map = ColorMap::new(&keys);
        assert_ne!(map.color_for(&keys[0]), map.color_for(&keys[1]));
        assert_eq!(
            map.color_for(&FieldValue::String("Workstation".into())),
            Color32::GRAY
        );
    }

    #[test]
    fn gradient_ends_differ() {
        assert_ne!(price_gradient(0.0), price_gradient(1.0));
        assert_eq!(price_gradient(-1.0), price_gradient(0.0));
        assert_eq!(price_gradient(2.0), price_gradient(1.0));
    }
}
