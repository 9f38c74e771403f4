use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use tuning_panda::data::model::{FieldValue, UnitDataset};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// `n` evenly spaced hues at fixed saturation and lightness.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    let step = 360.0 / n.max(1) as f32;
    (0..n)
        .map(|i| {
            let rgb: Srgb = Hsl::new(i as f32 * step, 0.75, 0.55).into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: column value → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a chosen unit column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<FieldValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for `column` from the values the units carry.
    pub fn new(column: &str, dataset: &UnitDataset) -> Self {
        Self::from_values(column, dataset.units.iter().map(|u| u.field(column)))
    }

    /// Assign one palette colour per distinct value, in value order.
    pub fn from_values(column: &str, values: impl IntoIterator<Item = FieldValue>) -> Self {
        let distinct: BTreeSet<FieldValue> = values.into_iter().collect();
        let palette = generate_palette(distinct.len());
        ColorMap {
            column: column.to_string(),
            mapping: distinct.into_iter().zip(palette).collect(),
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

    /// Legend rows for the side panel.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(v, c)| (v.to_string(), *c))
            .collect()
    }
}
