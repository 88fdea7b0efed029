use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CellValue;
use crate::figure::Figure;

/// Colour of an ungrouped series.
pub const SINGLE_SERIES: Color32 = Color32::LIGHT_BLUE;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.75, 0.55).into_color();
            Color32::from_rgb(
                (rgb.red * 255.0).round() as u8,
                (rgb.green * 255.0).round() as u8,
                (rgb.blue * 255.0).round() as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Group value → Color32
// ---------------------------------------------------------------------------

/// Maps the group values of a figure's series to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: HashMap<CellValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Colours are handed out in the order the groups are given.
    pub fn new<'a>(groups: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let groups: Vec<&CellValue> = groups.into_iter().collect();
        let palette = generate_palette(groups.len());
        let mapping = groups
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: SINGLE_SERIES,
        }
    }

    pub fn for_figure(figure: &Figure) -> Self {
        Self::new(figure.series.iter().filter_map(|s| s.group.as_ref()))
    }

    /// Colour for a series' group; ungrouped series get the default colour.
    pub fn color_for(&self, group: Option<&CellValue>) -> Color32 {
        group
            .and_then(|v| self.mapping.get(v))
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct() {
        let colors = generate_palette(6);
        assert_eq!(colors.len(), 6);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn groups_get_palette_colours_in_order() {
        let groups = [CellValue::Text("A".into()), CellValue::Text("B".into())];
        let map = ColorMap::new(groups.iter());
        let palette = generate_palette(2);
        assert_eq!(map.color_for(Some(&groups[0])), palette[0]);
        assert_eq!(map.color_for(Some(&groups[1])), palette[1]);
        assert_eq!(map.color_for(None), SINGLE_SERIES);
        assert_eq!(map.color_for(Some(&CellValue::Null)), SINGLE_SERIES);
    }
}
