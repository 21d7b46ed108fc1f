use serde::{Deserialize, Serialize};

use crate::core::{WaterfallBarGeometry, WaterfallDatum};
use crate::render::{Color, TextHAlign, TextPrimitive};

use super::number_format::NumberFormatter;

/// On-bar value label: the formatted delta, centered above its bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarLabel {
    pub index: usize,
    pub text: String,
    pub x: f64,
    /// Top of the text box.
    pub y: f64,
    /// `true` when the label was pushed down to stay inside the plot.
    pub nudged: bool,
}

impl BarLabel {
    #[must_use]
    pub fn to_primitive(&self, font_size_px: f64, color: Color) -> TextPrimitive {
        TextPrimitive::new(self.text.clone(), self.x, self.y, font_size_px, color, TextHAlign::Center)
    }
}

/// Text shown for one bar: the delta for regular bars, the absolute value
/// for totals, never the stacked pair.
#[must_use]
pub fn bar_label_text(datum: &WaterfallDatum, formatter: &dyn NumberFormatter) -> String {
    formatter.format(datum.delta())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    pub line_height_px: f64,
    pub offset_px: f64,
    pub plot_top: f64,
}

/// Places one label per projected bar.
///
/// `bars` and `data` are matched by index; labels whose box would cross
/// `plot_top` are clamped to it. A bar whose formatted text is empty gets no
/// label.
#[must_use]
pub fn layout_bar_labels(
    data: &[WaterfallDatum],
    bars: &[WaterfallBarGeometry],
    formatter: &dyn NumberFormatter,
    placement: LabelPlacement,
) -> Vec<BarLabel> {
    bars.iter()
        .filter_map(|bar| data.get(bar.index).map(|datum| (bar, datum)))
        .filter_map(|(bar, datum)| {
            let text = bar_label_text(datum, formatter);
            if text.is_empty() {
                return None;
            }
            let preferred_y = bar.y_top - placement.offset_px - placement.line_height_px;
            let nudged = preferred_y < placement.plot_top;
            Some(BarLabel {
                index: datum.index,
                text,
                x: bar.x_center(),
                y: preferred_y.max(placement.plot_top),
                nudged,
            })
        })
        .collect()
}
