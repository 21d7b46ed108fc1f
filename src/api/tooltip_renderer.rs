use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Viewport, WaterfallDatum};
use crate::render::{RectPrimitive, TextHAlign, TextPrimitive};

use super::number_format::NumberFormatter;
use super::render_style::WaterfallStyle;
use super::text_measure::TextMeasurer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipRow {
    pub label: String,
    pub value: String,
}

/// Hover text for one bar: category title plus delta and running total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipContent {
    pub index: usize,
    pub title: String,
    pub rows: SmallVec<[TooltipRow; 2]>,
}

impl TooltipContent {
    #[must_use]
    pub fn for_datum(datum: &WaterfallDatum, formatter: &dyn NumberFormatter) -> Self {
        let delta_label = if datum.is_total {
            "Total"
        } else {
            datum.classification.label()
        };
        let rows = SmallVec::from_buf([
            TooltipRow {
                label: delta_label.to_owned(),
                value: formatter.format(datum.delta()),
            },
            TooltipRow {
                label: "Cumulative".to_owned(),
                value: formatter.format(datum.cumulative()),
            },
        ]);
        Self {
            index: datum.index,
            title: datum.category.clone(),
            rows,
        }
    }

    /// Text lines in display order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        std::iter::once(self.title.clone())
            .chain(self.rows.iter().map(|row| format!("{}: {}", row.label, row.value)))
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Box plus one text primitive per line, offset from the pointer and
    /// flipped or clamped so the box stays inside the viewport.
    #[must_use]
    pub fn to_primitives(
        &self,
        pointer_x: f64,
        pointer_y: f64,
        viewport: Viewport,
        style: &WaterfallStyle,
        measurer: &dyn TextMeasurer,
    ) -> (RectPrimitive, Vec<TextPrimitive>) {
        let lines = self.lines();
        let font_size = style.tooltip_font_size_px;
        let line_height = measurer.line_height_px(font_size);
        let padding = style.tooltip_padding_px;
        let text_width = lines
            .iter()
            .map(|line| measurer.text_width_px(line, font_size))
            .fold(0.0, f64::max);
        let box_width = text_width + 2.0 * padding;
        let box_height = line_height * lines.len() as f64 + 2.0 * padding;

        let viewport_width = f64::from(viewport.width);
        let viewport_height = f64::from(viewport.height);
        let mut x = pointer_x + style.tooltip_offset_px;
        if x + box_width > viewport_width {
            x = pointer_x - style.tooltip_offset_px - box_width;
        }
        let x = x.clamp(0.0, (viewport_width - box_width).max(0.0));
        let y = (pointer_y - box_height * 0.5).clamp(0.0, (viewport_height - box_height).max(0.0));

        let background = RectPrimitive::new(x, y, box_width, box_height, style.tooltip_background_color)
            .with_border(1.0, style.tooltip_border_color)
            .with_corner_radius(3.0);
        let texts = lines
            .into_iter()
            .enumerate()
            .map(|(row, line)| {
                TextPrimitive::new(
                    line,
                    x + padding,
                    y + padding + line_height * row as f64,
                    font_size,
                    style.text_color,
                    TextHAlign::Left,
                )
            })
            .collect();
        (background, texts)
    }
}
