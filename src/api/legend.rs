use smallvec::SmallVec;

use crate::core::BarClassification;
use crate::render::{
    BarShape, CanvasLayerKind, Color, LayeredRenderFrame, RectPrimitive, TextHAlign,
    TextPrimitive, WaterfallBarShape,
};

use super::chart_props::LegendPosition;
use super::layout::PlotRect;
use super::render_style::WaterfallStyle;
use super::text_measure::TextMeasurer;

const SWATCH_LABEL_GAP_PX: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub classification: BarClassification,
    pub label: &'static str,
    pub color: Color,
}

pub type LegendEntries = SmallVec<[LegendEntry; 3]>;

/// The fixed Increase / Decrease / Total entries, independent of data.
///
/// Swatches take the color `shape` reports for each classification and fall
/// back to `style_shape` when it reports none.
#[must_use]
pub fn legend_entries(shape: &dyn BarShape, style_shape: &WaterfallBarShape) -> LegendEntries {
    BarClassification::ALL
        .into_iter()
        .map(|classification| LegendEntry {
            classification,
            label: classification.label(),
            color: shape
                .legend_color(classification)
                .unwrap_or_else(|| style_shape.fill_for(classification)),
        })
        .collect()
}

/// Swatch legend: a row for top/bottom placement, a column for left/right.
#[derive(Debug, Clone)]
pub struct LegendLayout {
    entries: LegendEntries,
    vertical: bool,
    swatch_size: f64,
    font_size: f64,
    item_gap: f64,
    row_height: f64,
    item_widths: SmallVec<[f64; 3]>,
}

impl LegendLayout {
    /// Measures every entry; returns `None` when the legend is hidden.
    #[must_use]
    pub fn measure(
        entries: LegendEntries,
        position: LegendPosition,
        style: &WaterfallStyle,
        measurer: &dyn TextMeasurer,
    ) -> Option<Self> {
        let vertical = match position {
            LegendPosition::Hidden => return None,
            LegendPosition::Top | LegendPosition::Bottom => false,
            LegendPosition::Left | LegendPosition::Right => true,
        };
        let swatch_size = style.legend_swatch_size_px;
        let font_size = style.legend_font_size_px;
        let row_height = swatch_size.max(measurer.line_height_px(font_size));
        let item_widths = entries
            .iter()
            .map(|entry| {
                swatch_size + SWATCH_LABEL_GAP_PX + measurer.text_width_px(entry.label, font_size)
            })
            .collect();

        Some(Self {
            entries,
            vertical,
            swatch_size,
            font_size,
            item_gap: style.legend_item_gap_px,
            row_height,
            item_widths,
        })
    }

    #[must_use]
    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    /// Total `(width, height)` of the legend block.
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        let count = self.item_widths.len() as f64;
        let gaps = (count - 1.0).max(0.0) * self.item_gap;
        if self.vertical {
            let width = self.item_widths.iter().copied().fold(0.0, f64::max);
            (width, self.row_height * count + gaps)
        } else {
            (self.item_widths.iter().sum::<f64>() + gaps, self.row_height)
        }
    }

    /// Pushes swatches and labels for a legend whose top-left corner is at
    /// `bounds.x, bounds.y`.
    pub fn arrange(&self, bounds: PlotRect, text_color: Color, frame: &mut LayeredRenderFrame) {
        let mut x = bounds.x;
        let mut y = bounds.y;
        for (entry, item_width) in self.entries.iter().zip(&self.item_widths) {
            let swatch_y = y + (self.row_height - self.swatch_size) * 0.5;
            frame.push_rect(
                CanvasLayerKind::Legend,
                RectPrimitive::new(x, swatch_y, self.swatch_size, self.swatch_size, entry.color),
            );
            let label_y = y + (self.row_height - self.font_size) * 0.5;
            frame.push_text(
                CanvasLayerKind::Legend,
                TextPrimitive::new(
                    entry.label,
                    x + self.swatch_size + SWATCH_LABEL_GAP_PX,
                    label_y,
                    self.font_size,
                    text_color,
                    TextHAlign::Left,
                ),
            );

            if self.vertical {
                y += self.row_height + self.item_gap;
            } else {
                x += item_width + self.item_gap;
            }
        }
    }
}
