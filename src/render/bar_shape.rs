use crate::core::{BarClassification, WaterfallBarGeometry};

use super::{Color, RectPrimitive};

pub const INCREASE_COLOR: Color = Color::rgb8(0x5A, 0xC1, 0x89);
pub const DECREASE_COLOR: Color = Color::rgb8(0xFF, 0x7F, 0x44);
pub const TOTAL_COLOR: Color = Color::rgb8(0x66, 0x66, 0x66);

/// Strategy that turns one projected bar into a draw command.
///
/// The frame builder calls it once per bar with the bar's slot index and the
/// total bar count, so shapes can vary by position without capturing chart
/// state.
pub trait BarShape {
    fn draw(
        &self,
        bar: &WaterfallBarGeometry,
        classification: BarClassification,
        index: usize,
        total_count: usize,
    ) -> RectPrimitive;

    /// Swatch color the legend shows for `classification`.
    ///
    /// `None` keeps the chart style's bar colors.
    fn legend_color(&self, _classification: BarClassification) -> Option<Color> {
        None
    }
}

/// Default waterfall bar: solid fill keyed by classification, outlined with
/// the same color so flat (zero-delta) bars still leave a visible stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterfallBarShape {
    pub increase_color: Color,
    pub decrease_color: Color,
    pub total_color: Color,
    pub stroke_width: f64,
    pub corner_radius: f64,
}

impl Default for WaterfallBarShape {
    fn default() -> Self {
        Self {
            increase_color: INCREASE_COLOR,
            decrease_color: DECREASE_COLOR,
            total_color: TOTAL_COLOR,
            stroke_width: 1.0,
            corner_radius: 0.0,
        }
    }
}

impl WaterfallBarShape {
    #[must_use]
    pub fn fill_for(&self, classification: BarClassification) -> Color {
        match classification {
            BarClassification::Increase => self.increase_color,
            BarClassification::Decrease => self.decrease_color,
            BarClassification::Total => self.total_color,
        }
    }
}

impl BarShape for WaterfallBarShape {
    fn draw(
        &self,
        bar: &WaterfallBarGeometry,
        classification: BarClassification,
        _index: usize,
        _total_count: usize,
    ) -> RectPrimitive {
        let fill = self.fill_for(classification);
        let mut rect = RectPrimitive::new(bar.x_left, bar.y_top, bar.width(), bar.height(), fill)
            .with_border(self.stroke_width, fill);
        if self.corner_radius > 0.0 {
            let max_corner_radius = bar.width().min(bar.height()) * 0.5;
            rect = rect.with_corner_radius(self.corner_radius.min(max_corner_radius));
        }
        rect
    }

    fn legend_color(&self, classification: BarClassification) -> Option<Color> {
        Some(self.fill_for(classification))
    }
}
