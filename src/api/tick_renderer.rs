use std::fmt::Write as _;

use chrono::DateTime;
use serde_json::Value;
use tracing::warn;

use crate::core::{BandScale, WaterfallDatum};
use crate::render::{Color, TextHAlign, TextPrimitive};

use super::text_measure::{TextMeasurer, truncate_to_width};

/// One category-axis label after rotation and truncation.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLabel {
    pub index: usize,
    pub text: String,
    /// Untruncated text, kept for tooltips and accessibility.
    pub full_text: String,
    pub x: f64,
    pub y: f64,
    pub rotation_deg: f64,
    pub truncated: bool,
}

impl TickLabel {
    #[must_use]
    pub fn to_primitive(&self, font_size_px: f64, color: Color) -> TextPrimitive {
        // Rotated text hangs below the axis: counter-clockwise labels end at
        // the tick, clockwise labels start there.
        let h_align = if self.rotation_deg < 0.0 {
            TextHAlign::Right
        } else if self.rotation_deg > 0.0 {
            TextHAlign::Left
        } else {
            TextHAlign::Center
        };
        TextPrimitive::new(self.text.clone(), self.x, self.y, font_size_px, color, h_align)
            .with_rotation(self.rotation_deg)
    }
}

/// Category-axis tick text: optional temporal formatting, rotation, and
/// ellipsis truncation against the allowed width.
///
/// The allowed width is the category slot width for horizontal labels and
/// `max_rotated_width_px` once labels are rotated.
#[derive(Clone, Copy)]
pub struct TickRenderer<'a> {
    measurer: &'a dyn TextMeasurer,
    font_size_px: f64,
    angle_deg: f64,
    max_rotated_width_px: f64,
}

impl<'a> TickRenderer<'a> {
    #[must_use]
    pub fn new(
        measurer: &'a dyn TextMeasurer,
        font_size_px: f64,
        angle_deg: f64,
        max_rotated_width_px: f64,
    ) -> Self {
        Self {
            measurer,
            font_size_px,
            angle_deg,
            max_rotated_width_px,
        }
    }

    #[must_use]
    pub fn is_rotated(&self) -> bool {
        self.angle_deg != 0.0
    }

    #[must_use]
    pub fn allowed_width(&self, slot_width_px: f64) -> f64 {
        if self.is_rotated() {
            self.max_rotated_width_px
        } else {
            slot_width_px.max(0.0)
        }
    }

    /// Fits one label into the allowed width.
    #[must_use]
    pub fn fit_label(&self, text: &str, slot_width_px: f64) -> (String, bool) {
        let fitted = truncate_to_width(
            self.measurer,
            text,
            self.font_size_px,
            self.allowed_width(slot_width_px),
        );
        let truncated = fitted != text;
        (fitted, truncated)
    }

    /// Vertical space the fitted labels need below the axis line.
    #[must_use]
    pub fn required_height_px(&self, labels: &[String], slot_width_px: f64) -> f64 {
        let line_height = self.measurer.line_height_px(self.font_size_px);
        let (sin, cos) = self.angle_deg.to_radians().sin_cos();
        labels
            .iter()
            .map(|label| {
                let (fitted, _) = self.fit_label(label, slot_width_px);
                let width = self.measurer.text_width_px(&fitted, self.font_size_px);
                width * sin.abs() + line_height * cos.abs()
            })
            .fold(line_height * cos.abs(), f64::max)
    }

    /// Lays out one label per band, anchored `gap_px` below `axis_y`.
    #[must_use]
    pub fn layout(
        &self,
        labels: &[String],
        band: BandScale,
        axis_y: f64,
        gap_px: f64,
    ) -> Vec<TickLabel> {
        let slot_width = band.band_width();
        labels
            .iter()
            .enumerate()
            .take(band.count())
            .filter(|(_, label)| !label.is_empty())
            .map(|(index, label)| {
                let (text, truncated) = self.fit_label(label, slot_width);
                TickLabel {
                    index,
                    text,
                    full_text: label.clone(),
                    x: band.band_center(index),
                    y: axis_y + gap_px,
                    rotation_deg: self.angle_deg,
                    truncated,
                }
            })
            .collect()
    }
}

/// Category text for the axis, honoring an optional `chrono` pattern for
/// epoch-millisecond categories.
#[must_use]
pub fn format_category(datum: &WaterfallDatum, category_key: &str, time_format: Option<&str>) -> String {
    let Some(pattern) = time_format else {
        return datum.category.clone();
    };
    let millis = match datum.row.get(category_key) {
        Some(Value::Number(number)) => number.as_i64(),
        _ => None,
    };
    let Some(timestamp) = millis.and_then(DateTime::from_timestamp_millis) else {
        return datum.category.clone();
    };

    let mut text = String::new();
    if write!(text, "{}", timestamp.format(pattern)).is_err() {
        warn!(pattern, "invalid x-axis time format, using raw category");
        return datum.category.clone();
    }
    text
}
