use crate::render::{Color, WaterfallBarShape};

/// Visual constants for one chart frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterfallStyle {
    pub background_color: Color,
    pub bar_shape: WaterfallBarShape,
    pub grid_line_color: Color,
    pub grid_line_width: f64,
    pub axis_line_color: Color,
    pub axis_line_width: f64,
    pub text_color: Color,
    pub tick_font_size_px: f64,
    pub bar_label_font_size_px: f64,
    pub axis_title_font_size_px: f64,
    pub legend_font_size_px: f64,
    pub legend_swatch_size_px: f64,
    pub legend_item_gap_px: f64,
    /// Gap between a bar top and its label.
    pub bar_label_offset_px: f64,
    pub tick_length_px: f64,
    pub outer_padding_px: f64,
    pub tooltip_font_size_px: f64,
    pub tooltip_padding_px: f64,
    pub tooltip_background_color: Color,
    pub tooltip_border_color: Color,
    pub tooltip_offset_px: f64,
    pub banner_height_px: f64,
    pub notification_background_color: Color,
    pub notification_text_color: Color,
    pub error_background_color: Color,
    pub error_text_color: Color,
    pub value_tick_target_count: usize,
}

impl Default for WaterfallStyle {
    fn default() -> Self {
        Self {
            background_color: Color::rgb(1.0, 1.0, 1.0),
            bar_shape: WaterfallBarShape::default(),
            grid_line_color: Color::rgb8(0xE0, 0xE0, 0xE0),
            grid_line_width: 1.0,
            axis_line_color: Color::rgb8(0x99, 0x99, 0x99),
            axis_line_width: 1.0,
            text_color: Color::rgb8(0x32, 0x32, 0x32),
            tick_font_size_px: 11.0,
            bar_label_font_size_px: 11.0,
            axis_title_font_size_px: 12.0,
            legend_font_size_px: 11.0,
            legend_swatch_size_px: 10.0,
            legend_item_gap_px: 12.0,
            bar_label_offset_px: 4.0,
            tick_length_px: 4.0,
            outer_padding_px: 8.0,
            tooltip_font_size_px: 11.0,
            tooltip_padding_px: 6.0,
            tooltip_background_color: Color::rgba(1.0, 1.0, 1.0, 0.95),
            tooltip_border_color: Color::rgb8(0xCC, 0xCC, 0xCC),
            tooltip_offset_px: 12.0,
            banner_height_px: 28.0,
            notification_background_color: Color::rgb8(0x1F, 0xA7, 0xC9).with_alpha(0.92),
            notification_text_color: Color::rgb(1.0, 1.0, 1.0),
            error_background_color: Color::rgb8(0xFD, 0xE8, 0xE8),
            error_text_color: Color::rgb8(0xB7, 0x1C, 0x1C),
            value_tick_target_count: 6,
        }
    }
}
