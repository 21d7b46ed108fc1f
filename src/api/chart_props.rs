use serde::{Deserialize, Serialize};

use crate::core::{RawDataPoint, TotalRowMatcher, Viewport, WaterfallDomainOptions};
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_DOMAIN_PADDING_RATIO: f64 = 0.05;
pub const DEFAULT_TICK_LABEL_ANGLE_DEG: f64 = -45.0;
pub const DEFAULT_Y_AXIS_LABEL_ANGLE_DEG: f64 = -90.0;
pub const DEFAULT_MAX_TICK_LABEL_WIDTH_PX: f64 = 80.0;

/// Where the three-entry legend is drawn relative to the plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
    /// Legend is not drawn and reserves no space.
    Hidden,
}

/// Host-facing chart configuration.
///
/// Everything except callbacks is plain data so hosts can ship props as
/// JSON. Field names follow the dashboard form controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallChartProps {
    #[serde(default)]
    pub data: Vec<RawDataPoint>,
    pub x_axis_data_key: String,
    pub data_key: String,
    #[serde(default)]
    pub x_axis_label: String,
    #[serde(default)]
    pub y_axis_label: String,
    #[serde(default = "default_y_axis_label_angle")]
    pub y_axis_label_angle: f64,
    #[serde(default)]
    pub legend_position: LegendPosition,
    #[serde(default)]
    pub numbers_format: Option<String>,
    pub height: u32,
    pub width: u32,
    /// Host error; when non-empty the chart shows only an error banner.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default = "default_true")]
    pub show_horizontal_grid_lines: bool,
    /// Clicks emit filters only when set.
    #[serde(default)]
    pub interactive: bool,
    #[serde(default)]
    pub notification_message: Option<String>,
    #[serde(default)]
    pub total_row: TotalRowMatcher,
    #[serde(default)]
    pub append_total: Option<String>,
    #[serde(default = "default_domain_padding_ratio")]
    pub domain_padding_ratio: f64,
    /// `chrono` pattern applied to epoch-millisecond categories.
    #[serde(default)]
    pub x_axis_time_format: Option<String>,
    #[serde(default = "default_tick_label_angle")]
    pub tick_label_angle: f64,
    #[serde(default = "default_max_tick_label_width_px")]
    pub max_tick_label_width_px: f64,
}

fn default_true() -> bool {
    true
}

fn default_y_axis_label_angle() -> f64 {
    DEFAULT_Y_AXIS_LABEL_ANGLE_DEG
}

fn default_domain_padding_ratio() -> f64 {
    DEFAULT_DOMAIN_PADDING_RATIO
}

fn default_tick_label_angle() -> f64 {
    DEFAULT_TICK_LABEL_ANGLE_DEG
}

fn default_max_tick_label_width_px() -> f64 {
    DEFAULT_MAX_TICK_LABEL_WIDTH_PX
}

impl WaterfallChartProps {
    #[must_use]
    pub fn new(
        x_axis_data_key: impl Into<String>,
        data_key: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            data: Vec::new(),
            x_axis_data_key: x_axis_data_key.into(),
            data_key: data_key.into(),
            x_axis_label: String::new(),
            y_axis_label: String::new(),
            y_axis_label_angle: DEFAULT_Y_AXIS_LABEL_ANGLE_DEG,
            legend_position: LegendPosition::default(),
            numbers_format: None,
            height,
            width,
            error: None,
            show_horizontal_grid_lines: true,
            interactive: false,
            notification_message: None,
            total_row: TotalRowMatcher::default(),
            append_total: None,
            domain_padding_ratio: DEFAULT_DOMAIN_PADDING_RATIO,
            x_axis_time_format: None,
            tick_label_angle: DEFAULT_TICK_LABEL_ANGLE_DEG,
            max_tick_label_width_px: DEFAULT_MAX_TICK_LABEL_WIDTH_PX,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: Vec<RawDataPoint>) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn with_axis_labels(mut self, x_axis_label: impl Into<String>, y_axis_label: impl Into<String>) -> Self {
        self.x_axis_label = x_axis_label.into();
        self.y_axis_label = y_axis_label.into();
        self
    }

    #[must_use]
    pub fn with_legend_position(mut self, position: LegendPosition) -> Self {
        self.legend_position = position;
        self
    }

    #[must_use]
    pub fn with_numbers_format(mut self, specifier: impl Into<String>) -> Self {
        self.numbers_format = Some(specifier.into());
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    #[must_use]
    pub fn with_horizontal_grid_lines(mut self, show: bool) -> Self {
        self.show_horizontal_grid_lines = show;
        self
    }

    #[must_use]
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    #[must_use]
    pub fn with_notification_message(mut self, message: impl Into<String>) -> Self {
        self.notification_message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_total_row(mut self, matcher: TotalRowMatcher) -> Self {
        self.total_row = matcher;
        self
    }

    #[must_use]
    pub fn with_appended_total(mut self, label: impl Into<String>) -> Self {
        self.append_total = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_domain_padding_ratio(mut self, ratio: f64) -> Self {
        self.domain_padding_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_x_axis_time_format(mut self, pattern: impl Into<String>) -> Self {
        self.x_axis_time_format = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn with_tick_label_angle(mut self, angle_deg: f64) -> Self {
        self.tick_label_angle = angle_deg;
        self
    }

    #[must_use]
    pub fn with_max_tick_label_width_px(mut self, width_px: f64) -> Self {
        self.max_tick_label_width_px = width_px;
        self
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Trimmed host error, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }

    #[must_use]
    pub fn domain_options(&self) -> WaterfallDomainOptions {
        let mut options = WaterfallDomainOptions::new(&*self.x_axis_data_key, &*self.data_key)
            .with_total_rows(self.total_row.clone());
        if let Some(label) = &self.append_total {
            options = options.with_appended_total(label.clone());
        }
        options
    }

    pub fn validate(&self) -> ChartResult<()> {
        let viewport = self.viewport();
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let invalid = |field: &'static str, reason: &str| {
            Err(ChartError::InvalidProps {
                field,
                reason: reason.to_owned(),
            })
        };
        if self.x_axis_data_key.trim().is_empty() {
            return invalid("x_axis_data_key", "must not be empty");
        }
        if self.data_key.trim().is_empty() {
            return invalid("data_key", "must not be empty");
        }
        if !self.domain_padding_ratio.is_finite() || self.domain_padding_ratio < 0.0 {
            return invalid("domain_padding_ratio", "must be finite and >= 0");
        }
        if !self.tick_label_angle.is_finite() {
            return invalid("tick_label_angle", "must be finite");
        }
        if !self.y_axis_label_angle.is_finite() {
            return invalid("y_axis_label_angle", "must be finite");
        }
        if !self.max_tick_label_width_px.is_finite() || self.max_tick_label_width_px <= 0.0 {
            return invalid("max_tick_label_width_px", "must be finite and > 0");
        }
        Ok(())
    }
}
