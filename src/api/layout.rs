use serde::{Deserialize, Serialize};

use crate::core::Viewport;

use super::chart_props::LegendPosition;
use super::render_style::WaterfallStyle;
use super::text_measure::TextMeasurer;
use super::tick_renderer::TickRenderer;

const TITLE_GAP_PX: f64 = 6.0;
const TICK_LABEL_GAP_PX: f64 = 4.0;
const LEGEND_GAP_PX: f64 = 8.0;
const ESTIMATED_VALUE_AXIS_WIDTH_PX: f64 = 40.0;
const ESTIMATED_CATEGORY_AXIS_HEIGHT_PX: f64 = 40.0;

/// Axis-aligned rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotRect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPass {
    /// Default margins; used to derive the tick strings that get measured.
    Estimated,
    /// Margins sized from measured tick and title extents.
    Measured,
}

/// Resolved plot and legend placement for one layout version.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub version: u64,
    pub pass: LayoutPass,
    pub margins: Margins,
    pub plot: PlotRect,
    pub legend: Option<PlotRect>,
}

/// Everything the margin computation needs to know about the chart content.
pub(crate) struct LayoutInputs<'a> {
    pub viewport: Viewport,
    pub style: &'a WaterfallStyle,
    pub measurer: &'a dyn TextMeasurer,
    pub legend_position: LegendPosition,
    pub legend_size: Option<(f64, f64)>,
    pub x_axis_label: &'a str,
    pub y_axis_label: &'a str,
}

impl LayoutInputs<'_> {
    fn title_band(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            0.0
        } else {
            self.measurer.line_height_px(self.style.axis_title_font_size_px) + TITLE_GAP_PX
        }
    }

    fn bar_label_band(&self) -> f64 {
        self.measurer
            .line_height_px(self.style.bar_label_font_size_px)
            + self.style.bar_label_offset_px
    }

    /// Space reserved on each side for the legend block.
    fn legend_margins(&self) -> Margins {
        let mut margins = Margins::default();
        if let Some((width, height)) = self.legend_size {
            match self.legend_position {
                LegendPosition::Top => margins.top = height + LEGEND_GAP_PX,
                LegendPosition::Bottom => margins.bottom = height + LEGEND_GAP_PX,
                LegendPosition::Left => margins.left = width + LEGEND_GAP_PX,
                LegendPosition::Right => margins.right = width + LEGEND_GAP_PX,
                LegendPosition::Hidden => {}
            }
        }
        margins
    }
}

/// First pass: fixed guesses for the axis bands.
pub(crate) fn estimate_layout(inputs: &LayoutInputs<'_>, version: u64) -> ChartLayout {
    let pad = inputs.style.outer_padding_px;
    let legend = inputs.legend_margins();
    let margins = Margins {
        top: pad + inputs.bar_label_band() + legend.top,
        right: pad + legend.right,
        bottom: pad
            + inputs.style.tick_length_px
            + ESTIMATED_CATEGORY_AXIS_HEIGHT_PX
            + inputs.title_band(inputs.x_axis_label)
            + legend.bottom,
        left: pad
            + ESTIMATED_VALUE_AXIS_WIDTH_PX
            + inputs.title_band(inputs.y_axis_label)
            + legend.left,
    };
    resolve_layout(inputs, margins, version, LayoutPass::Estimated)
}

/// Second pass: margins from the measured tick strings of the estimated layout.
pub(crate) fn measure_layout(
    inputs: &LayoutInputs<'_>,
    version: u64,
    value_tick_labels: &[String],
    category_labels: &[String],
    ticks: &TickRenderer<'_>,
    slot_width_px: f64,
) -> ChartLayout {
    let style = inputs.style;
    let pad = style.outer_padding_px;
    let legend = inputs.legend_margins();

    let value_axis_width = value_tick_labels
        .iter()
        .map(|label| inputs.measurer.text_width_px(label, style.tick_font_size_px))
        .fold(0.0, f64::max);
    let category_axis_height = ticks.required_height_px(category_labels, slot_width_px);

    let margins = Margins {
        top: pad + inputs.bar_label_band() + legend.top,
        right: pad + legend.right,
        bottom: pad
            + style.tick_length_px
            + TICK_LABEL_GAP_PX
            + category_axis_height
            + inputs.title_band(inputs.x_axis_label)
            + legend.bottom,
        left: pad
            + value_axis_width
            + style.tick_length_px
            + TICK_LABEL_GAP_PX
            + inputs.title_band(inputs.y_axis_label)
            + legend.left,
    };
    resolve_layout(inputs, margins, version, LayoutPass::Measured)
}

fn resolve_layout(
    inputs: &LayoutInputs<'_>,
    margins: Margins,
    version: u64,
    pass: LayoutPass,
) -> ChartLayout {
    let width = f64::from(inputs.viewport.width);
    let height = f64::from(inputs.viewport.height);
    let plot = PlotRect::new(
        margins.left.min(width),
        margins.top.min(height),
        (width - margins.left - margins.right).max(0.0),
        (height - margins.top - margins.bottom).max(0.0),
    );
    let legend = inputs
        .legend_size
        .and_then(|size| place_legend(inputs, size, plot, width, height));

    ChartLayout {
        version,
        pass,
        margins,
        plot,
        legend,
    }
}

fn place_legend(
    inputs: &LayoutInputs<'_>,
    (legend_width, legend_height): (f64, f64),
    plot: PlotRect,
    width: f64,
    height: f64,
) -> Option<PlotRect> {
    let pad = inputs.style.outer_padding_px;
    let centered_x = (plot.x + (plot.width - legend_width) * 0.5).max(0.0);
    let centered_y = (plot.y + (plot.height - legend_height) * 0.5).max(0.0);
    let (x, y) = match inputs.legend_position {
        LegendPosition::Hidden => return None,
        LegendPosition::Top => (centered_x, pad),
        LegendPosition::Bottom => (centered_x, (height - pad - legend_height).max(0.0)),
        LegendPosition::Left => (pad, centered_y),
        LegendPosition::Right => ((width - pad - legend_width).max(0.0), centered_y),
    };
    Some(PlotRect::new(x, y, legend_width, legend_height))
}

/// Measured layout memo keyed by the chart's layout version.
#[derive(Debug, Clone, Default)]
pub(crate) struct LayoutCache {
    entry: Option<ChartLayout>,
    measure_count: u64,
}

impl LayoutCache {
    pub fn get(&self, version: u64) -> Option<ChartLayout> {
        self.entry.filter(|layout| layout.version == version)
    }

    pub fn store(&mut self, layout: ChartLayout) {
        self.measure_count += 1;
        self.entry = Some(layout);
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn measure_count(&self) -> u64 {
        self.measure_count
    }
}
