mod chart;
mod chart_init;
mod chart_props;
mod chart_snapshot;
mod interaction_controller;
mod json_contract;
mod label_renderer;
mod layout;
mod legend;
mod number_format;
mod render_frame_builder;
mod render_style;
mod text_measure;
mod tick_renderer;
mod tooltip_renderer;

pub use chart::WaterfallChart;
pub use chart_props::{
    DEFAULT_DOMAIN_PADDING_RATIO, DEFAULT_MAX_TICK_LABEL_WIDTH_PX, DEFAULT_TICK_LABEL_ANGLE_DEG,
    DEFAULT_Y_AXIS_LABEL_ANGLE_DEG, LegendPosition, WaterfallChartProps,
};
pub use chart_snapshot::{BarSnapshot, WaterfallSnapshot};
pub use interaction_controller::HoverPoint;
pub use json_contract::{WATERFALL_SNAPSHOT_JSON_SCHEMA_V1, WaterfallSnapshotJsonContractV1};
pub use label_renderer::{BarLabel, LabelPlacement, bar_label_text, layout_bar_labels};
pub use layout::{ChartLayout, LayoutPass, Margins, PlotRect};
pub use legend::{LegendEntries, LegendEntry, LegendLayout, legend_entries};
pub use number_format::{
    FormatKind, FormatPattern, NumberFormat, NumberFormatter, SMART_NUMBER, SharedNumberFormatter,
};
pub use render_frame_builder::ValueTick;
pub use render_style::WaterfallStyle;
pub use text_measure::{HeuristicTextMeasurer, TextMeasurer, truncate_to_width};
pub use tick_renderer::{TickLabel, TickRenderer, format_category};
pub use tooltip_renderer::{TooltipContent, TooltipRow};
