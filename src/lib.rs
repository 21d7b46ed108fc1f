//! waterfall-chart: domain and geometry engine for waterfall bar charts.
//!
//! Raw per-category rows go in; cumulative bar ranges, an axis domain, bar
//! classifications and a backend-agnostic `RenderFrame` come out. Drawing the
//! frame is left to a host-supplied `Renderer`.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{WaterfallChart, WaterfallChartProps};
pub use error::{ChartError, ChartResult};
