use serde::{Deserialize, Serialize};

use crate::core::{BarClassification, Domain, Viewport, WaterfallBarGeometry};
use crate::error::ChartResult;
use crate::interaction::InteractionMode;
use crate::render::Renderer;

use super::label_renderer::bar_label_text;
use super::WaterfallChart;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSnapshot {
    pub index: usize,
    pub category: String,
    pub start: f64,
    pub end: f64,
    pub delta: f64,
    pub classification: BarClassification,
    pub is_total: bool,
    #[serde(default)]
    pub synthetic: bool,
    pub label: String,
    /// Absent while the chart shows an error banner.
    #[serde(default)]
    pub geometry: Option<WaterfallBarGeometry>,
}

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallSnapshot {
    pub viewport: Viewport,
    pub layout_version: u64,
    pub domain: Domain,
    pub axis_domain: Domain,
    pub bars: Vec<BarSnapshot>,
    pub interactive: bool,
    pub interaction_mode: InteractionMode,
    pub notification: Option<String>,
    pub error: Option<String>,
}

impl<R: Renderer> WaterfallChart<R> {
    pub fn snapshot(&mut self) -> ChartResult<WaterfallSnapshot> {
        let error = self.props.error_message().map(str::to_owned);
        let geometries = if error.is_some() {
            Vec::new()
        } else {
            self.bar_geometries()?
        };

        let formatter = self.formatter.as_ref();
        let bars = self
            .computed
            .data_with_domain
            .iter()
            .map(|datum| BarSnapshot {
                index: datum.index,
                category: datum.category.clone(),
                start: datum.value.start,
                end: datum.value.end,
                delta: datum.delta(),
                classification: datum.classification,
                is_total: datum.is_total,
                synthetic: datum.synthetic,
                label: bar_label_text(datum, formatter),
                geometry: geometries.get(datum.index).copied(),
            })
            .collect();

        Ok(WaterfallSnapshot {
            viewport: self.props.viewport(),
            layout_version: self.layout_version,
            domain: self.domain(),
            axis_domain: self.axis_domain(),
            bars,
            interactive: self.interaction.is_interactive(),
            interaction_mode: self.interaction.mode(),
            notification: self.interaction.notification().map(str::to_owned),
            error,
        })
    }
}
