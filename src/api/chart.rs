use std::sync::Arc;

use crate::core::{Domain, WaterfallDatum, WaterfallDomain};
use crate::error::ChartResult;
use crate::interaction::InteractionController;
use crate::render::{BarShape, Renderer};

use super::interaction_controller::HoverPoint;
use super::layout::LayoutCache;
use super::legend::{LegendEntries, legend_entries};
use super::number_format::{NumberFormatter, SharedNumberFormatter};
use super::text_measure::TextMeasurer;
use super::{WaterfallChartProps, WaterfallStyle};

/// Main facade consumed by host applications.
///
/// `WaterfallChart` owns the props, the derived cumulative data, the
/// interaction state and the layout cache, and hands one `RenderFrame` per
/// render to its `Renderer`.
pub struct WaterfallChart<R: Renderer> {
    pub(super) renderer: R,
    pub(super) props: WaterfallChartProps,
    pub(super) style: WaterfallStyle,
    pub(super) computed: WaterfallDomain,
    pub(super) formatter: SharedNumberFormatter,
    pub(super) custom_formatter: bool,
    pub(super) measurer: Arc<dyn TextMeasurer>,
    /// Replaces `style.bar_shape` for bar drawing when set.
    pub(super) custom_bar_shape: Option<Box<dyn BarShape>>,
    pub(super) interaction: InteractionController,
    pub(super) layout_version: u64,
    pub(super) layout_cache: LayoutCache,
    pub(super) hovered: Option<HoverPoint>,
}

impl<R: Renderer> WaterfallChart<R> {
    #[must_use]
    pub fn props(&self) -> &WaterfallChartProps {
        &self.props
    }

    #[must_use]
    pub fn style(&self) -> WaterfallStyle {
        self.style
    }

    /// Cumulative bars and the tight value domain derived from the current data.
    #[must_use]
    pub fn computed(&self) -> &WaterfallDomain {
        &self.computed
    }

    #[must_use]
    pub fn data_with_domain(&self) -> &[WaterfallDatum] {
        &self.computed.data_with_domain
    }

    #[must_use]
    pub fn domain(&self) -> Domain {
        self.computed.domain
    }

    /// Value-axis domain: the tight domain grown by `domain_padding_ratio`.
    #[must_use]
    pub fn axis_domain(&self) -> Domain {
        self.computed.axis_domain(self.props.domain_padding_ratio)
    }

    #[must_use]
    pub fn formatter(&self) -> &dyn NumberFormatter {
        self.formatter.as_ref()
    }

    #[must_use]
    pub fn legend_entries(&self) -> LegendEntries {
        legend_entries(self.bar_shape(), &self.style.bar_shape)
    }

    /// Bumped on every prop or style change; keys the measured layout.
    #[must_use]
    pub fn layout_version(&self) -> u64 {
        self.layout_version
    }

    /// Number of measured layout passes performed so far.
    #[must_use]
    pub fn layout_measure_count(&self) -> u64 {
        self.layout_cache.measure_count()
    }

    pub(super) fn bar_shape(&self) -> &dyn BarShape {
        match &self.custom_bar_shape {
            Some(shape) => shape.as_ref(),
            None => &self.style.bar_shape,
        }
    }

    #[must_use]
    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    #[must_use]
    pub fn hovered_index(&self) -> Option<usize> {
        self.hovered.map(|hover| hover.index)
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.build_render_frame()?;
        self.renderer.render(&frame)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
