use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ChartError, ChartResult};
use crate::interaction::{BarClickHandler, ClickOutcome, ResetFiltersHandler};
use crate::render::Renderer;

use super::WaterfallChart;
use super::tooltip_renderer::TooltipContent;

/// Hovered bar and the pointer position the tooltip follows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverPoint {
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

fn validate_pointer(x: f64, y: f64) -> ChartResult<()> {
    if !x.is_finite() || !y.is_finite() {
        return Err(ChartError::InvalidPointer { x, y });
    }
    Ok(())
}

impl<R: Renderer> WaterfallChart<R> {
    pub fn set_on_bar_click(&mut self, handler: BarClickHandler) {
        self.interaction.set_on_bar_click(handler);
    }

    pub fn clear_on_bar_click(&mut self) {
        self.interaction.clear_on_bar_click();
    }

    pub fn set_reset_filters(&mut self, handler: Option<ResetFiltersHandler>) {
        self.interaction.set_reset_filters(handler);
    }

    #[must_use]
    pub fn notification(&self) -> Option<&str> {
        self.interaction.notification()
    }

    /// Clicks the bar at `index` directly, bypassing hit testing.
    pub fn click_bar(&mut self, index: usize) -> ClickOutcome {
        match self.computed.data_with_domain.get(index) {
            Some(datum) => self.interaction.on_bar_click(datum),
            None => ClickOutcome::Ignored,
        }
    }

    pub fn dismiss_notification(&mut self) -> ClickOutcome {
        self.interaction.dismiss_notification()
    }

    /// Index of the bar whose rectangle contains the pointer.
    pub fn bar_at(&mut self, x: f64, y: f64) -> ChartResult<Option<usize>> {
        validate_pointer(x, y)?;
        if self.props.error_message().is_some() {
            return Ok(None);
        }
        Ok(self
            .bar_geometries()?
            .into_iter()
            .find(|bar| bar.contains(x, y))
            .map(|bar| bar.index))
    }

    /// Routes a click: the notification banner dismisses itself, a bar hit
    /// emits the bar click, anything else is a background click.
    pub fn click_at(&mut self, x: f64, y: f64) -> ChartResult<ClickOutcome> {
        validate_pointer(x, y)?;
        if self.props.error_message().is_some() {
            return Ok(ClickOutcome::Ignored);
        }

        if self.interaction.notification().is_some()
            && self.notification_banner_rect().contains(x, y)
        {
            return Ok(self.interaction.dismiss_notification());
        }

        let outcome = match self.bar_at(x, y)? {
            Some(index) => self.click_bar(index),
            None => self.interaction.on_background_click(),
        };
        trace!(x, y, outcome = ?outcome, "waterfall click routed");
        Ok(outcome)
    }

    /// Tooltip for the bar at `index`, formatted with the chart formatter.
    #[must_use]
    pub fn tooltip(&self, index: usize) -> Option<TooltipContent> {
        self.computed
            .data_with_domain
            .get(index)
            .map(|datum| TooltipContent::for_datum(datum, self.formatter.as_ref()))
    }

    /// Updates the hovered bar from a pointer position inside the plot.
    ///
    /// The nearest category band wins, so hovering the gap between two bars
    /// still shows a tooltip. Leaving the plot clears the hover.
    pub fn hover_at(&mut self, x: f64, y: f64) -> ChartResult<Option<TooltipContent>> {
        validate_pointer(x, y)?;
        if self.props.error_message().is_some() || self.computed.is_empty() {
            self.hovered = None;
            return Ok(None);
        }

        let layout = self.layout()?;
        if !layout.plot.contains(x, y) {
            self.hovered = None;
            return Ok(None);
        }

        let band = self.band_scale(layout.plot)?;
        let nearest = (0..band.count())
            .min_by_key(|index| OrderedFloat((band.band_center(*index) - x).abs()));
        self.hovered = nearest.map(|index| HoverPoint { index, x, y });
        Ok(nearest.and_then(|index| self.tooltip(index)))
    }

    pub fn clear_hover(&mut self) {
        self.hovered = None;
    }
}
