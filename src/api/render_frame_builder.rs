use tracing::trace;

use crate::core::{
    BandScale, DEFAULT_MIN_BAR_HEIGHT_PX, LinearScale, WaterfallBarGeometry, project_waterfall_bars,
};
use crate::error::ChartResult;
use crate::render::{
    CanvasLayerKind, LayeredRenderFrame, LinePrimitive, RectPrimitive, RenderFrame, Renderer,
    TextHAlign, TextPrimitive,
};

use super::chart_props::LegendPosition;
use super::label_renderer::{BarLabel, LabelPlacement, layout_bar_labels};
use super::layout::{ChartLayout, LayoutInputs, PlotRect, estimate_layout, measure_layout};
use super::legend::LegendLayout;
use super::tick_renderer::{TickLabel, TickRenderer, format_category};
use super::WaterfallChart;
use super::tooltip_renderer::TooltipContent;

const TICK_LABEL_GAP_PX: f64 = 4.0;

/// One value-axis tick: domain value and its formatted text.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTick {
    pub value: f64,
    pub label: String,
}

impl<R: Renderer> WaterfallChart<R> {
    fn tick_renderer(&self) -> TickRenderer<'_> {
        TickRenderer::new(
            self.measurer.as_ref(),
            self.style.tick_font_size_px,
            self.props.tick_label_angle,
            self.props.max_tick_label_width_px,
        )
    }

    fn legend_layout(&self) -> Option<LegendLayout> {
        LegendLayout::measure(
            self.legend_entries(),
            self.props.legend_position,
            &self.style,
            self.measurer.as_ref(),
        )
    }

    /// Axis text for every bar, in bar order.
    #[must_use]
    pub fn category_labels(&self) -> Vec<String> {
        let time_format = self.props.x_axis_time_format.as_deref();
        self.computed
            .data_with_domain
            .iter()
            .map(|datum| format_category(datum, &self.props.x_axis_data_key, time_format))
            .collect()
    }

    /// Nice ticks over the padded axis domain, formatted with the chart formatter.
    pub fn value_ticks(&self) -> ChartResult<Vec<ValueTick>> {
        let scale = LinearScale::from_domain(self.axis_domain())?;
        Ok(scale
            .nice_ticks(self.style.value_tick_target_count)
            .into_iter()
            .map(|value| ValueTick {
                value,
                label: self.formatter.format(value),
            })
            .collect())
    }

    /// Resolves the plot rectangle for the current layout version.
    ///
    /// The first call after a change runs the estimate pass and then the
    /// measured pass; later calls with the same version reuse the result.
    pub fn layout(&mut self) -> ChartResult<ChartLayout> {
        if let Some(layout) = self.layout_cache.get(self.layout_version) {
            return Ok(layout);
        }

        let legend_size = self.legend_layout().map(|legend| legend.size());
        let inputs = LayoutInputs {
            viewport: self.props.viewport(),
            style: &self.style,
            measurer: self.measurer.as_ref(),
            legend_position: self.props.legend_position,
            legend_size,
            x_axis_label: &self.props.x_axis_label,
            y_axis_label: &self.props.y_axis_label,
        };
        let estimated = estimate_layout(&inputs, self.layout_version);

        let value_labels: Vec<String> = self
            .value_ticks()?
            .into_iter()
            .map(|tick| tick.label)
            .collect();
        let category_labels = self.category_labels();
        let band = self.band_scale(estimated.plot)?;
        let measured = measure_layout(
            &inputs,
            self.layout_version,
            &value_labels,
            &category_labels,
            &self.tick_renderer(),
            band.band_width(),
        );
        trace!(
            version = measured.version,
            plot_x = measured.plot.x,
            plot_y = measured.plot.y,
            plot_width = measured.plot.width,
            plot_height = measured.plot.height,
            "measured waterfall layout"
        );

        self.layout_cache.store(measured);
        Ok(measured)
    }

    pub(super) fn band_scale(&self, plot: PlotRect) -> ChartResult<BandScale> {
        BandScale::new(plot.x, plot.right(), self.computed.data_with_domain.len())
    }

    pub(super) fn value_scale(&self, plot: PlotRect) -> ChartResult<LinearScale> {
        LinearScale::from_domain(self.axis_domain())?.with_range(plot.bottom(), plot.y)
    }

    pub fn bar_geometries(&mut self) -> ChartResult<Vec<WaterfallBarGeometry>> {
        let layout = self.layout()?;
        project_waterfall_bars(
            &self.computed.data_with_domain,
            self.band_scale(layout.plot)?,
            self.value_scale(layout.plot)?,
            DEFAULT_MIN_BAR_HEIGHT_PX,
        )
    }

    pub fn bar_labels(&mut self) -> ChartResult<Vec<BarLabel>> {
        let layout = self.layout()?;
        let bars = self.bar_geometries()?;
        Ok(layout_bar_labels(
            &self.computed.data_with_domain,
            &bars,
            self.formatter.as_ref(),
            LabelPlacement {
                line_height_px: self.measurer.line_height_px(self.style.bar_label_font_size_px),
                offset_px: self.style.bar_label_offset_px,
                plot_top: layout.plot.y,
            },
        ))
    }

    pub fn tick_labels(&mut self) -> ChartResult<Vec<TickLabel>> {
        let layout = self.layout()?;
        let band = self.band_scale(layout.plot)?;
        Ok(self.tick_renderer().layout(
            &self.category_labels(),
            band,
            layout.plot.bottom() + self.style.tick_length_px,
            TICK_LABEL_GAP_PX,
        ))
    }

    /// Notification banner bounds, pinned to the top of the viewport.
    #[must_use]
    pub fn notification_banner_rect(&self) -> PlotRect {
        let viewport = self.props.viewport();
        PlotRect::new(
            0.0,
            0.0,
            f64::from(viewport.width),
            self.style.banner_height_px.min(f64::from(viewport.height)),
        )
    }

    pub fn build_render_frame(&mut self) -> ChartResult<RenderFrame> {
        Ok(self.build_layered_frame()?.flatten())
    }

    /// Composes the full chart, or only the error banner when the host
    /// supplied an error.
    pub fn build_layered_frame(&mut self) -> ChartResult<LayeredRenderFrame> {
        let viewport = self.props.viewport();
        let mut frame = LayeredRenderFrame::new(viewport);
        frame.push_rect(
            CanvasLayerKind::Background,
            RectPrimitive::new(
                0.0,
                0.0,
                f64::from(viewport.width),
                f64::from(viewport.height),
                self.style.background_color,
            ),
        );

        if let Some(message) = self.props.error_message() {
            let banner = self.notification_banner_rect();
            self.push_banner(&mut frame, banner, message, true);
            trace!("waterfall frame built with error banner");
            return Ok(frame);
        }

        let layout = self.layout()?;
        let value_scale = self.value_scale(layout.plot)?;
        let value_ticks = self.value_ticks()?;

        self.push_grid(&mut frame, layout.plot, value_scale, &value_ticks)?;
        self.push_bars(&mut frame)?;
        for label in self.bar_labels()? {
            frame.push_text(
                CanvasLayerKind::Labels,
                label.to_primitive(self.style.bar_label_font_size_px, self.style.text_color),
            );
        }
        self.push_axes(&mut frame, &layout, value_scale, &value_ticks)?;
        if let (Some(legend), Some(bounds)) = (self.legend_layout(), layout.legend) {
            legend.arrange(bounds, self.style.text_color, &mut frame);
        }
        self.push_overlay(&mut frame);

        trace!(
            bars = self.computed.data_with_domain.len(),
            version = self.layout_version,
            "waterfall frame built"
        );
        Ok(frame)
    }

    fn push_grid(
        &self,
        frame: &mut LayeredRenderFrame,
        plot: PlotRect,
        value_scale: LinearScale,
        ticks: &[ValueTick],
    ) -> ChartResult<()> {
        if !self.props.show_horizontal_grid_lines {
            return Ok(());
        }
        for tick in ticks {
            let y = value_scale.domain_to_pixel(tick.value)?;
            frame.push_line(
                CanvasLayerKind::Grid,
                LinePrimitive::new(
                    plot.x,
                    y,
                    plot.right(),
                    y,
                    self.style.grid_line_width,
                    self.style.grid_line_color,
                ),
            );
        }
        Ok(())
    }

    fn push_bars(&mut self, frame: &mut LayeredRenderFrame) -> ChartResult<()> {
        let bars = self.bar_geometries()?;
        let total_count = bars.len();
        let shape = self.bar_shape();
        for (bar, datum) in bars.iter().zip(&self.computed.data_with_domain) {
            frame.push_rect(
                CanvasLayerKind::Bars,
                shape.draw(bar, datum.classification, bar.index, total_count),
            );
        }
        Ok(())
    }

    fn push_axes(
        &mut self,
        frame: &mut LayeredRenderFrame,
        layout: &ChartLayout,
        value_scale: LinearScale,
        value_ticks: &[ValueTick],
    ) -> ChartResult<()> {
        let plot = layout.plot;
        let style = self.style;
        let axis_line = |x1, y1, x2, y2| {
            LinePrimitive::new(x1, y1, x2, y2, style.axis_line_width, style.axis_line_color)
        };

        // Value axis.
        frame.push_line(CanvasLayerKind::Axis, axis_line(plot.x, plot.y, plot.x, plot.bottom()));
        for tick in value_ticks {
            let y = value_scale.domain_to_pixel(tick.value)?;
            frame.push_line(
                CanvasLayerKind::Axis,
                axis_line(plot.x - style.tick_length_px, y, plot.x, y),
            );
            if tick.label.is_empty() {
                continue;
            }
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    tick.label.clone(),
                    plot.x - style.tick_length_px - TICK_LABEL_GAP_PX,
                    y - style.tick_font_size_px * 0.5,
                    style.tick_font_size_px,
                    style.text_color,
                    TextHAlign::Right,
                ),
            );
        }

        // Category axis along the plot bottom, plus a zero line when the
        // domain crosses zero.
        frame.push_line(
            CanvasLayerKind::Axis,
            axis_line(plot.x, plot.bottom(), plot.right(), plot.bottom()),
        );
        let axis_domain = self.axis_domain();
        if axis_domain.min < 0.0 && axis_domain.max > 0.0 {
            let zero_y = value_scale.domain_to_pixel(0.0)?;
            frame.push_line(CanvasLayerKind::Axis, axis_line(plot.x, zero_y, plot.right(), zero_y));
        }
        let band = self.band_scale(plot)?;
        for index in 0..band.count() {
            let x = band.band_center(index);
            frame.push_line(
                CanvasLayerKind::Axis,
                axis_line(x, plot.bottom(), x, plot.bottom() + style.tick_length_px),
            );
        }
        for tick in self.tick_labels()? {
            frame.push_text(
                CanvasLayerKind::Axis,
                tick.to_primitive(style.tick_font_size_px, style.text_color),
            );
        }

        self.push_axis_titles(frame, layout);
        Ok(())
    }

    fn push_axis_titles(&self, frame: &mut LayeredRenderFrame, layout: &ChartLayout) {
        let style = &self.style;
        let viewport = self.props.viewport();
        let font_size = style.axis_title_font_size_px;
        let line_height = self.measurer.line_height_px(font_size);
        let plot = layout.plot;

        let x_title = self.props.x_axis_label.trim();
        if !x_title.is_empty() {
            let bottom = match (self.props.legend_position, layout.legend) {
                (LegendPosition::Bottom, Some(legend)) => legend.y - TICK_LABEL_GAP_PX,
                _ => f64::from(viewport.height) - style.outer_padding_px,
            };
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    x_title,
                    plot.x + plot.width * 0.5,
                    (bottom - line_height).max(0.0),
                    font_size,
                    style.text_color,
                    TextHAlign::Center,
                ),
            );
        }

        let y_title = self.props.y_axis_label.trim();
        if !y_title.is_empty() {
            let left = match (self.props.legend_position, layout.legend) {
                (LegendPosition::Left, Some(legend)) => legend.right() + TICK_LABEL_GAP_PX,
                _ => style.outer_padding_px,
            };
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    y_title,
                    left + line_height * 0.5,
                    plot.y + plot.height * 0.5,
                    font_size,
                    style.text_color,
                    TextHAlign::Center,
                )
                .with_rotation(self.props.y_axis_label_angle),
            );
        }
    }

    fn push_overlay(&self, frame: &mut LayeredRenderFrame) {
        if let Some(hover) = self.hovered {
            if let Some(datum) = self.computed.data_with_domain.get(hover.index) {
                let content = TooltipContent::for_datum(datum, self.formatter.as_ref());
                let (background, texts) = content.to_primitives(
                    hover.x,
                    hover.y,
                    self.props.viewport(),
                    &self.style,
                    self.measurer.as_ref(),
                );
                frame.push_rect(CanvasLayerKind::Overlay, background);
                for text in texts {
                    frame.push_text(CanvasLayerKind::Overlay, text);
                }
            }
        }

        if let Some(message) = self.interaction.notification() {
            if !message.trim().is_empty() {
                let banner = self.notification_banner_rect();
                self.push_banner(frame, banner, message, false);
            }
        }
    }

    fn push_banner(
        &self,
        frame: &mut LayeredRenderFrame,
        bounds: PlotRect,
        message: &str,
        is_error: bool,
    ) {
        let (background, text_color) = if is_error {
            (self.style.error_background_color, self.style.error_text_color)
        } else {
            (
                self.style.notification_background_color,
                self.style.notification_text_color,
            )
        };
        let font_size = self.style.tooltip_font_size_px;
        frame.push_rect(
            CanvasLayerKind::Overlay,
            RectPrimitive::new(bounds.x, bounds.y, bounds.width, bounds.height, background),
        );
        frame.push_text(
            CanvasLayerKind::Overlay,
            TextPrimitive::new(
                message,
                bounds.x + bounds.width * 0.5,
                bounds.y + ((bounds.height - font_size) * 0.5).max(0.0),
                font_size,
                text_color,
                TextHAlign::Center,
            ),
        );
    }
}
