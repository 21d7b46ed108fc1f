use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::{RawDataPoint, compute_waterfall_domain};
use crate::error::ChartResult;
use crate::interaction::{DEFAULT_NOTIFICATION_MESSAGE, InteractionController};
use crate::render::{BarShape, Renderer};

use super::layout::LayoutCache;
use super::number_format::{NumberFormat, NumberFormatter, SharedNumberFormatter};
use super::text_measure::{HeuristicTextMeasurer, TextMeasurer};
use super::{WaterfallChart, WaterfallChartProps, WaterfallStyle};

impl<R: Renderer> WaterfallChart<R> {
    /// Validates `props` and derives the cumulative data.
    pub fn new(renderer: R, props: WaterfallChartProps) -> ChartResult<Self> {
        props.validate()?;

        let computed = compute_waterfall_domain(&props.data, &props.domain_options());
        let mut interaction = InteractionController::new(props.interactive);
        interaction.set_message(notification_message(&props));
        debug!(
            rows = props.data.len(),
            bars = computed.data_with_domain.len(),
            interactive = props.interactive,
            "waterfall chart created"
        );

        Ok(Self {
            renderer,
            formatter: resolve_formatter(props.numbers_format.as_deref()),
            props,
            style: WaterfallStyle::default(),
            computed,
            custom_formatter: false,
            measurer: Arc::new(HeuristicTextMeasurer),
            custom_bar_shape: None,
            interaction,
            layout_version: 0,
            layout_cache: LayoutCache::default(),
            hovered: None,
        })
    }

    #[must_use]
    pub fn with_style(mut self, style: WaterfallStyle) -> Self {
        self.set_style(style);
        self
    }

    /// Replaces all props; derived data and layout are recomputed on the
    /// next access. Invalid props leave the chart unchanged.
    pub fn set_props(&mut self, props: WaterfallChartProps) -> ChartResult<()> {
        props.validate()?;

        self.computed = compute_waterfall_domain(&props.data, &props.domain_options());
        if !self.custom_formatter && props.numbers_format != self.props.numbers_format {
            self.formatter = resolve_formatter(props.numbers_format.as_deref());
        }
        self.interaction.set_interactive(props.interactive);
        self.interaction.set_message(notification_message(&props));
        self.hovered = None;
        self.props = props;
        self.invalidate_layout();

        debug!(
            rows = self.props.data.len(),
            bars = self.computed.data_with_domain.len(),
            layout_version = self.layout_version,
            "waterfall props updated"
        );
        Ok(())
    }

    pub fn set_data(&mut self, data: Vec<RawDataPoint>) -> ChartResult<()> {
        let props = WaterfallChartProps {
            data,
            ..self.props.clone()
        };
        self.set_props(props)
    }

    /// Sets or clears the host error; a non-empty error replaces the chart
    /// with an error banner.
    pub fn set_error(&mut self, error: Option<String>) {
        self.props.error = error;
        self.invalidate_layout();
    }

    pub fn set_style(&mut self, style: WaterfallStyle) {
        self.style = style;
        self.invalidate_layout();
    }

    /// Overrides the `numbers_format`-driven formatter for every text producer.
    pub fn set_number_formatter(&mut self, formatter: Arc<dyn NumberFormatter>) {
        self.formatter = formatter;
        self.custom_formatter = true;
        self.invalidate_layout();
    }

    pub fn clear_number_formatter(&mut self) {
        self.formatter = resolve_formatter(self.props.numbers_format.as_deref());
        self.custom_formatter = false;
        self.invalidate_layout();
    }

    pub fn set_text_measurer(&mut self, measurer: Arc<dyn TextMeasurer>) {
        self.measurer = measurer;
        self.invalidate_layout();
    }

    pub fn set_bar_shape(&mut self, shape: Option<Box<dyn BarShape>>) {
        self.custom_bar_shape = shape;
    }

    pub(super) fn invalidate_layout(&mut self) {
        self.layout_version = self.layout_version.wrapping_add(1);
        self.layout_cache.invalidate();
    }
}

fn notification_message(props: &WaterfallChartProps) -> String {
    props
        .notification_message
        .clone()
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_NOTIFICATION_MESSAGE.to_owned())
}

/// Parses the host specifier; an invalid one falls back to the smart format.
pub(super) fn resolve_formatter(specifier: Option<&str>) -> SharedNumberFormatter {
    let format = match specifier.map(NumberFormat::parse) {
        None => NumberFormat::Smart,
        Some(Ok(format)) => format,
        Some(Err(err)) => {
            warn!(error = %err, "invalid numbers_format, falling back to SMART_NUMBER");
            NumberFormat::Smart
        }
    };
    Arc::new(format)
}
