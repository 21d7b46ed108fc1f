use std::sync::Arc;

use serde_json::json;
use waterfall_chart::ChartResult;
use waterfall_chart::api::{TextMeasurer, WaterfallChart, WaterfallChartProps, WaterfallStyle};
use waterfall_chart::core::{BarClassification, RawDataPoint, WaterfallBarGeometry};
use waterfall_chart::interaction::ClickOutcome;
use waterfall_chart::render::{BarShape, CanvasLayerKind, Color, NullRenderer, RectPrimitive};

fn sample_props() -> WaterfallChartProps {
    WaterfallChartProps::new("cat", "val", 800, 400).with_data(vec![
        RawDataPoint::new().with_field("cat", "A").with_field("val", json!(100)),
        RawDataPoint::new().with_field("cat", "B").with_field("val", json!(-30)),
        RawDataPoint::new()
            .with_field("cat", "Total")
            .with_field("val", json!(70))
            .with_field("isTotal", true),
    ])
}

fn chart(props: WaterfallChartProps) -> WaterfallChart<NullRenderer> {
    WaterfallChart::new(NullRenderer::default(), props).expect("chart init")
}

struct MonospaceMeasurer;

impl TextMeasurer for MonospaceMeasurer {
    fn text_width_px(&self, text: &str, font_size_px: f64) -> f64 {
        text.chars().count() as f64 * font_size_px
    }
}

#[test]
fn custom_formatter_reaches_labels_ticks_and_tooltips() -> ChartResult<()> {
    let mut chart = chart(sample_props().with_numbers_format(",.2f"));
    chart.set_number_formatter(Arc::new(|value: f64| format!("{value:.0} EUR")));

    let labels: Vec<String> = chart.bar_labels()?.into_iter().map(|l| l.text).collect();
    assert_eq!(labels, vec!["100 EUR", "-30 EUR", "70 EUR"]);
    assert!(chart.value_ticks()?.iter().all(|tick| tick.label.ends_with(" EUR")));
    let tooltip = chart.tooltip(1).expect("tooltip");
    assert_eq!(tooltip.lines(), vec!["B", "Decrease: -30 EUR", "Cumulative: 70 EUR"]);

    // Prop updates keep the host formatter until it is cleared.
    let props = chart.props().clone().with_numbers_format(".1f");
    chart.set_props(props)?;
    assert_eq!(chart.bar_labels()?[0].text, "100 EUR");

    chart.clear_number_formatter();
    assert_eq!(chart.bar_labels()?[0].text, "100.0");
    Ok(())
}

#[test]
fn blank_formatter_output_leaves_bars_unlabelled() -> ChartResult<()> {
    let mut chart = chart(sample_props());
    chart.set_number_formatter(Arc::new(|value: f64| {
        if value < 0.0 {
            String::new()
        } else {
            format!("{value:.0}")
        }
    }));

    let labels = chart.bar_labels()?;
    let indices: Vec<usize> = labels.iter().map(|label| label.index).collect();
    assert_eq!(indices, vec![0, 2]);

    chart.set_number_formatter(Arc::new(|_: f64| String::new()));
    assert!(chart.bar_labels()?.is_empty());
    let frame = chart.build_layered_frame()?;
    assert!(frame.layer(CanvasLayerKind::Labels).is_none_or(|layer| layer.texts.is_empty()));
    let axis = frame.layer(CanvasLayerKind::Axis).expect("axis");
    assert!(!axis.lines.is_empty());
    assert!(axis.texts.iter().all(|text| !text.text.is_empty()));
    chart.render()?;
    Ok(())
}

#[test]
fn text_measurer_drives_measured_margins() -> ChartResult<()> {
    let mut chart = chart(sample_props());
    let heuristic = chart.layout()?;
    let version = chart.layout_version();

    chart.set_text_measurer(Arc::new(MonospaceMeasurer));
    assert_eq!(chart.layout_version(), version + 1);
    let monospace = chart.layout()?;

    assert!(monospace.margins.left > heuristic.margins.left);
    assert!(monospace.plot.width < heuristic.plot.width);
    assert_eq!(chart.layout_measure_count(), 2);
    Ok(())
}

#[test]
fn custom_bar_shape_replaces_style_fills() -> ChartResult<()> {
    struct Flat;

    impl BarShape for Flat {
        fn draw(
            &self,
            bar: &WaterfallBarGeometry,
            _classification: BarClassification,
            _index: usize,
            _total_count: usize,
        ) -> RectPrimitive {
            RectPrimitive::new(
                bar.x_left,
                bar.y_top,
                bar.width(),
                bar.height(),
                Color::rgb(0.1, 0.2, 0.3),
            )
        }
    }

    let mut chart = chart(sample_props());
    chart.set_bar_shape(Some(Box::new(Flat)));
    let frame = chart.build_layered_frame()?;
    let bars = &frame.layer(CanvasLayerKind::Bars).expect("bars").rects;
    assert_eq!(bars.len(), 3);
    assert!(bars.iter().all(|rect| rect.fill_color == Color::rgb(0.1, 0.2, 0.3)));

    chart.set_bar_shape(None);
    let frame = chart.build_layered_frame()?;
    let bars = &frame.layer(CanvasLayerKind::Bars).expect("bars").rects;
    assert_eq!(bars[0].fill_color, chart.style().bar_shape.increase_color);
    Ok(())
}

#[test]
fn legend_swatches_follow_custom_bar_shape() -> ChartResult<()> {
    struct Tinted;

    impl BarShape for Tinted {
        fn draw(
            &self,
            bar: &WaterfallBarGeometry,
            classification: BarClassification,
            _index: usize,
            _total_count: usize,
        ) -> RectPrimitive {
            let fill = self.legend_color(classification).unwrap_or(Color::rgb(0.0, 0.0, 0.0));
            RectPrimitive::new(bar.x_left, bar.y_top, bar.width(), bar.height(), fill)
        }

        fn legend_color(&self, classification: BarClassification) -> Option<Color> {
            match classification {
                BarClassification::Total => None,
                _ => Some(Color::rgb(0.1, 0.2, 0.3)),
            }
        }
    }

    let mut chart = chart(sample_props());
    chart.set_bar_shape(Some(Box::new(Tinted)));
    let colors: Vec<Color> = chart.legend_entries().iter().map(|entry| entry.color).collect();
    assert_eq!(
        colors,
        vec![
            Color::rgb(0.1, 0.2, 0.3),
            Color::rgb(0.1, 0.2, 0.3),
            chart.style().bar_shape.total_color,
        ]
    );

    let frame = chart.build_layered_frame()?;
    let legend = &frame.layer(CanvasLayerKind::Legend).expect("legend").rects;
    assert!(legend.iter().any(|rect| rect.fill_color == Color::rgb(0.1, 0.2, 0.3)));

    chart.set_bar_shape(None);
    assert_eq!(chart.legend_entries()[0].color, chart.style().bar_shape.increase_color);
    Ok(())
}

#[test]
fn style_colors_flow_to_bars_and_legend() -> ChartResult<()> {
    let mut style = WaterfallStyle::default();
    style.bar_shape.increase_color = Color::rgb8(0x00, 0x80, 0xFF);
    let mut chart = chart(sample_props()).with_style(style);

    let frame = chart.build_layered_frame()?;
    let bars = &frame.layer(CanvasLayerKind::Bars).expect("bars").rects;
    assert_eq!(bars[0].fill_color, Color::rgb8(0x00, 0x80, 0xFF));
    assert_eq!(chart.legend_entries()[0].color, Color::rgb8(0x00, 0x80, 0xFF));

    let version = chart.layout_version();
    chart.set_style(WaterfallStyle::default());
    assert_eq!(chart.layout_version(), version + 1);
    Ok(())
}

#[test]
fn hover_and_notification_can_be_cleared_by_host() -> ChartResult<()> {
    let mut chart = chart(sample_props().with_interactive(true));
    let bar = chart.bar_geometries()?[0];
    chart.hover_at(bar.x_center(), bar.y_top + 1.0)?;
    assert_eq!(chart.hovered_index(), Some(0));
    chart.clear_hover();
    assert_eq!(chart.hovered_index(), None);

    chart.click_bar(0);
    assert_eq!(chart.dismiss_notification(), ClickOutcome::NotificationDismissed);
    assert_eq!(chart.dismiss_notification(), ClickOutcome::Ignored);

    chart.render()?;
    chart.renderer_mut().render_count = 0;
    chart.render()?;
    assert_eq!(chart.renderer().render_count, 1);
    Ok(())
}
