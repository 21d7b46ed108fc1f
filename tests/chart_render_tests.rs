use serde_json::json;
use waterfall_chart::api::{
    HeuristicTextMeasurer, LayoutPass, LegendPosition, TextMeasurer, WaterfallChart,
    WaterfallChartProps,
};
use waterfall_chart::core::RawDataPoint;
use waterfall_chart::render::{CanvasLayerKind, LayeredRenderFrame, NullRenderer};
use waterfall_chart::{ChartError, ChartResult};

fn row(category: &str, value: f64) -> RawDataPoint {
    RawDataPoint::new()
        .with_field("cat", category)
        .with_field("val", json!(value))
}

fn sample_data() -> Vec<RawDataPoint> {
    vec![
        row("A", 100.0),
        row("B", -30.0),
        row("Total", 70.0).with_field("isTotal", true),
    ]
}

fn sample_props() -> WaterfallChartProps {
    WaterfallChartProps::new("cat", "val", 800, 400).with_data(sample_data())
}

fn chart(props: WaterfallChartProps) -> WaterfallChart<NullRenderer> {
    WaterfallChart::new(NullRenderer::default(), props).expect("chart init")
}

fn layer_texts(frame: &LayeredRenderFrame, kind: CanvasLayerKind) -> Vec<String> {
    frame
        .layer(kind)
        .expect("layer")
        .texts
        .iter()
        .map(|text| text.text.clone())
        .collect()
}

#[test]
fn render_validates_and_counts_primitives() -> ChartResult<()> {
    let mut chart = chart(sample_props());
    chart.render()?;
    chart.render()?;

    let renderer = chart.into_renderer();
    assert_eq!(renderer.render_count, 2);
    // background + 3 bars + 3 legend swatches
    assert!(renderer.last_rect_count >= 7);
    assert!(renderer.last_text_count >= 6);
    Ok(())
}

#[test]
fn frame_has_one_bar_and_one_delta_label_per_category() -> ChartResult<()> {
    let mut chart = chart(sample_props());
    let frame = chart.build_layered_frame()?;

    let bars = frame.layer(CanvasLayerKind::Bars).expect("bars layer");
    assert_eq!(bars.rects.len(), 3);
    assert_eq!(layer_texts(&frame, CanvasLayerKind::Labels), vec!["100", "-30", "70"]);
    frame.flatten().validate()?;
    Ok(())
}

#[test]
fn labels_use_configured_number_format() -> ChartResult<()> {
    let mut chart = chart(sample_props().with_numbers_format(",.1f"));
    let labels: Vec<String> = chart.bar_labels()?.into_iter().map(|label| label.text).collect();
    assert_eq!(labels, vec!["100.0", "-30.0", "70.0"]);

    let tooltip = chart.tooltip(1).expect("tooltip");
    assert_eq!(tooltip.title, "B");
    assert_eq!(tooltip.rows[0].value, "-30.0");
    assert_eq!(tooltip.rows[1].value, "70.0");
    Ok(())
}

#[test]
fn invalid_number_format_falls_back_to_smart_number() -> ChartResult<()> {
    let mut chart = chart(sample_props().with_numbers_format("not-a-format"));
    let labels: Vec<String> = chart.bar_labels()?.into_iter().map(|label| label.text).collect();
    assert_eq!(labels, vec!["100", "-30", "70"]);
    Ok(())
}

#[test]
fn bar_labels_stay_inside_plot() -> ChartResult<()> {
    let mut chart = chart(sample_props().with_domain_padding_ratio(0.0));
    let layout = chart.layout()?;
    let bars = chart.bar_geometries()?;
    let labels = chart.bar_labels()?;

    for (label, bar) in labels.iter().zip(&bars) {
        assert!(label.y >= layout.plot.y);
        assert!((label.x - bar.x_center()).abs() <= 1e-9);
    }
    // The tallest bar touches the plot top, so its label is pushed inside.
    assert!(labels[0].nudged);
    Ok(())
}

#[test]
fn error_prop_renders_banner_only() -> ChartResult<()> {
    let mut chart = chart(sample_props().with_error("Query failed"));
    let frame = chart.build_layered_frame()?;

    for kind in [
        CanvasLayerKind::Grid,
        CanvasLayerKind::Bars,
        CanvasLayerKind::Labels,
        CanvasLayerKind::Axis,
        CanvasLayerKind::Legend,
    ] {
        assert!(frame.layer(kind).expect("layer").is_empty(), "{kind:?} not empty");
    }
    assert_eq!(layer_texts(&frame, CanvasLayerKind::Overlay), vec!["Query failed"]);

    chart.render()?;
    assert_eq!(chart.renderer().render_count, 1);
    Ok(())
}

#[test]
fn blank_error_is_ignored() -> ChartResult<()> {
    let mut chart = chart(sample_props().with_error("   "));
    let frame = chart.build_layered_frame()?;
    assert_eq!(frame.layer(CanvasLayerKind::Bars).expect("bars").rects.len(), 3);
    Ok(())
}

#[test]
fn clearing_error_restores_chart() -> ChartResult<()> {
    let mut chart = chart(sample_props().with_error("boom"));
    chart.set_error(None);
    let frame = chart.build_layered_frame()?;
    assert_eq!(frame.layer(CanvasLayerKind::Bars).expect("bars").rects.len(), 3);
    Ok(())
}

#[test]
fn empty_data_renders_axes_without_bars() -> ChartResult<()> {
    let mut chart = chart(WaterfallChartProps::new("cat", "val", 400, 300));
    let frame = chart.build_layered_frame()?;

    assert!(frame.layer(CanvasLayerKind::Bars).expect("bars").is_empty());
    assert!(frame.layer(CanvasLayerKind::Labels).expect("labels").is_empty());
    assert!(!frame.layer(CanvasLayerKind::Axis).expect("axis").is_empty());
    chart.render()?;
    Ok(())
}

#[test]
fn grid_lines_follow_value_ticks_and_flag() -> ChartResult<()> {
    let mut with_grid = chart(sample_props());
    let ticks = with_grid.value_ticks()?;
    let frame = with_grid.build_layered_frame()?;
    assert_eq!(frame.layer(CanvasLayerKind::Grid).expect("grid").lines.len(), ticks.len());
    assert!(ticks.iter().any(|tick| tick.label == "100"));

    let mut without_grid = chart(sample_props().with_horizontal_grid_lines(false));
    let frame = without_grid.build_layered_frame()?;
    assert!(frame.layer(CanvasLayerKind::Grid).expect("grid").is_empty());
    Ok(())
}

#[test]
fn legend_has_three_fixed_entries() -> ChartResult<()> {
    let mut chart = chart(WaterfallChartProps::new("cat", "val", 600, 300));
    let labels: Vec<&str> = chart.legend_entries().iter().map(|entry| entry.label).collect();
    assert_eq!(labels, vec!["Increase", "Decrease", "Total"]);

    let frame = chart.build_layered_frame()?;
    let legend = frame.layer(CanvasLayerKind::Legend).expect("legend");
    assert_eq!(legend.rects.len(), 3);
    assert_eq!(layer_texts(&frame, CanvasLayerKind::Legend), labels);
    Ok(())
}

#[test]
fn legend_position_moves_plot_margins() -> ChartResult<()> {
    let mut top = chart(sample_props().with_legend_position(LegendPosition::Top));
    let mut right = chart(sample_props().with_legend_position(LegendPosition::Right));
    let mut hidden = chart(sample_props().with_legend_position(LegendPosition::Hidden));

    let top_layout = top.layout()?;
    let right_layout = right.layout()?;
    let hidden_layout = hidden.layout()?;

    assert!(top_layout.margins.top > hidden_layout.margins.top);
    assert!(right_layout.margins.right > hidden_layout.margins.right);
    assert!(hidden_layout.legend.is_none());
    let legend = right_layout.legend.expect("right legend");
    assert!(legend.x >= right_layout.plot.right());

    let frame = hidden.build_layered_frame()?;
    assert!(frame.layer(CanvasLayerKind::Legend).expect("legend").is_empty());
    Ok(())
}

#[test]
fn axis_titles_are_drawn_when_set() -> ChartResult<()> {
    let mut chart = chart(sample_props().with_axis_labels("Quarter", "Revenue"));
    let frame = chart.build_layered_frame()?;
    let axis = frame.layer(CanvasLayerKind::Axis).expect("axis");

    let y_title = axis
        .texts
        .iter()
        .find(|text| text.text == "Revenue")
        .expect("y title");
    assert_eq!(y_title.rotation_deg, -90.0);
    assert!(axis.texts.iter().any(|text| text.text == "Quarter"));
    Ok(())
}

#[test]
fn rotated_ticks_are_truncated_to_max_width() -> ChartResult<()> {
    let long = "Operating expenses and other adjustments";
    let props = WaterfallChartProps::new("cat", "val", 800, 400)
        .with_data(vec![row("Q1", 10.0), row(long, -4.0)])
        .with_max_tick_label_width_px(60.0);
    let mut chart = chart(props);

    let ticks = chart.tick_labels()?;
    assert_eq!(ticks.len(), 2);
    assert_eq!(ticks[0].text, "Q1");
    assert!(!ticks[0].truncated);
    assert!(ticks[1].truncated);
    assert!(ticks[1].text.ends_with('…'));
    assert_eq!(ticks[1].full_text, long);
    assert_eq!(ticks[1].rotation_deg, -45.0);

    let measurer = HeuristicTextMeasurer;
    let font_size = chart.style().tick_font_size_px;
    assert!(measurer.text_width_px(&ticks[1].text, font_size) <= 60.0);
    Ok(())
}

#[test]
fn unrotated_ticks_fit_their_slot() -> ChartResult<()> {
    let data: Vec<RawDataPoint> = (0..12)
        .map(|i| row(&format!("Category number {i}"), 1.0))
        .collect();
    let props = WaterfallChartProps::new("cat", "val", 480, 300)
        .with_data(data)
        .with_tick_label_angle(0.0);
    let mut chart = chart(props);

    let layout = chart.layout()?;
    let slot_width = chart.bar_geometries()?[0].width();
    assert!(slot_width < layout.plot.width / 12.0);

    let measurer = HeuristicTextMeasurer;
    let font_size = chart.style().tick_font_size_px;
    for tick in chart.tick_labels()? {
        assert_eq!(tick.rotation_deg, 0.0);
        assert!(tick.truncated);
        assert!(measurer.text_width_px(&tick.text, font_size) <= slot_width);
    }
    Ok(())
}

#[test]
fn temporal_categories_use_time_format() -> ChartResult<()> {
    let data = vec![
        RawDataPoint::new()
            .with_field("ts", json!(1_704_067_200_000_i64))
            .with_field("val", json!(5)),
        RawDataPoint::new()
            .with_field("ts", json!(1_706_745_600_000_i64))
            .with_field("val", json!(-2)),
    ];
    let props = WaterfallChartProps::new("ts", "val", 600, 300)
        .with_data(data)
        .with_x_axis_time_format("%Y-%m");
    let chart = chart(props);
    assert_eq!(chart.category_labels(), vec!["2024-01", "2024-02"]);
    Ok(())
}

#[test]
fn layout_is_measured_once_per_version() -> ChartResult<()> {
    let mut chart = chart(sample_props());
    assert_eq!(chart.layout_version(), 0);

    let first = chart.layout()?;
    let again = chart.layout()?;
    assert_eq!(first, again);
    assert_eq!(first.pass, LayoutPass::Measured);
    assert_eq!(chart.layout_measure_count(), 1);

    chart.set_props(sample_props().with_axis_labels("x", "y"))?;
    assert_eq!(chart.layout_version(), 1);
    let second = chart.layout()?;
    assert_eq!(second.version, 1);
    assert_eq!(chart.layout_measure_count(), 2);
    Ok(())
}

#[test]
fn measured_margins_follow_new_data() -> ChartResult<()> {
    let mut chart = chart(
        WaterfallChartProps::new("cat", "val", 800, 400).with_data(vec![row("A", 1.0)]),
    );
    let narrow = chart.layout()?;

    chart.set_data(vec![row("A", 123_456_789.0), row("B", -23_456_789.0)])?;
    let wide = chart.layout()?;
    assert!(wide.margins.left > narrow.margins.left);

    chart.set_data(vec![row("A", 1.0)])?;
    let narrow_again = chart.layout()?;
    assert_eq!(narrow_again.margins, narrow.margins);
    Ok(())
}

#[test]
fn invalid_props_are_rejected() {
    let zero_width = WaterfallChart::new(
        NullRenderer::default(),
        WaterfallChartProps::new("cat", "val", 0, 300),
    );
    assert!(matches!(zero_width, Err(ChartError::InvalidViewport { width: 0, .. })));

    let negative_padding = WaterfallChart::new(
        NullRenderer::default(),
        sample_props().with_domain_padding_ratio(-0.1),
    );
    assert!(matches!(
        negative_padding,
        Err(ChartError::InvalidProps {
            field: "domain_padding_ratio",
            ..
        })
    ));

    let mut chart = chart(sample_props());
    let result = chart.set_props(WaterfallChartProps::new("", "val", 100, 100));
    assert!(result.is_err());
    assert_eq!(chart.props().x_axis_data_key, "cat");
    assert_eq!(chart.layout_version(), 0);
}

#[test]
fn axis_domain_is_padded_away_from_zero() {
    let chart = chart(sample_props());
    assert_eq!(chart.domain().min, 0.0);
    assert_eq!(chart.domain().max, 100.0);
    assert_eq!(chart.axis_domain().min, 0.0);
    assert!((chart.axis_domain().max - 105.0).abs() <= 1e-9);
}

#[test]
fn overflowing_totals_still_render() -> ChartResult<()> {
    let props = WaterfallChartProps::new("cat", "val", 800, 400)
        .with_data(vec![row("A", 1e308), row("B", 1e308)]);
    let mut chart = chart(props);

    assert_eq!(chart.domain().max, f64::MAX);
    assert_eq!(chart.axis_domain().max, f64::MAX);
    let labels: Vec<String> = chart.bar_labels()?.into_iter().map(|label| label.text).collect();
    assert_eq!(labels, vec!["1e+308", "7.98e+307"]);
    let ticks = chart.value_ticks()?;
    assert!(ticks.len() >= 2);
    assert!(ticks.iter().all(|tick| tick.value.is_finite() && tick.label.len() < 12));

    let frame = chart.build_layered_frame()?;
    let bars = &frame.layer(CanvasLayerKind::Bars).expect("bars").rects;
    assert!(bars.iter().all(|rect| rect.height.is_finite() && rect.height >= 0.0));
    chart.render()?;
    Ok(())
}
