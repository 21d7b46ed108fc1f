use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;
use waterfall_chart::api::{NumberFormat, NumberFormatter, WaterfallChart, WaterfallChartProps};
use waterfall_chart::core::{
    BandScale, LinearScale, RawDataPoint, WaterfallDomainOptions, compute_waterfall_domain,
    project_waterfall_bars,
};
use waterfall_chart::render::NullRenderer;

fn generated_rows(count: usize) -> Vec<RawDataPoint> {
    (0..count)
        .map(|i| {
            let value = if i % 3 == 0 { -(i as f64) * 0.75 } else { i as f64 * 1.25 };
            RawDataPoint::new()
                .with_field("cat", format!("C{i}"))
                .with_field("val", json!(value))
                .with_field("isTotal", i > 0 && i % 250 == 0)
        })
        .collect()
}

fn bench_compute_domain_10k(c: &mut Criterion) {
    let rows = generated_rows(10_000);
    let options = WaterfallDomainOptions::new("cat", "val");

    c.bench_function("compute_waterfall_domain_10k", |b| {
        b.iter(|| {
            let _ = compute_waterfall_domain(black_box(&rows), black_box(&options));
        })
    });
}

fn bench_bar_projection_10k(c: &mut Criterion) {
    let rows = generated_rows(10_000);
    let computed = compute_waterfall_domain(&rows, &WaterfallDomainOptions::new("cat", "val"));
    let band = BandScale::new(0.0, 1920.0, computed.data_with_domain.len())
        .expect("valid band scale")
        .with_padding(0.1, 0.05)
        .expect("valid padding");
    let value_scale = LinearScale::from_domain(computed.axis_domain(0.05))
        .expect("valid value scale")
        .with_range(1080.0, 0.0)
        .expect("valid range");

    c.bench_function("waterfall_bar_projection_10k", |b| {
        b.iter(|| {
            let _ = project_waterfall_bars(
                black_box(&computed.data_with_domain),
                black_box(band),
                black_box(value_scale),
                black_box(1.0),
            )
            .expect("projection should succeed");
        })
    });
}

fn bench_number_format(c: &mut Criterion) {
    let smart = NumberFormat::Smart;
    let currency = NumberFormat::parse("$,.2f").expect("valid specifier");

    c.bench_function("number_format_smart_and_currency", |b| {
        b.iter(|| {
            let _ = smart.format(black_box(-1_234_567.891));
            let _ = currency.format(black_box(-1_234_567.891));
        })
    });
}

fn bench_frame_build_200(c: &mut Criterion) {
    let props = WaterfallChartProps::new("cat", "val", 1920, 1080).with_data(generated_rows(200));
    let mut chart = WaterfallChart::new(NullRenderer::default(), props).expect("chart init");

    c.bench_function("waterfall_frame_build_200", |b| {
        b.iter(|| {
            let _ = chart.build_layered_frame().expect("frame");
        })
    });
}

criterion_group!(
    benches,
    bench_compute_domain_10k,
    bench_bar_projection_10k,
    bench_number_format,
    bench_frame_build_200
);
criterion_main!(benches);
