use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use multi_panel_chart::application::data_processor::{RawChartResponse, RawRow, process_chart_data};
use multi_panel_chart::domain::chart::layout::{
    calculate_panel_pixel_heights, create_initial_panels, resize_panel, toggle_panel_visibility,
};
use multi_panel_chart::domain::market_data::{IndicatorDefinition, IndicatorKind};
use serde_json::Value;
use std::collections::BTreeMap;
use std::hint::black_box;
use std::time::Duration;

/// Synthetic response: `rows` one-minute bars with an overlay and `subplots` sub-panel indicators
fn generate_response(rows: usize, subplots: usize) -> RawChartResponse {
    let mut indicators = vec![IndicatorDefinition::new("sma", "SMA", IndicatorKind::Overlay)];
    for i in 0..subplots {
        indicators.push(IndicatorDefinition::new(&format!("osc{i}"), "Oscillator", IndicatorKind::Subplot));
    }

    let mut rows: Vec<RawRow> = (0..rows)
        .map(|i| {
            let open = 100.0 + (i as f64 * 0.01).sin() * 10.0;
            let close = open + (i as f64 * 0.3).cos();
            let mut values = BTreeMap::new();
            values.insert("sma".to_string(), Value::from(open));
            for s in 0..subplots {
                let value = (i % 7 != 0).then_some((i as f64 * 0.05 + s as f64).sin() * 50.0);
                values.insert(format!("osc{s}"), value.map_or(Value::Null, Value::from));
            }
            RawRow {
                timestamp: Some((i as u64 + 1) * 60_000),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1_000.0,
                values,
            }
        })
        .collect();
    // newest first, so processing has to sort
    rows.reverse();
    RawChartResponse { rows, indicators }
}

fn bench_process_chart_data(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_chart_data");
    group.measurement_time(Duration::from_secs(5));

    for rows in [500, 5_000, 20_000] {
        let raw = generate_response(rows, 3);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &raw, |b, raw| {
            b.iter(|| process_chart_data(black_box(raw)))
        });
    }
    group.finish();
}

fn bench_layout_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_operations");

    for subplots in [2, 8, 32] {
        let data = match process_chart_data(&generate_response(50, subplots)) {
            Ok(data) => data,
            Err(err) => panic!("benchmark data is invalid: {err}"),
        };
        let panels = create_initial_panels(&data);
        let first = panels[1].id.clone();

        group.bench_with_input(BenchmarkId::new("create_initial_panels", subplots), &data, |b, data| {
            b.iter(|| create_initial_panels(black_box(data)))
        });
        group.bench_with_input(BenchmarkId::new("resize_panel", subplots), &panels, |b, panels| {
            b.iter(|| resize_panel(black_box(panels), "main", 50.0, None))
        });
        group.bench_with_input(BenchmarkId::new("toggle_panel", subplots), &panels, |b, panels| {
            b.iter(|| toggle_panel_visibility(black_box(panels), &first))
        });
        group.bench_with_input(BenchmarkId::new("pixel_heights", subplots), &panels, |b, panels| {
            b.iter(|| calculate_panel_pixel_heights(black_box(panels), 900.0))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_process_chart_data, bench_layout_operations);
criterion_main!(benches);
