use insta::assert_json_snapshot;
use multi_panel_chart::application::data_processor::{RawChartResponse, process_chart_data};
use multi_panel_chart::domain::chart::layout::create_initial_panels;
use multi_panel_chart::domain::errors::ChartError;
use multi_panel_chart::domain::market_data::{IndicatorKind, SeriesStyle, Timestamp};

const RESPONSE: &str = r#"{
    "rows": [
        { "timestamp": 120000, "open": 101.0, "high": 103.0, "low": 100.5, "close": 102.0, "volume": 12.0,
          "sma": 101.2, "rsi": 61.0, "macd": 0.4, "macd_signal": 0.3 },
        { "timestamp": 60000, "open": 100.0, "high": 102.0, "low": 99.0, "close": 101.0, "volume": 10.0,
          "sma": null, "rsi": 55.0, "macd": null, "macd_signal": 0.1 }
    ],
    "indicators": [
        { "id": "sma", "name": "SMA 20", "kind": "overlay" },
        { "id": "rsi", "name": "RSI", "kind": "subplot", "parameters": { "period": 14 } },
        { "id": "macd", "name": "MACD", "kind": "subplot", "columns": ["macd", "macd_signal"], "style": "histogram" },
        { "id": "vwap", "name": "VWAP", "kind": "overlay" }
    ]
}"#;

fn processed() -> multi_panel_chart::domain::market_data::ProcessedChartData {
    let raw = RawChartResponse::from_json(RESPONSE).unwrap();
    process_chart_data(&raw).unwrap()
}

#[test]
fn rows_are_sorted_into_candles() {
    let data = processed();
    let times: Vec<u64> = data.candles.iter().map(|c| c.timestamp.value()).collect();
    assert_eq!(times, vec![60_000, 120_000]);
    assert_eq!(data.candles[0].ohlcv.close.value(), 101.0);
    assert!(data.candles[1].is_bullish());
}

#[test]
fn indicators_without_data_are_dropped() {
    let data = processed();
    let ids: Vec<&str> = data.indicators.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["sma", "rsi", "macd"]);
}

#[test]
fn null_values_are_skipped() {
    let data = processed();
    let sma = data.indicator("sma").unwrap();
    assert_eq!(sma.kind, IndicatorKind::Overlay);
    assert_eq!(sma.series[0].points.len(), 1);
    assert_eq!(sma.series[0].value_at(Timestamp::from_millis(120_000)), Some(101.2));
    assert_eq!(sma.series[0].value_at(Timestamp::from_millis(60_000)), None);
}

#[test]
fn multi_column_indicator_keeps_one_series_per_column() {
    let data = processed();
    let macd = data.indicator("macd").unwrap();
    assert_eq!(macd.style, SeriesStyle::Histogram);
    let columns: Vec<&str> = macd.series.iter().map(|s| s.column.as_str()).collect();
    assert_eq!(columns, vec!["macd", "macd_signal"]);
    assert_eq!(macd.series[1].points.len(), 2);
}

#[test]
fn parameters_pass_through() {
    let data = processed();
    assert_eq!(data.indicator("rsi").unwrap().parameters["period"], 14);
}

#[test]
fn row_without_timestamp_is_rejected() {
    let raw = RawChartResponse::from_json(
        r#"{ "rows": [{ "open": 1.0, "high": 1.0, "low": 1.0, "close": 1.0 }] }"#,
    )
    .unwrap();
    let err = process_chart_data(&raw).unwrap_err();
    assert_eq!(err, ChartError::Validation("row 0 has no timestamp".to_string()));
}

#[test]
fn text_columns_are_ignored() {
    let raw = RawChartResponse::from_json(
        r#"{
            "rows": [
                { "timestamp": 60000, "date": "2024-01-01", "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5,
                  "rsi": 40.0, "note": "halted" },
                { "timestamp": 120000, "date": "2024-01-02", "open": 1.5, "high": 2.5, "low": 1.0, "close": 2.0,
                  "rsi": "n/a" }
            ],
            "indicators": [{ "id": "rsi", "name": "RSI", "kind": "subplot" }]
        }"#,
    )
    .unwrap();
    let data = process_chart_data(&raw).unwrap();

    assert_eq!(data.candles.len(), 2);
    let rsi = &data.indicator("rsi").unwrap().series[0];
    assert_eq!(rsi.points.len(), 1);
    assert_eq!(rsi.value_at(Timestamp::from_millis(60_000)), Some(40.0));
}

#[test]
fn repeated_timestamps_keep_the_latest_row() {
    let raw = RawChartResponse::from_json(
        r#"{
            "rows": [
                { "timestamp": 1000, "open": 1.0, "high": 1.0, "low": 1.0, "close": 1.0, "rsi": 10.0 },
                { "timestamp": 2000, "open": 5.0, "high": 5.0, "low": 5.0, "close": 5.0, "rsi": 50.0 },
                { "timestamp": 1000, "open": 2.0, "high": 2.0, "low": 2.0, "close": 2.0, "rsi": 20.0 }
            ],
            "indicators": [{ "id": "rsi", "name": "RSI", "kind": "subplot" }]
        }"#,
    )
    .unwrap();
    let data = process_chart_data(&raw).unwrap();

    let closes: Vec<(u64, f64)> = data.candles.iter().map(|c| (c.timestamp.value(), c.ohlcv.close.value())).collect();
    assert_eq!(closes, vec![(1000, 2.0), (2000, 5.0)]);
    let rsi = &data.indicator("rsi").unwrap().series[0];
    assert_eq!(rsi.points.len(), 2);
    assert_eq!(rsi.value_at(Timestamp::from_millis(1000)), Some(20.0));
}

#[test]
fn empty_response_is_valid_and_empty() {
    let data = process_chart_data(&RawChartResponse::default()).unwrap();
    assert!(data.is_empty());
    assert!(data.time_range().is_none());
}

#[test]
fn malformed_json_is_a_serialization_error() {
    let err = RawChartResponse::from_json("{ rows: ").unwrap_err();
    assert!(matches!(err, ChartError::Serialization(_)));
}

#[test]
fn duplicate_indicator_ids_keep_the_first() {
    let raw = RawChartResponse::from_json(
        r#"{
            "rows": [{ "timestamp": 1, "open": 1.0, "high": 1.0, "low": 1.0, "close": 1.0, "rsi": 50.0 }],
            "indicators": [
                { "id": "rsi", "name": "RSI 14", "kind": "subplot" },
                { "id": "rsi", "name": "RSI 7", "kind": "subplot" }
            ]
        }"#,
    )
    .unwrap();
    let data = process_chart_data(&raw).unwrap();
    assert_eq!(data.indicators.len(), 1);
    assert_eq!(data.indicators[0].name, "RSI 14");
}

#[test]
fn processed_data_drives_initial_layout() {
    let panels = create_initial_panels(&processed());
    assert_json_snapshot!(panels, @r###"
    [
      {
        "id": "main",
        "title": "Price",
        "kind": "main",
        "heightPercent": 70.0,
        "minHeight": 200.0,
        "indicatorIds": [
          "sma"
        ],
        "visible": true,
        "order": 0
      },
      {
        "id": "indicator-rsi",
        "title": "RSI",
        "kind": "indicator",
        "heightPercent": 15.0,
        "minHeight": 80.0,
        "indicatorIds": [
          "rsi"
        ],
        "visible": true,
        "order": 1
      },
      {
        "id": "indicator-macd",
        "title": "MACD",
        "kind": "indicator",
        "heightPercent": 15.0,
        "minHeight": 80.0,
        "indicatorIds": [
          "macd"
        ],
        "visible": true,
        "order": 2
      }
    ]
    "###);
}
