use multi_panel_chart::application::config::{ChartConfig, DEFAULT_CHART_HEIGHT_PX};
use multi_panel_chart::domain::chart::ChartTheme;
use multi_panel_chart::domain::errors::ChartError;
use multi_panel_chart::domain::market_data::{AssetCategory, TimeInterval};

#[test]
fn dashboard_config_uses_defaults() {
    let config = ChartConfig::from_json(r#"{ "instrument": "AAPL", "interval": "1d" }"#).unwrap();

    assert_eq!(config.asset_category, AssetCategory::Stocks);
    assert_eq!(config.interval, TimeInterval::OneDay);
    assert_eq!(config.height, DEFAULT_CHART_HEIGHT_PX);
    assert_eq!(config.theme, ChartTheme::Dark);
    assert!(config.show_toolbar);
    assert!(config.indicators.is_empty());
}

#[test]
fn full_config_round_trips_field_names() {
    let config = ChartConfig::from_json(
        r#"{
            "assetCategory": "forex",
            "instrument": "EURUSD",
            "startDate": "2024-01-01",
            "endDate": "2024-03-31",
            "interval": "4h",
            "indicators": ["rsi"],
            "indicatorParams": { "rsi": { "period": 7 } },
            "height": 480,
            "theme": "light",
            "showToolbar": false
        }"#,
    )
    .unwrap();

    assert_eq!(config.asset_category, AssetCategory::Forex);
    assert_eq!(config.interval, TimeInterval::FourHours);
    assert_eq!(config.indicator_params["rsi"]["period"], 7);
    assert_eq!(config.theme, ChartTheme::Light);
    assert!(!config.show_toolbar);
    assert_eq!(config.effective_height(), 480.0);
}

#[test]
fn height_is_floored() {
    let mut config = ChartConfig::new(AssetCategory::Crypto, "ETH-USD", TimeInterval::OneHour);
    config.height = 100.0;
    assert_eq!(config.effective_height(), 320.0);
}

#[test]
fn empty_instrument_is_rejected() {
    let err = ChartConfig::from_json(r#"{ "instrument": " ", "interval": "1m" }"#).unwrap_err();
    assert_eq!(err, ChartError::Config("instrument cannot be empty".to_string()));
}

#[test]
fn reversed_dates_are_rejected() {
    let mut config = ChartConfig::new(AssetCategory::Indices, "SPX", TimeInterval::OneDay);
    config.start_date = Some("2024-05-01".to_string());
    config.end_date = Some("2024-04-01".to_string());
    assert!(matches!(config.validate(), Err(ChartError::Config(_))));

    config.end_date = Some("2024-05-01".to_string());
    assert!(config.validate().is_ok());
}

#[test]
fn malformed_dates_are_rejected() {
    let mut config = ChartConfig::new(AssetCategory::Commodities, "XAU", TimeInterval::OneWeek);
    config.start_date = Some("2024-02-30".to_string());
    assert!(config.validate().is_err());
}

#[test]
fn unknown_interval_is_a_serialization_error() {
    let err = ChartConfig::from_json(r#"{ "instrument": "AAPL", "interval": "2d" }"#).unwrap_err();
    assert!(matches!(err, ChartError::Serialization(_)));
}
