use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::application::data_processor::RawChartResponse;
use crate::domain::chart::ChartTheme;
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::market_data::{AssetCategory, TimeInterval};
use crate::time_utils::parse_iso_date;

/// Smallest total chart height the bottom drag handle allows
pub const MIN_CHART_HEIGHT_PX: f64 = 320.0;
pub const DEFAULT_CHART_HEIGHT_PX: f64 = 600.0;

fn default_height() -> f64 {
    DEFAULT_CHART_HEIGHT_PX
}

fn default_show_toolbar() -> bool {
    true
}

/// Configuration handed to the chart by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(default)]
    pub asset_category: AssetCategory,
    pub instrument: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    pub interval: TimeInterval,
    #[serde(default)]
    pub indicators: Vec<String>,
    #[serde(default)]
    pub indicator_params: BTreeMap<String, Value>,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub theme: ChartTheme,
    #[serde(default = "default_show_toolbar")]
    pub show_toolbar: bool,
}

impl ChartConfig {
    pub fn new(asset_category: AssetCategory, instrument: &str, interval: TimeInterval) -> Self {
        Self {
            asset_category,
            instrument: instrument.to_string(),
            start_date: None,
            end_date: None,
            interval,
            indicators: Vec::new(),
            indicator_params: BTreeMap::new(),
            height: DEFAULT_CHART_HEIGHT_PX,
            theme: ChartTheme::default(),
            show_toolbar: true,
        }
    }

    pub fn from_json(json: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.instrument.trim().is_empty() {
            return Err(ChartError::Config("instrument cannot be empty".to_string()));
        }
        let start = self.start_date.as_deref().map(parse_date).transpose()?;
        let end = self.end_date.as_deref().map(parse_date).transpose()?;
        if let (Some(start), Some(end)) = (start, end)
            && start > end
        {
            return Err(ChartError::Config(format!("startDate {start} is after endDate {end}")));
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(ChartError::Config(format!("invalid height {}", self.height)));
        }
        Ok(())
    }

    /// Requested height floored at [`MIN_CHART_HEIGHT_PX`]
    pub fn effective_height(&self) -> f64 {
        self.height.max(MIN_CHART_HEIGHT_PX)
    }
}

fn parse_date(value: &str) -> ChartResult<NaiveDate> {
    parse_iso_date(value).ok_or_else(|| ChartError::Config(format!("invalid date '{value}', expected YYYY-MM-DD")))
}

pub type DataLoadCallback = Box<dyn Fn(&RawChartResponse)>;
pub type ErrorCallback = Box<dyn Fn(&str)>;
pub type IndicatorsChangeCallback = Box<dyn Fn(&[String], &BTreeMap<String, Value>)>;

/// Hooks back into the owning dashboard
#[derive(Default)]
pub struct ChartCallbacks {
    pub on_data_load: Option<DataLoadCallback>,
    pub on_error: Option<ErrorCallback>,
    pub on_indicators_change: Option<IndicatorsChangeCallback>,
}

impl ChartCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_data_load<F>(mut self, callback: F) -> Self
    where
        F: Fn(&RawChartResponse) + 'static,
    {
        self.on_data_load = Some(Box::new(callback));
        self
    }

    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + 'static,
    {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn on_indicators_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&[String], &BTreeMap<String, Value>) + 'static,
    {
        self.on_indicators_change = Some(Box::new(callback));
        self
    }

    pub(crate) fn data_loaded(&self, raw: &RawChartResponse) {
        if let Some(callback) = &self.on_data_load {
            callback(raw);
        }
    }

    pub(crate) fn error(&self, message: &str) {
        if let Some(callback) = &self.on_error {
            callback(message);
        }
    }

    pub(crate) fn indicators_changed(&self, ids: &[String], params: &BTreeMap<String, Value>) {
        if let Some(callback) = &self.on_indicators_change {
            callback(ids, params);
        }
    }
}
