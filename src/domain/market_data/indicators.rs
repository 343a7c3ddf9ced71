use super::entities::{Candle, candle_index_at};
use super::value_objects::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display as StrumDisplay, EnumString};

use crate::domain::chart::value_objects::TimeRange;

/// Where an indicator is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    /// On top of the price panel
    Overlay,
    /// In a dedicated panel
    Subplot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SeriesStyle {
    #[default]
    Line,
    Histogram,
    Area,
}

/// Indicator as declared by the data collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorDefinition {
    pub id: String,
    pub name: String,
    pub kind: IndicatorKind,
    /// Data columns carrying this indicator's values. Defaults to `[id]`.
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub style: SeriesStyle,
    #[serde(default)]
    pub parameters: Value,
}

impl IndicatorDefinition {
    pub fn new(id: &str, name: &str, kind: IndicatorKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            columns: Vec::new(),
            style: SeriesStyle::default(),
            parameters: Value::Null,
        }
    }

    pub fn value_columns(&self) -> Vec<String> {
        if self.columns.is_empty() {
            vec![self.id.clone()]
        } else {
            self.columns.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub time: Timestamp,
    pub value: f64,
}

/// One renderable line of an indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub column: String,
    pub points: Vec<SeriesPoint>,
}

impl IndicatorSeries {
    pub fn value_at(&self, time: Timestamp) -> Option<f64> {
        self.points
            .binary_search_by(|p| p.time.cmp(&time))
            .ok()
            .map(|idx| self.points[idx].value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedIndicator {
    pub id: String,
    pub name: String,
    pub kind: IndicatorKind,
    pub style: SeriesStyle,
    pub parameters: Value,
    pub series: Vec<IndicatorSeries>,
}

impl ProcessedIndicator {
    pub fn is_overlay(&self) -> bool {
        self.kind == IndicatorKind::Overlay
    }
}

/// Panel-ready chart payload. Immutable once built for a data load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedChartData {
    pub candles: Vec<Candle>,
    pub indicators: Vec<ProcessedIndicator>,
}

impl ProcessedChartData {
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn overlays(&self) -> impl Iterator<Item = &ProcessedIndicator> {
        self.indicators.iter().filter(|i| i.kind == IndicatorKind::Overlay)
    }

    pub fn subplots(&self) -> impl Iterator<Item = &ProcessedIndicator> {
        self.indicators.iter().filter(|i| i.kind == IndicatorKind::Subplot)
    }

    pub fn indicator(&self, id: &str) -> Option<&ProcessedIndicator> {
        self.indicators.iter().find(|i| i.id == id)
    }

    /// Candle at `time`, or the last one before it
    pub fn candle_at(&self, time: Timestamp) -> Option<&Candle> {
        candle_index_at(&self.candles, time).map(|idx| &self.candles[idx])
    }

    pub fn time_range(&self) -> Option<TimeRange> {
        let first = self.candles.first()?;
        let last = self.candles.last()?;
        Some(TimeRange::new(first.timestamp, last.timestamp))
    }
}
