use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{
    Candle, IndicatorDefinition, IndicatorSeries, OHLCV, Price, ProcessedChartData, ProcessedIndicator,
    SeriesPoint, Timestamp, Volume,
};
use crate::{log_debug, log_info};

/// One row as returned by the data collaborator. Indicator values sit next to
/// the OHLCV fields, keyed by column name. Extra columns of any type are kept;
/// only numeric ones feed indicator series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub timestamp: Option<u64>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(flatten)]
    pub values: BTreeMap<String, Value>,
}

/// Raw price/indicator response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawChartResponse {
    #[serde(default)]
    pub rows: Vec<RawRow>,
    #[serde(default)]
    pub indicators: Vec<IndicatorDefinition>,
}

impl RawChartResponse {
    pub fn from_json(json: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn component() -> LogComponent {
    LogComponent::Application("DataProcessor")
}

/// Builds the panel-ready structure.
///
/// Rows without a timestamp are rejected, rows are sorted by time, and for a
/// repeated timestamp the row that came last in the response wins. Every
/// indicator keeps only the columns present in the data. An indicator with no
/// matching column is dropped. No rows is a valid, empty result.
pub fn process_chart_data(raw: &RawChartResponse) -> ChartResult<ProcessedChartData> {
    let mut rows: Vec<(Timestamp, &RawRow)> = Vec::with_capacity(raw.rows.len());
    for (idx, row) in raw.rows.iter().enumerate() {
        let Some(timestamp) = row.timestamp else {
            return Err(ChartError::Validation(format!("row {idx} has no timestamp")));
        };
        rows.push((Timestamp::from_millis(timestamp), row));
    }
    rows.sort_by_key(|(timestamp, _)| *timestamp);
    let received = rows.len();
    // stable sort keeps response order within a timestamp; dedup keeps the first of each run
    rows.reverse();
    rows.dedup_by_key(|(timestamp, _)| *timestamp);
    rows.reverse();
    if rows.len() < received {
        log_debug!(component(), "Dropped {} rows with repeated timestamps", received - rows.len());
    }

    let candles: Vec<Candle> = rows
        .iter()
        .map(|(timestamp, row)| {
            Candle::new(
                *timestamp,
                OHLCV::new(
                    Price::from(row.open),
                    Price::from(row.high),
                    Price::from(row.low),
                    Price::from(row.close),
                    Volume::from(row.volume),
                ),
            )
        })
        .collect();

    let malformed = candles.iter().filter(|c| !c.ohlcv.is_valid()).count();
    if malformed > 0 {
        log_debug!(component(), "{} rows have inconsistent OHLC values", malformed);
    }

    let mut seen = HashSet::new();
    let mut indicators = Vec::with_capacity(raw.indicators.len());
    for definition in &raw.indicators {
        if !seen.insert(definition.id.as_str()) {
            continue;
        }
        let series = build_series(definition, &rows);
        if series.is_empty() {
            log_debug!(component(), "Indicator {} has no data column, not rendered", definition.id);
            continue;
        }
        indicators.push(ProcessedIndicator {
            id: definition.id.clone(),
            name: definition.name.clone(),
            kind: definition.kind,
            style: definition.style,
            parameters: definition.parameters.clone(),
            series,
        });
    }

    log_info!(component(), "Processed {} candles, {} indicators", candles.len(), indicators.len());
    Ok(ProcessedChartData { candles, indicators })
}

fn build_series(definition: &IndicatorDefinition, rows: &[(Timestamp, &RawRow)]) -> Vec<IndicatorSeries> {
    definition
        .value_columns()
        .into_iter()
        .filter(|column| rows.iter().any(|(_, row)| row.values.contains_key(column)))
        .map(|column| {
            let points = rows
                .iter()
                .filter_map(|(time, row)| {
                    let value = row.values.get(&column).and_then(Value::as_f64)?;
                    value.is_finite().then_some(SeriesPoint { time: *time, value })
                })
                .collect();
            IndicatorSeries { column, points }
        })
        .collect()
}
