use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

use crate::domain::market_data::Timestamp;

/// Drawing tools offered by the toolbar. Only one is active at a time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DrawingTool {
    TrendLine,
    HorizontalLine,
    VerticalLine,
    Rectangle,
    Fibonacci,
    Freehand,
    Text,
}

/// Anchor in price/time space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawingPoint {
    pub time: Timestamp,
    pub price: f64,
}

impl DrawingPoint {
    pub fn new(time: Timestamp, price: f64) -> Self {
        Self { time, price }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDrawing {
    pub id: String,
    pub tool: DrawingTool,
    pub points: Vec<DrawingPoint>,
}

/// User annotations grouped by panel id
#[derive(Debug, Clone, Default)]
pub struct PanelDrawings {
    by_panel: HashMap<String, Vec<ChartDrawing>>,
    next_id: u64,
}

impl PanelDrawings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new drawing on `panel_id` and returns its id
    pub fn create(&mut self, panel_id: &str, tool: DrawingTool, points: Vec<DrawingPoint>) -> String {
        self.next_id += 1;
        let id = format!("drawing-{}", self.next_id);
        self.by_panel
            .entry(panel_id.to_string())
            .or_default()
            .push(ChartDrawing { id: id.clone(), tool, points });
        id
    }

    /// Replaces the anchors of a drawing. Only looks inside `panel_id`.
    pub fn update(&mut self, panel_id: &str, drawing_id: &str, points: Vec<DrawingPoint>) -> bool {
        let Some(drawing) = self
            .by_panel
            .get_mut(panel_id)
            .and_then(|drawings| drawings.iter_mut().find(|d| d.id == drawing_id))
        else {
            return false;
        };
        drawing.points = points;
        true
    }

    pub fn delete(&mut self, panel_id: &str, drawing_id: &str) -> bool {
        let Some(drawings) = self.by_panel.get_mut(panel_id) else {
            return false;
        };
        let before = drawings.len();
        drawings.retain(|d| d.id != drawing_id);
        drawings.len() != before
    }

    /// Empties every panel's collection
    pub fn clear_all(&mut self) {
        self.by_panel.clear();
    }

    pub fn remove_panel(&mut self, panel_id: &str) {
        self.by_panel.remove(panel_id);
    }

    pub fn for_panel(&self, panel_id: &str) -> &[ChartDrawing] {
        self.by_panel.get(panel_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.by_panel.values().map(Vec::len).sum()
    }
}
