use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Id of the price panel
pub const MAIN_PANEL_ID: &str = "main";
/// Prefix of every indicator panel id
pub const INDICATOR_PANEL_PREFIX: &str = "indicator-";

pub const MAIN_PANEL_MIN_HEIGHT_PX: f64 = 200.0;
pub const INDICATOR_PANEL_MIN_HEIGHT_PX: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    Main,
    Indicator,
}

/// Domain entity - one horizontally stacked region of the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub id: String,
    pub title: String,
    pub kind: PanelKind,
    /// Share of the visible height; 0 while hidden
    pub height_percent: f64,
    /// Floor in pixels, fixed at creation
    pub min_height: f64,
    pub indicator_ids: Vec<String>,
    pub visible: bool,
    pub order: u32,
}

impl Panel {
    pub fn main(height_percent: f64) -> Self {
        Self {
            id: MAIN_PANEL_ID.to_string(),
            title: "Price".to_string(),
            kind: PanelKind::Main,
            height_percent,
            min_height: MAIN_PANEL_MIN_HEIGHT_PX,
            indicator_ids: Vec::new(),
            visible: true,
            order: 0,
        }
    }

    pub fn indicator(indicator_id: &str, title: &str, height_percent: f64, order: u32) -> Self {
        Self {
            id: indicator_panel_id(indicator_id),
            title: title.to_string(),
            kind: PanelKind::Indicator,
            height_percent,
            min_height: INDICATOR_PANEL_MIN_HEIGHT_PX,
            indicator_ids: vec![indicator_id.to_string()],
            visible: true,
            order,
        }
    }

    pub fn is_main(&self) -> bool {
        self.kind == PanelKind::Main
    }

    /// Adds an indicator id unless already present
    pub fn attach_indicator(&mut self, indicator_id: &str) {
        if !self.indicator_ids.iter().any(|id| id == indicator_id) {
            self.indicator_ids.push(indicator_id.to_string());
        }
    }
}

/// Pixel height assigned to a visible panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelPixelHeight {
    pub panel_id: String,
    pub height_px: f64,
}

pub fn indicator_panel_id(indicator_id: &str) -> String {
    format!("{INDICATOR_PANEL_PREFIX}{indicator_id}")
}

/// Inverse of [`indicator_panel_id`]
pub fn indicator_id_from_panel_id(panel_id: &str) -> Option<&str> {
    panel_id.strip_prefix(INDICATOR_PANEL_PREFIX)
}
