//! Pointer-drag sessions. A session starts on press, receives every move
//! while the pointer is held, and is dropped on release.

use crate::application::config::MIN_CHART_HEIGHT_PX;
use crate::domain::chart::Panel;
use crate::domain::chart::layout::{find_panel, resizable_range, resize_panel};

/// Drag on the resizer between two stacked panels
#[derive(Debug, Clone, PartialEq)]
pub struct PanelResizeSession {
    upper_panel_id: String,
    lower_panel_id: String,
    start_pointer_y: f64,
    start_height_percent: f64,
    container_height_px: f64,
}

impl PanelResizeSession {
    /// `None` when either panel is missing or hidden, or the container has no height.
    pub fn begin(
        panels: &[Panel],
        upper_panel_id: &str,
        lower_panel_id: &str,
        pointer_y: f64,
        container_height_px: f64,
    ) -> Option<Self> {
        if upper_panel_id == lower_panel_id || !pointer_y.is_finite() || !(container_height_px > 0.0) {
            return None;
        }
        let upper = find_panel(panels, upper_panel_id).filter(|p| p.visible)?;
        find_panel(panels, lower_panel_id).filter(|p| p.visible)?;

        Some(Self {
            upper_panel_id: upper_panel_id.to_string(),
            lower_panel_id: lower_panel_id.to_string(),
            start_pointer_y: pointer_y,
            start_height_percent: upper.height_percent,
            container_height_px,
        })
    }

    pub fn upper_panel_id(&self) -> &str {
        &self.upper_panel_id
    }

    pub fn lower_panel_id(&self) -> &str {
        &self.lower_panel_id
    }

    /// Pointer travel since the press, as a share of the container
    pub fn percent_delta(&self, pointer_y: f64) -> f64 {
        (pointer_y - self.start_pointer_y) / self.container_height_px * 100.0
    }

    /// Panels after moving the pointer to `pointer_y`. The requested height is
    /// clamped to what both panels can accept, so a fast drag stops at the
    /// bound instead of being rejected.
    pub fn apply(&self, panels: &[Panel], pointer_y: f64) -> Vec<Panel> {
        if !pointer_y.is_finite() {
            return panels.to_vec();
        }
        let Some((low, high)) = resizable_range(panels, &self.upper_panel_id, &self.lower_panel_id) else {
            return panels.to_vec();
        };
        let target = (self.start_height_percent + self.percent_delta(pointer_y)).clamp(low, high);
        resize_panel(panels, &self.upper_panel_id, target, Some(&self.lower_panel_id))
    }
}

/// Drag on the bottom edge of the chart. Changes the total pixel height only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartResizeSession {
    start_height_px: f64,
    start_pointer_y: f64,
    min_height_px: f64,
}

impl ChartResizeSession {
    pub fn begin(height_px: f64, pointer_y: f64) -> Self {
        Self {
            start_height_px: height_px,
            start_pointer_y: pointer_y,
            min_height_px: MIN_CHART_HEIGHT_PX,
        }
    }

    pub fn height_at(&self, pointer_y: f64) -> f64 {
        let height = self.start_height_px + (pointer_y - self.start_pointer_y);
        if height.is_finite() { height.max(self.min_height_px) } else { self.start_height_px }
    }
}

/// The single pointer interaction in progress
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    PanelResize(PanelResizeSession),
    ChartResize(ChartResizeSession),
}
