//! Synchronization controller.
//!
//! Owns the panel list and is the only writer to the panels' rendering
//! surfaces: crosshair moves from any panel and visible-range changes from the
//! price panel are fanned out to every other registered surface. It also
//! keeps the per-panel drawings, the active drawing tool and the indicator
//! set reported back to the dashboard.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::rc::Rc;

use crate::application::config::{ChartCallbacks, ChartConfig};
use crate::application::data_processor::{RawChartResponse, process_chart_data};
use crate::application::interaction::{ChartResizeSession, Interaction, PanelResizeSession};
use crate::application::surface::ChartSurface;
use crate::domain::chart::layout::{self, find_panel};
use crate::domain::chart::{
    ChartDrawing, CrosshairData, CrosshairValue, DrawingPoint, DrawingTool, MAIN_PANEL_ID, Panel,
    PanelDrawings, PanelPixelHeight, TimeRange,
};
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::events::{ChartEvent, EventDispatcher, InMemoryEventDispatcher};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{ProcessedChartData, ProcessedIndicator, Timestamp};
use crate::{log_debug, log_info, log_warn};

/// What the chart area currently shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum ChartStatus {
    Idle,
    Loading,
    Ready,
    /// Data loaded but contained no rows
    Empty,
    /// Display-only error text, exactly as reported
    Error(String),
}

fn component() -> LogComponent {
    LogComponent::Application("SyncController")
}

pub struct SyncController {
    config: ChartConfig,
    callbacks: ChartCallbacks,
    status: ChartStatus,
    data: Rc<ProcessedChartData>,
    panels: Vec<Panel>,
    surfaces: HashMap<String, Rc<dyn ChartSurface>>,
    crosshair: Option<CrosshairData>,
    visible_range: Option<TimeRange>,
    active_tool: Option<DrawingTool>,
    drawings: PanelDrawings,
    indicator_selector_open: bool,
    interaction: Option<Interaction>,
    dispatcher: InMemoryEventDispatcher,
}

impl SyncController {
    pub fn new(config: ChartConfig, callbacks: ChartCallbacks) -> ChartResult<Self> {
        config.validate()?;
        let data = ProcessedChartData::default();
        let panels = layout::create_initial_panels(&data);
        log_info!(
            component(),
            "Chart created for {} {} ({})",
            config.asset_category,
            config.instrument,
            config.interval
        );

        Ok(Self {
            config,
            callbacks,
            status: ChartStatus::Idle,
            data: Rc::new(data),
            panels,
            surfaces: HashMap::new(),
            crosshair: None,
            visible_range: None,
            active_tool: None,
            drawings: PanelDrawings::new(),
            indicator_selector_open: false,
            interaction: None,
            dispatcher: InMemoryEventDispatcher::new(),
        })
    }

    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: Fn(&ChartEvent) + 'static,
    {
        self.dispatcher.subscribe_to_chart_events(handler);
    }

    fn publish(&self, event: ChartEvent) {
        self.dispatcher.publish_chart_event(event);
    }

    fn publish_panels(&self) {
        let visible_panel_ids = layout::visible_panels(&self.panels).iter().map(|p| p.id.clone()).collect();
        self.publish(ChartEvent::PanelsChanged { visible_panel_ids });
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// The data collaborator started a fetch
    pub fn begin_loading(&mut self) {
        self.status = ChartStatus::Loading;
    }

    /// Rebuilds panels from a fresh response. Drawings and any drag in
    /// progress belong to the previous panel list and are discarded.
    pub fn load_data(&mut self, raw: &RawChartResponse) -> ChartResult<()> {
        match process_chart_data(raw) {
            Ok(data) => {
                self.apply_data(data);
                self.callbacks.data_loaded(raw);
                Ok(())
            }
            Err(err) => {
                self.fail(err.clone());
                Err(err)
            }
        }
    }

    fn apply_data(&mut self, data: ProcessedChartData) {
        self.interaction = None;
        self.crosshair = None;
        self.drawings.clear_all();
        self.panels = layout::create_initial_panels(&data);

        let panels = &self.panels;
        self.surfaces.retain(|panel_id, _| panels.iter().any(|p| p.id == *panel_id));

        self.visible_range = data.time_range();
        if let Some(range) = self.visible_range {
            for (panel_id, surface) in &self.surfaces {
                if panel_id != MAIN_PANEL_ID {
                    surface.sync_visible_range(range);
                }
            }
        }

        self.status = if data.is_empty() { ChartStatus::Empty } else { ChartStatus::Ready };
        let candle_count = data.candles.len();
        self.data = Rc::new(data);

        log_info!(component(), "Loaded {} candles into {} panels", candle_count, self.panels.len());
        self.publish(ChartEvent::DataLoaded { candle_count, panel_count: self.panels.len() });
        self.publish_panels();
    }

    /// Failure reported by the data collaborator. Shown verbatim, never retried.
    pub fn report_fetch_error(&mut self, message: &str) {
        self.fail(ChartError::DataFetch(message.to_string()));
    }

    fn fail(&mut self, error: ChartError) {
        let message = error.to_string();
        log_warn!(component(), "Data load failed: {}", message);
        self.callbacks.error(&message);
        self.publish(ChartEvent::LoadFailed { message: message.clone() });
        self.status = ChartStatus::Error(message);
    }

    // ── Surface registry ────────────────────────────────────────────────────

    /// Registers the rendering surface of `panel_id` and brings it to the
    /// current time window right away.
    pub fn register_surface(&mut self, panel_id: &str, surface: Rc<dyn ChartSurface>) -> ChartResult<()> {
        if find_panel(&self.panels, panel_id).is_none() {
            return Err(ChartError::Validation(format!("unknown panel '{panel_id}'")));
        }
        if let Some(range) = self.visible_range {
            surface.sync_visible_range(range);
        }
        self.surfaces.insert(panel_id.to_string(), surface);
        log_debug!(component(), "Surface registered for {}", panel_id);
        Ok(())
    }

    pub fn unregister_surface(&mut self, panel_id: &str) -> bool {
        self.surfaces.remove(panel_id).is_some()
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    // ── Crosshair & visible range ───────────────────────────────────────────

    /// Pointer moved over `origin_panel_id` (`None`: pointer left the chart).
    /// Every other surface follows the same timestamp.
    pub fn handle_crosshair_move(&mut self, origin_panel_id: &str, time: Option<Timestamp>) {
        let crosshair = time.map(|t| self.crosshair_at(t));
        self.crosshair = crosshair;

        for (panel_id, surface) in &self.surfaces {
            if panel_id != origin_panel_id {
                surface.sync_crosshair(time);
            }
        }
        self.publish(ChartEvent::CrosshairMoved { origin_panel_id: origin_panel_id.to_string(), time });
    }

    /// Values under the crosshair at `time`, snapped to the candle at or before it
    pub fn crosshair_at(&self, time: Timestamp) -> CrosshairData {
        let candle = self.data.candle_at(time).cloned();
        let lookup = candle.as_ref().map_or(time, |c| c.timestamp);
        let values = self
            .data
            .indicators
            .iter()
            .flat_map(|indicator| {
                indicator.series.iter().filter_map(move |series| {
                    series.value_at(lookup).map(|value| CrosshairValue {
                        indicator_id: indicator.id.clone(),
                        column: series.column.clone(),
                        value,
                    })
                })
            })
            .collect();
        CrosshairData { time, candle, values }
    }

    /// Pan/zoom on a panel. Only the price panel drives the shared window.
    pub fn handle_visible_range_change(&mut self, origin_panel_id: &str, range: TimeRange) -> bool {
        if origin_panel_id != MAIN_PANEL_ID {
            log_debug!(component(), "Ignoring range change from {}", origin_panel_id);
            return false;
        }
        self.visible_range = Some(range);
        for (panel_id, surface) in &self.surfaces {
            if panel_id != MAIN_PANEL_ID {
                surface.sync_visible_range(range);
            }
        }
        self.publish(ChartEvent::VisibleRangeChanged { range });
        true
    }

    // ── Layout commands ─────────────────────────────────────────────────────

    fn replace_panels(&mut self, next: Vec<Panel>) -> bool {
        if next == self.panels {
            return false;
        }
        self.panels = next;
        self.publish_panels();
        true
    }

    pub fn toggle_panel(&mut self, panel_id: &str) -> bool {
        let next = layout::toggle_panel_visibility(&self.panels, panel_id);
        self.replace_panels(next)
    }

    pub fn resize_panel(&mut self, panel_id: &str, new_height_percent: f64, adjacent_panel_id: Option<&str>) -> bool {
        let next = layout::resize_panel(&self.panels, panel_id, new_height_percent, adjacent_panel_id);
        self.replace_panels(next)
    }

    pub fn add_indicator_panel(&mut self, indicator: &ProcessedIndicator) -> bool {
        let next = layout::add_indicator_panel(&self.panels, indicator);
        self.replace_panels(next)
    }

    /// Removes a panel together with its drawings and surface
    pub fn remove_panel(&mut self, panel_id: &str) -> bool {
        let next = layout::remove_indicator_panel(&self.panels, panel_id);
        if !self.replace_panels(next) {
            return false;
        }
        self.drawings.remove_panel(panel_id);
        self.surfaces.remove(panel_id);
        true
    }

    pub fn panel_pixel_heights(&self) -> Vec<PanelPixelHeight> {
        layout::calculate_panel_pixel_heights(&self.panels, self.config.effective_height())
    }

    // ── Indicator assignment ────────────────────────────────────────────────

    pub fn open_indicator_selector(&mut self) {
        self.indicator_selector_open = true;
    }

    pub fn cancel_indicator_selection(&mut self) {
        self.indicator_selector_open = false;
    }

    pub fn is_indicator_selector_open(&self) -> bool {
        self.indicator_selector_open
    }

    /// Adds an indicator to the requested set and asks the dashboard to
    /// reload. Panels follow on the next [`load_data`](Self::load_data).
    pub fn select_indicator(&mut self, indicator_id: &str, parameters: Value) -> bool {
        let indicator_id = indicator_id.trim();
        if indicator_id.is_empty() {
            return false;
        }
        self.indicator_selector_open = false;

        if !self.config.indicators.iter().any(|id| id == indicator_id) {
            self.config.indicators.push(indicator_id.to_string());
        }
        if !parameters.is_null() {
            self.config.indicator_params.insert(indicator_id.to_string(), parameters);
        }
        self.report_indicators();
        true
    }

    /// Removes an indicator panel and drops its indicators from the requested set
    pub fn remove_indicator(&mut self, panel_id: &str) -> bool {
        let Some(panel) = find_panel(&self.panels, panel_id).filter(|p| !p.is_main()) else {
            return false;
        };
        let removed = panel.indicator_ids.clone();
        if !self.remove_panel(panel_id) {
            return false;
        }
        self.forget_indicators(&removed);
        true
    }

    /// Detaches an overlay from the price panel and drops it from the requested set
    pub fn remove_overlay_indicator(&mut self, indicator_id: &str) -> bool {
        let next = layout::detach_overlay_indicator(&self.panels, indicator_id);
        if !self.replace_panels(next) {
            return false;
        }
        self.forget_indicators(&[indicator_id.to_string()]);
        true
    }

    fn forget_indicators(&mut self, indicator_ids: &[String]) {
        self.config.indicators.retain(|id| !indicator_ids.contains(id));
        for id in indicator_ids {
            self.config.indicator_params.remove(id);
        }
        self.report_indicators();
    }

    fn report_indicators(&self) {
        self.callbacks.indicators_changed(&self.config.indicators, &self.config.indicator_params);
        self.publish(ChartEvent::IndicatorsChanged { indicator_ids: self.config.indicators.clone() });
    }

    // ── Drawings ────────────────────────────────────────────────────────────

    pub fn create_drawing(&mut self, panel_id: &str, tool: DrawingTool, points: Vec<DrawingPoint>) -> Option<String> {
        find_panel(&self.panels, panel_id)?;
        let id = self.drawings.create(panel_id, tool, points);
        self.publish_drawings(Some(panel_id));
        Some(id)
    }

    pub fn update_drawing(&mut self, panel_id: &str, drawing_id: &str, points: Vec<DrawingPoint>) -> bool {
        let updated = self.drawings.update(panel_id, drawing_id, points);
        if updated {
            self.publish_drawings(Some(panel_id));
        }
        updated
    }

    pub fn delete_drawing(&mut self, panel_id: &str, drawing_id: &str) -> bool {
        let deleted = self.drawings.delete(panel_id, drawing_id);
        if deleted {
            self.publish_drawings(Some(panel_id));
        }
        deleted
    }

    pub fn clear_drawings(&mut self) {
        self.drawings.clear_all();
        self.publish_drawings(None);
    }

    pub fn drawings(&self, panel_id: &str) -> &[ChartDrawing] {
        self.drawings.for_panel(panel_id)
    }

    fn publish_drawings(&self, panel_id: Option<&str>) {
        self.publish(ChartEvent::DrawingsChanged {
            panel_id: panel_id.map(str::to_string),
            total: self.drawings.total(),
        });
    }

    pub fn set_active_tool(&mut self, tool: Option<DrawingTool>) {
        self.active_tool = tool;
        self.publish(ChartEvent::ActiveToolChanged { tool });
    }

    pub fn active_tool(&self) -> Option<DrawingTool> {
        self.active_tool
    }

    /// The tool a panel's surface should honour. Sub-panels do not draw.
    pub fn active_tool_for(&self, panel_id: &str) -> Option<DrawingTool> {
        if panel_id == MAIN_PANEL_ID { self.active_tool } else { None }
    }

    // ── Pointer interactions ────────────────────────────────────────────────

    /// Press on the resizer between `upper_panel_id` and `lower_panel_id`
    pub fn begin_panel_resize(&mut self, upper_panel_id: &str, lower_panel_id: &str, pointer_y: f64) -> bool {
        let session = PanelResizeSession::begin(
            &self.panels,
            upper_panel_id,
            lower_panel_id,
            pointer_y,
            self.config.effective_height(),
        );
        self.interaction = session.map(Interaction::PanelResize);
        self.interaction.is_some()
    }

    /// Press on the bottom drag handle
    pub fn begin_chart_resize(&mut self, pointer_y: f64) {
        let session = ChartResizeSession::begin(self.config.effective_height(), pointer_y);
        self.interaction = Some(Interaction::ChartResize(session));
    }

    /// Routes a move to the session in progress. Returns whether anything changed.
    pub fn pointer_move(&mut self, pointer_y: f64) -> bool {
        match self.interaction.clone() {
            Some(Interaction::PanelResize(session)) => {
                let next = session.apply(&self.panels, pointer_y);
                self.replace_panels(next)
            }
            Some(Interaction::ChartResize(session)) => {
                let height_px = session.height_at(pointer_y);
                if (height_px - self.config.height).abs() < f64::EPSILON {
                    return false;
                }
                self.config.height = height_px;
                self.publish(ChartEvent::ChartResized { height_px });
                true
            }
            None => false,
        }
    }

    pub fn pointer_up(&mut self) {
        self.interaction = None;
    }

    pub fn interaction(&self) -> Option<&Interaction> {
        self.interaction.as_ref()
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn status(&self) -> &ChartStatus {
        &self.status
    }

    pub fn data(&self) -> Rc<ProcessedChartData> {
        Rc::clone(&self.data)
    }

    pub fn crosshair(&self) -> Option<&CrosshairData> {
        self.crosshair.as_ref()
    }

    pub fn visible_range(&self) -> Option<TimeRange> {
        self.visible_range
    }

    pub fn chart_height(&self) -> f64 {
        self.config.effective_height()
    }
}
