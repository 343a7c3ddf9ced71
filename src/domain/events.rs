use crate::domain::chart::{DrawingTool, TimeRange};
use crate::domain::market_data::Timestamp;
use std::fmt::Debug;

/// Base trait for all domain events
pub trait DomainEvent: Debug + Clone {
    fn event_type(&self) -> &'static str;
    fn timestamp(&self) -> u64 {
        use crate::domain::logging::get_time_provider;
        get_time_provider().current_timestamp()
    }
}

/// State changes published by the synchronization controller
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    DataLoaded {
        candle_count: usize,
        panel_count: usize,
    },
    LoadFailed {
        message: String,
    },
    PanelsChanged {
        visible_panel_ids: Vec<String>,
    },
    CrosshairMoved {
        origin_panel_id: String,
        time: Option<Timestamp>,
    },
    VisibleRangeChanged {
        range: TimeRange,
    },
    DrawingsChanged {
        panel_id: Option<String>,
        total: usize,
    },
    ActiveToolChanged {
        tool: Option<DrawingTool>,
    },
    IndicatorsChanged {
        indicator_ids: Vec<String>,
    },
    ChartResized {
        height_px: f64,
    },
}

impl DomainEvent for ChartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ChartEvent::DataLoaded { .. } => "DataLoaded",
            ChartEvent::LoadFailed { .. } => "LoadFailed",
            ChartEvent::PanelsChanged { .. } => "PanelsChanged",
            ChartEvent::CrosshairMoved { .. } => "CrosshairMoved",
            ChartEvent::VisibleRangeChanged { .. } => "VisibleRangeChanged",
            ChartEvent::DrawingsChanged { .. } => "DrawingsChanged",
            ChartEvent::ActiveToolChanged { .. } => "ActiveToolChanged",
            ChartEvent::IndicatorsChanged { .. } => "IndicatorsChanged",
            ChartEvent::ChartResized { .. } => "ChartResized",
        }
    }
}

/// Event dispatcher for publishing events
pub trait EventDispatcher {
    fn publish_chart_event(&self, event: ChartEvent);
}

/// Simple in-memory event dispatcher
#[derive(Default)]
pub struct InMemoryEventDispatcher {
    chart_handlers: Vec<Box<dyn Fn(&ChartEvent)>>,
}

impl InMemoryEventDispatcher {
    pub fn new() -> Self {
        Self { chart_handlers: Vec::new() }
    }

    pub fn subscribe_to_chart_events<F>(&mut self, handler: F)
    where
        F: Fn(&ChartEvent) + 'static,
    {
        self.chart_handlers.push(Box::new(handler));
    }

    pub fn handler_count(&self) -> usize {
        self.chart_handlers.len()
    }
}

impl EventDispatcher for InMemoryEventDispatcher {
    fn publish_chart_event(&self, event: ChartEvent) {
        for handler in &self.chart_handlers {
            handler(&event);
        }
    }
}
