use wasm_bindgen::prelude::*;

use crate::application::surface::ChartSurface;
use crate::domain::chart::TimeRange;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::Timestamp;
use crate::log_warn;

#[wasm_bindgen(typescript_custom_section)]
const CHART_SURFACE_TS: &'static str = r#"
export interface ChartSurface {
    syncCrosshair(time: number | null): void;
    syncVisibleRange(from: number, to: number): void;
}
"#;

#[wasm_bindgen]
extern "C" {
    /// Any JS object exposing `syncCrosshair(time | null)` and
    /// `syncVisibleRange(from, to)`, times in epoch milliseconds.
    #[wasm_bindgen(typescript_type = "ChartSurface")]
    pub type JsChartSurface;

    #[wasm_bindgen(method, catch, js_name = syncCrosshair)]
    fn sync_crosshair_js(this: &JsChartSurface, time: Option<f64>) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = syncVisibleRange)]
    fn sync_visible_range_js(this: &JsChartSurface, from: f64, to: f64) -> Result<(), JsValue>;
}

fn component() -> LogComponent {
    LogComponent::Infrastructure("JsChartSurface")
}

impl ChartSurface for JsChartSurface {
    fn sync_crosshair(&self, time: Option<Timestamp>) {
        if let Err(err) = self.sync_crosshair_js(time.map(|t| t.as_f64())) {
            log_warn!(component(), "syncCrosshair threw: {:?}", err);
        }
    }

    fn sync_visible_range(&self, range: TimeRange) {
        if let Err(err) = self.sync_visible_range_js(range.from.as_f64(), range.to.as_f64()) {
            log_warn!(component(), "syncVisibleRange threw: {:?}", err);
        }
    }
}
