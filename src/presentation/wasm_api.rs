use gloo::utils::format::JsValueSerdeExt;
use js_sys::Function;
use serde::Serialize;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::application::config::{ChartCallbacks, ChartConfig};
use crate::application::data_processor::RawChartResponse;
use crate::application::surface::ChartSurface;
use crate::application::sync_controller::SyncController;
use crate::domain::chart::{DrawingPoint, DrawingTool, TimeRange};
use crate::domain::errors::ChartError;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::Timestamp;
use crate::infrastructure::js_surface::JsChartSurface;
use crate::presentation::components::MultiPanelChart;
use crate::time_utils::format_crosshair_time;
use crate::{log_info, log_warn};

fn component() -> LogComponent {
    LogComponent::Presentation("MultiPanelChartApi")
}

impl From<ChartError> for JsValue {
    fn from(err: ChartError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    JsValue::from_serde(value).map_err(|e| ChartError::from(e).into())
}

fn from_js<T: serde::de::DeserializeOwned>(value: &JsValue) -> Result<T, JsValue> {
    value.into_serde::<T>().map_err(|e| ChartError::from(e).into())
}

fn timestamp_from_js(value: f64) -> Result<Timestamp, JsValue> {
    if value.is_finite() && value >= 0.0 {
        Ok(Timestamp::from_millis(value as u64))
    } else {
        Err(ChartError::Validation(format!("invalid timestamp {value}")).into())
    }
}

fn call_js(callback: &Function, args: &[&JsValue]) {
    let result = match args {
        [] => callback.call0(&JsValue::NULL),
        [a] => callback.call1(&JsValue::NULL, a),
        [a, b] => callback.call2(&JsValue::NULL, a, b),
        _ => return,
    };
    if let Err(err) = result {
        log_warn!(component(), "Dashboard callback threw: {:?}", err);
    }
}

fn js_callbacks(
    on_data_load: Option<Function>,
    on_error: Option<Function>,
    on_indicators_change: Option<Function>,
) -> ChartCallbacks {
    let mut callbacks = ChartCallbacks::new();
    if let Some(f) = on_data_load {
        callbacks = callbacks.on_data_load(move |raw| match JsValue::from_serde(raw) {
            Ok(value) => call_js(&f, &[&value]),
            Err(err) => {
                log_warn!(component(), "Cannot hand data to onDataLoad: {}", err);
            }
        });
    }
    if let Some(f) = on_error {
        callbacks = callbacks.on_error(move |message| call_js(&f, &[&JsValue::from_str(message)]));
    }
    if let Some(f) = on_indicators_change {
        callbacks = callbacks.on_indicators_change(move |ids, params| {
            match (JsValue::from_serde(ids), JsValue::from_serde(params)) {
                (Ok(ids), Ok(params)) => call_js(&f, &[&ids, &params]),
                _ => {
                    log_warn!(component(), "Cannot hand indicators to onIndicatorsChange");
                }
            }
        });
    }
    callbacks
}

/// Dashboard-facing handle of one multi-panel chart
#[wasm_bindgen]
pub struct MultiPanelChartApi {
    controller: Rc<RefCell<SyncController>>,
}

impl MultiPanelChartApi {
    fn controller(&self) -> Result<Ref<'_, SyncController>, JsValue> {
        self.controller
            .try_borrow()
            .map_err(|_| JsValue::from_str("chart is busy handling another call"))
    }

    fn controller_mut(&self) -> Result<RefMut<'_, SyncController>, JsValue> {
        self.controller
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("chart is busy handling another call"))
    }
}

#[wasm_bindgen]
impl MultiPanelChartApi {
    #[wasm_bindgen(constructor)]
    pub fn new(
        config: JsValue,
        on_data_load: Option<Function>,
        on_error: Option<Function>,
        on_indicators_change: Option<Function>,
    ) -> Result<MultiPanelChartApi, JsValue> {
        let config: ChartConfig = from_js(&config)?;
        let callbacks = js_callbacks(on_data_load, on_error, on_indicators_change);
        let controller = SyncController::new(config, callbacks)?;
        Ok(Self { controller: Rc::new(RefCell::new(controller)) })
    }

    /// Renders the panel stack into the element with id `parent_id`
    pub fn mount(&self, parent_id: &str) -> Result<(), JsValue> {
        let parent = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(parent_id))
            .ok_or_else(|| JsValue::from_str(&format!("element '{parent_id}' not found")))?
            .dyn_into::<web_sys::HtmlElement>()?;
        let controller = Rc::clone(&self.controller);
        leptos::mount_to(parent, move || leptos::view! { <MultiPanelChart controller=controller /> });
        log_info!(component(), "Mounted into #{}", parent_id);
        Ok(())
    }

    #[wasm_bindgen(js_name = beginLoading)]
    pub fn begin_loading(&self) -> Result<(), JsValue> {
        self.controller_mut()?.begin_loading();
        Ok(())
    }

    /// Feeds a raw `{ rows, indicators }` response
    #[wasm_bindgen(js_name = loadData)]
    pub fn load_data(&self, raw: JsValue) -> Result<(), JsValue> {
        let raw: RawChartResponse = from_js(&raw)?;
        self.controller_mut()?.load_data(&raw)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = reportError)]
    pub fn report_error(&self, message: &str) -> Result<(), JsValue> {
        self.controller_mut()?.report_fetch_error(message);
        Ok(())
    }

    #[wasm_bindgen(js_name = registerSurface)]
    pub fn register_surface(&self, panel_id: &str, surface: JsChartSurface) -> Result<(), JsValue> {
        let surface: Rc<dyn ChartSurface> = Rc::new(surface);
        self.controller_mut()?.register_surface(panel_id, surface)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = unregisterSurface)]
    pub fn unregister_surface(&self, panel_id: &str) -> Result<bool, JsValue> {
        Ok(self.controller_mut()?.unregister_surface(panel_id))
    }

    /// `time` in epoch milliseconds, `undefined` when the pointer left the panel
    #[wasm_bindgen(js_name = crosshairMove)]
    pub fn crosshair_move(&self, origin_panel_id: &str, time: Option<f64>) -> Result<(), JsValue> {
        let time = time.map(timestamp_from_js).transpose()?;
        self.controller_mut()?.handle_crosshair_move(origin_panel_id, time);
        Ok(())
    }

    /// Values under the crosshair, `null` when hidden
    #[wasm_bindgen(js_name = crosshairData)]
    pub fn crosshair_data(&self) -> Result<JsValue, JsValue> {
        to_js(&self.controller()?.crosshair())
    }

    #[wasm_bindgen(js_name = crosshairLabel)]
    pub fn crosshair_label(&self, time: f64) -> Result<String, JsValue> {
        let time = timestamp_from_js(time)?;
        Ok(format_crosshair_time(time, self.controller()?.config().interval))
    }

    #[wasm_bindgen(js_name = visibleRangeChange)]
    pub fn visible_range_change(&self, origin_panel_id: &str, from: f64, to: f64) -> Result<bool, JsValue> {
        let range = TimeRange::new(timestamp_from_js(from)?, timestamp_from_js(to)?);
        Ok(self.controller_mut()?.handle_visible_range_change(origin_panel_id, range))
    }

    #[wasm_bindgen(js_name = togglePanel)]
    pub fn toggle_panel(&self, panel_id: &str) -> Result<bool, JsValue> {
        Ok(self.controller_mut()?.toggle_panel(panel_id))
    }

    #[wasm_bindgen(js_name = resizePanel)]
    pub fn resize_panel(
        &self,
        panel_id: &str,
        new_height_percent: f64,
        adjacent_panel_id: Option<String>,
    ) -> Result<bool, JsValue> {
        Ok(self
            .controller_mut()?
            .resize_panel(panel_id, new_height_percent, adjacent_panel_id.as_deref()))
    }

    /// Shows the panel of an already loaded indicator
    #[wasm_bindgen(js_name = addIndicatorPanel)]
    pub fn add_indicator_panel(&self, indicator_id: &str) -> Result<bool, JsValue> {
        let data = self.controller()?.data();
        let indicator = data
            .indicator(indicator_id)
            .ok_or_else(|| ChartError::Validation(format!("indicator '{indicator_id}' is not loaded")))?;
        Ok(self.controller_mut()?.add_indicator_panel(indicator))
    }

    #[wasm_bindgen(js_name = removeIndicator)]
    pub fn remove_indicator(&self, panel_id: &str) -> Result<bool, JsValue> {
        Ok(self.controller_mut()?.remove_indicator(panel_id))
    }

    #[wasm_bindgen(js_name = removeOverlayIndicator)]
    pub fn remove_overlay_indicator(&self, indicator_id: &str) -> Result<bool, JsValue> {
        Ok(self.controller_mut()?.remove_overlay_indicator(indicator_id))
    }

    #[wasm_bindgen(js_name = openIndicatorSelector)]
    pub fn open_indicator_selector(&self) -> Result<(), JsValue> {
        self.controller_mut()?.open_indicator_selector();
        Ok(())
    }

    #[wasm_bindgen(js_name = cancelIndicatorSelection)]
    pub fn cancel_indicator_selection(&self) -> Result<(), JsValue> {
        self.controller_mut()?.cancel_indicator_selection();
        Ok(())
    }

    #[wasm_bindgen(js_name = selectIndicator)]
    pub fn select_indicator(&self, indicator_id: &str, parameters: JsValue) -> Result<bool, JsValue> {
        let parameters = if parameters.is_undefined() || parameters.is_null() {
            serde_json::Value::Null
        } else {
            from_js(&parameters)?
        };
        Ok(self.controller_mut()?.select_indicator(indicator_id, parameters))
    }

    /// Tool name such as `"trend_line"`, or `undefined` to disarm
    #[wasm_bindgen(js_name = setActiveTool)]
    pub fn set_active_tool(&self, tool: Option<String>) -> Result<(), JsValue> {
        let tool = tool
            .map(|name| {
                name.parse::<DrawingTool>()
                    .map_err(|_| ChartError::Validation(format!("unknown drawing tool '{name}'")))
            })
            .transpose()?;
        self.controller_mut()?.set_active_tool(tool);
        Ok(())
    }

    #[wasm_bindgen(js_name = activeToolFor)]
    pub fn active_tool_for(&self, panel_id: &str) -> Result<Option<String>, JsValue> {
        Ok(self.controller()?.active_tool_for(panel_id).map(|t| t.to_string()))
    }

    /// `points` is an array of `{ time, price }`. Returns the new drawing id.
    #[wasm_bindgen(js_name = createDrawing)]
    pub fn create_drawing(&self, panel_id: &str, tool: &str, points: JsValue) -> Result<String, JsValue> {
        let tool = tool
            .parse::<DrawingTool>()
            .map_err(|_| ChartError::Validation(format!("unknown drawing tool '{tool}'")))?;
        let points: Vec<DrawingPoint> = from_js(&points)?;
        self.controller_mut()?
            .create_drawing(panel_id, tool, points)
            .ok_or_else(|| ChartError::Validation(format!("unknown panel '{panel_id}'")).into())
    }

    #[wasm_bindgen(js_name = updateDrawing)]
    pub fn update_drawing(&self, panel_id: &str, drawing_id: &str, points: JsValue) -> Result<bool, JsValue> {
        let points: Vec<DrawingPoint> = from_js(&points)?;
        Ok(self.controller_mut()?.update_drawing(panel_id, drawing_id, points))
    }

    #[wasm_bindgen(js_name = deleteDrawing)]
    pub fn delete_drawing(&self, panel_id: &str, drawing_id: &str) -> Result<bool, JsValue> {
        Ok(self.controller_mut()?.delete_drawing(panel_id, drawing_id))
    }

    #[wasm_bindgen(js_name = clearDrawings)]
    pub fn clear_drawings(&self) -> Result<(), JsValue> {
        self.controller_mut()?.clear_drawings();
        Ok(())
    }

    pub fn drawings(&self, panel_id: &str) -> Result<JsValue, JsValue> {
        to_js(self.controller()?.drawings(panel_id))
    }

    #[wasm_bindgen(js_name = beginPanelResize)]
    pub fn begin_panel_resize(&self, upper_panel_id: &str, lower_panel_id: &str, pointer_y: f64) -> Result<bool, JsValue> {
        Ok(self
            .controller_mut()?
            .begin_panel_resize(upper_panel_id, lower_panel_id, pointer_y))
    }

    #[wasm_bindgen(js_name = beginChartResize)]
    pub fn begin_chart_resize(&self, pointer_y: f64) -> Result<(), JsValue> {
        self.controller_mut()?.begin_chart_resize(pointer_y);
        Ok(())
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, pointer_y: f64) -> Result<bool, JsValue> {
        Ok(self.controller_mut()?.pointer_move(pointer_y))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&self) -> Result<(), JsValue> {
        self.controller_mut()?.pointer_up();
        Ok(())
    }

    pub fn panels(&self) -> Result<JsValue, JsValue> {
        to_js(self.controller()?.panels())
    }

    #[wasm_bindgen(js_name = pixelHeights)]
    pub fn pixel_heights(&self) -> Result<JsValue, JsValue> {
        to_js(&self.controller()?.panel_pixel_heights())
    }

    #[wasm_bindgen(js_name = chartHeight)]
    pub fn chart_height(&self) -> Result<f64, JsValue> {
        Ok(self.controller()?.chart_height())
    }

    /// `{ state, message? }`
    pub fn status(&self) -> Result<JsValue, JsValue> {
        to_js(self.controller()?.status())
    }

    /// Crosshair line color for the configured theme, as CSS
    #[wasm_bindgen(js_name = crosshairColor)]
    pub fn crosshair_color(&self) -> Result<String, JsValue> {
        Ok(self.controller()?.config().theme.palette().crosshair.to_css())
    }

    pub fn config(&self) -> Result<JsValue, JsValue> {
        to_js(self.controller()?.config())
    }
}
