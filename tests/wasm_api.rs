#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use gloo::utils::format::JsValueSerdeExt;
use js_sys::{Array, Function, Object, Promise, Reflect};
use multi_panel_chart::infrastructure::JsChartSurface;
use multi_panel_chart::presentation::MultiPanelChartApi;
use serde_json::json;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn config() -> JsValue {
    JsValue::from_serde(&json!({ "instrument": "BTC-USD", "assetCategory": "crypto", "interval": "1m" })).unwrap()
}

fn raw() -> JsValue {
    JsValue::from_serde(&json!({
        "rows": [
            { "timestamp": 60000, "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5, "rsi": 40.0 },
            { "timestamp": 120000, "open": 1.5, "high": 2.5, "low": 1.0, "close": 2.0, "rsi": 45.0 }
        ],
        "indicators": [{ "id": "rsi", "name": "RSI", "kind": "subplot" }]
    }))
    .unwrap()
}

/// JS object recording every control call into `calls`
fn recording_surface() -> (JsChartSurface, Array) {
    let factory = Function::new_no_args(
        "const calls = []; \
         return { calls, \
                  syncCrosshair(t) { calls.push(t); }, \
                  syncVisibleRange(a, b) { calls.push([a, b]); } };",
    );
    let object = factory.call0(&JsValue::NULL).unwrap();
    let calls = Reflect::get(&object, &JsValue::from_str("calls")).unwrap().unchecked_into::<Array>();
    (object.unchecked_into::<JsChartSurface>(), calls)
}

/// Resolves after queued re-renders have run
async fn next_tick() {
    let promise = Promise::new(&mut |resolve, _reject| {
        web_sys::window().unwrap().set_timeout_with_callback(&resolve).unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
fn crosshair_reaches_the_main_surface() {
    let api = MultiPanelChartApi::new(config(), None, None, None).unwrap();
    api.load_data(raw()).unwrap();

    let (main, calls) = recording_surface();
    api.register_surface("main", main).unwrap();
    api.crosshair_move("indicator-rsi", Some(120_000.0)).unwrap();

    // first call is the range handed over on registration
    assert_eq!(calls.length(), 2);
    assert_eq!(calls.get(1).as_f64(), Some(120_000.0));
}

#[wasm_bindgen_test]
fn sub_panel_surface_gets_the_range_on_registration() {
    let api = MultiPanelChartApi::new(config(), None, None, None).unwrap();
    api.load_data(raw()).unwrap();

    let (rsi, calls) = recording_surface();
    api.register_surface("indicator-rsi", rsi).unwrap();

    let range: Array = calls.get(0).unchecked_into();
    assert_eq!(range.get(0).as_f64(), Some(60_000.0));
    assert_eq!(range.get(1).as_f64(), Some(120_000.0));
}

#[wasm_bindgen_test]
fn bad_input_becomes_a_js_error() {
    let api = MultiPanelChartApi::new(config(), None, None, None).unwrap();
    assert!(api.set_active_tool(Some("laser".to_string())).is_err());
    assert!(api.crosshair_move("main", Some(f64::NAN)).is_err());
    assert!(MultiPanelChartApi::new(JsValue::from_str("nope"), None, None, None).is_err());
}

#[wasm_bindgen_test]
fn status_and_panels_are_plain_objects() {
    let api = MultiPanelChartApi::new(config(), None, None, None).unwrap();
    api.report_error("rate limited").unwrap();

    let status: serde_json::Value = api.status().unwrap().into_serde().unwrap();
    assert_eq!(status, json!({ "state": "error", "message": "rate limited" }));

    api.load_data(raw()).unwrap();
    let panels: serde_json::Value = api.panels().unwrap().into_serde().unwrap();
    assert_eq!(panels.as_array().map(Vec::len), Some(2));
    assert_eq!(api.chart_height().unwrap(), 600.0);
}

#[wasm_bindgen_test]
fn surface_echoing_the_crosshair_is_turned_away() {
    let api = Rc::new(MultiPanelChartApi::new(config(), None, None, None).unwrap());
    api.load_data(raw()).unwrap();

    let echoes = Rc::new(RefCell::new(Vec::new()));
    let echo = {
        let api = Rc::clone(&api);
        let echoes = Rc::clone(&echoes);
        Closure::<dyn FnMut(JsValue)>::new(move |time: JsValue| {
            let result = api.crosshair_move("main", time.as_f64());
            echoes.borrow_mut().push(result.err().and_then(|err| err.as_string()));
        })
    };
    let factory = Function::new_with_args(
        "echo",
        "return { syncCrosshair(t) { echo(t); }, syncVisibleRange(a, b) {} };",
    );
    let surface = factory.call1(&JsValue::NULL, echo.as_ref()).unwrap();
    echo.forget();
    api.register_surface("main", surface.unchecked_into()).unwrap();

    api.crosshair_move("indicator-rsi", Some(60_000.0)).unwrap();

    assert_eq!(*echoes.borrow(), vec![Some("chart is busy handling another call".to_string())]);
    let crosshair: serde_json::Value = api.crosshair_data().unwrap().into_serde().unwrap();
    assert_eq!(crosshair["time"], 60_000);
    // the controller is free again once the fan-out returns
    api.crosshair_move("main", None).unwrap();
}

#[wasm_bindgen_test]
async fn panel_containers_survive_layout_changes() {
    let document = web_sys::window().unwrap().document().unwrap();
    let host = document.create_element("div").unwrap();
    host.set_id("chart-host-layout");
    document.body().unwrap().append_child(&host).unwrap();

    let api = MultiPanelChartApi::new(config(), None, None, None).unwrap();
    api.load_data(raw()).unwrap();
    api.mount("chart-host-layout").unwrap();
    next_tick().await;

    let main = document.get_element_by_id("chart-panel-main").unwrap();
    let rsi = document.get_element_by_id("chart-panel-indicator-rsi").unwrap();
    let main_style = main.get_attribute("style");

    assert!(api.resize_panel("main", 60.0, None).unwrap());
    next_tick().await;

    assert!(Object::is(&main, &document.get_element_by_id("chart-panel-main").unwrap()));
    assert!(Object::is(&rsi, &document.get_element_by_id("chart-panel-indicator-rsi").unwrap()));
    assert_ne!(main.get_attribute("style"), main_style);

    assert!(api.toggle_panel("indicator-rsi").unwrap());
    next_tick().await;

    assert!(document.get_element_by_id("chart-panel-indicator-rsi").is_none());
    assert!(Object::is(&main, &document.get_element_by_id("chart-panel-main").unwrap()));
}
