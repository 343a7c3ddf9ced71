pub mod components;
pub mod wasm_api;

pub use components::MultiPanelChart;
pub use wasm_api::MultiPanelChartApi;
