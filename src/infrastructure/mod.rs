//! Browser-facing adapters: console logging, wall clock and JS rendering surfaces.

pub mod console_logger;
pub mod js_surface;

pub use console_logger::{BrowserTimeProvider, ConsoleLogger};
pub use js_surface::JsChartSurface;
