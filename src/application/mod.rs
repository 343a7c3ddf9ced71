pub mod config;
pub mod data_processor;
pub mod interaction;
pub mod surface;
pub mod sync_controller;

pub use config::*;
pub use data_processor::*;
pub use interaction::*;
pub use surface::*;
pub use sync_controller::*;
