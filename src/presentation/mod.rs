pub mod components;
pub mod wasm_api;

pub use components::*;
pub use wasm_api::DashboardChart;
