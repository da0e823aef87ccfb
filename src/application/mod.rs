pub mod chart_service;
pub mod coordinator;
pub mod day_window;

pub use chart_service::*;
pub use coordinator::*;
pub use day_window::*;
