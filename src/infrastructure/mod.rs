pub mod http;
pub mod services;

pub use http::DashboardHttpClient;
pub use services::{BrowserTimeProvider, ConsoleLogger};
