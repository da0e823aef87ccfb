#![cfg(target_arch = "wasm32")]

use dashboard_chart_wasm::domain::logging::{LogComponent, LogEntry, LogLevel, Logger, TimeProvider};
use dashboard_chart_wasm::infrastructure::{BrowserTimeProvider, ConsoleLogger};
use js_sys::Date;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn browser_clock_tracks_date_now() {
    let before = Date::now() as u64;
    let now = BrowserTimeProvider::new().current_timestamp();
    assert!(now >= before);
}

#[wasm_bindgen_test]
fn browser_clock_formats_local_time() {
    let date = Date::new(&JsValue::from_f64(0.0));
    assert_eq!(
        BrowserTimeProvider::new().format_timestamp(0),
        format!(
            "{:02}:{:02}:{:02}.000",
            date.get_hours(),
            date.get_minutes(),
            date.get_seconds()
        )
    );
}

#[wasm_bindgen_test]
fn console_logger_writes_without_panicking() {
    let logger = ConsoleLogger::new_development();
    logger.log(LogEntry {
        timestamp: 0,
        level: LogLevel::Warn,
        component: LogComponent::Infrastructure("Test"),
        message: "feed failed".to_string(),
    });
}
