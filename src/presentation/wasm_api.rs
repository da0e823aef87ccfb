use std::rc::Rc;

use js_sys::{Function, Promise};
use leptos::{Callback, view};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

use crate::application::{ChartSession, PollHandle};
use crate::config::DashboardConfig;
use crate::domain::chart::Sampling;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::Symbol;
use crate::infrastructure::DashboardHttpClient;
use crate::presentation::components::{ChartPanel, ChartViewModel};
use crate::{log_info, log_warn};

const COMPONENT: LogComponent = LogComponent::Presentation("DashboardChart");
const DEFAULT_DAILY_DAYS: u32 = 30;

type Session = ChartSession<DashboardHttpClient>;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// One symbol chart for JS callers: navigation, loading, polling and the
/// serialised frame for the plotting library.
#[wasm_bindgen]
pub struct DashboardChart {
    session: Rc<Session>,
    polling: Option<PollHandle>,
}

#[wasm_bindgen]
impl DashboardChart {
    /// `days` defaults to 1 for intraday charts and 30 for daily ones.
    /// `config_json` is an optional `DashboardConfig` blob.
    #[wasm_bindgen(constructor)]
    pub fn new(
        symbol: String,
        intraday: bool,
        days: Option<u32>,
        config_json: Option<String>,
    ) -> Result<DashboardChart, JsValue> {
        let dashboard = match config_json {
            Some(raw) => DashboardConfig::from_json(&raw).map_err(js_error)?,
            None => DashboardConfig::default(),
        };
        let (sampling, default_days) =
            if intraday { (Sampling::Intraday, 1) } else { (Sampling::Daily, DEFAULT_DAILY_DAYS) };
        let config = dashboard.chart(sampling, days.unwrap_or(default_days)).map_err(js_error)?;
        let symbol = Symbol::new(&symbol).map_err(js_error)?;

        log_info!(COMPONENT, "new {} chart for {}", sampling, symbol);
        let client = DashboardHttpClient::new(&dashboard.base_url).map_err(js_error)?;
        Ok(Self { session: Rc::new(ChartSession::new(symbol, config, client)), polling: None })
    }

    /// Loads the live window; resolves to `false` if the result went stale.
    pub fn refresh(&self) -> Promise {
        refresh_promise(&self.session)
    }

    #[wasm_bindgen(js_name = prevDay)]
    pub fn prev_day(&self) -> Promise {
        self.session.go_prev_day();
        refresh_promise(&self.session)
    }

    /// Resolves to `false` without fetching when already at the latest session.
    #[wasm_bindgen(js_name = nextDay)]
    pub fn next_day(&self) -> Promise {
        match self.session.go_next_day() {
            Some(_) => refresh_promise(&self.session),
            None => Promise::resolve(&JsValue::FALSE),
        }
    }

    #[wasm_bindgen(js_name = setSymbol)]
    pub fn set_symbol(&self, symbol: String) -> Result<Promise, JsValue> {
        let symbol = Symbol::new(&symbol).map_err(js_error)?;
        self.session.set_symbol(symbol);
        Ok(refresh_promise(&self.session))
    }

    pub fn label(&self) -> String {
        self.session.label()
    }

    pub fn offset(&self) -> i32 {
        self.session.window().offset
    }

    #[wasm_bindgen(js_name = canGoForward)]
    pub fn can_go_forward(&self) -> bool {
        self.session.can_go_forward()
    }

    /// Current view (window, label and chart state) as JSON
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.view()).map_err(js_error)
    }

    /// Calls `callback(json)` after every state change.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: Function) {
        self.session.subscribe(move |view| match serde_json::to_string(view) {
            Ok(json) => {
                if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                    log_warn!(COMPONENT, "change callback threw: {:?}", e);
                }
            }
            Err(e) => {
                log_warn!(COMPONENT, "cannot serialise view: {}", e);
            }
        });
    }

    /// Mounts the header, status and log list into the element with `element_id`.
    #[wasm_bindgen(js_name = mountPanel)]
    pub fn mount_panel(&self, element_id: &str) -> Result<(), JsValue> {
        let parent = leptos::document()
            .get_element_by_id(element_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{element_id}")))?
            .dyn_into::<web_sys::HtmlElement>()
            .map_err(|_| JsValue::from_str(&format!("#{element_id} is not an HTML element")))?;

        let model = ChartViewModel::bind(&self.session);
        let prev = Rc::clone(&self.session);
        let next = Rc::clone(&self.session);
        let on_prev = Callback::new(move |_: ()| {
            prev.go_prev_day();
            spawn_refresh(&prev);
        });
        let on_next = Callback::new(move |_: ()| {
            if next.go_next_day().is_some() {
                spawn_refresh(&next);
            }
        });

        leptos::mount_to(parent, move || view! { <ChartPanel model=model on_prev=on_prev on_next=on_next/> });
        Ok(())
    }

    /// Re-fetches the latest session at the configured interval. Replaces
    /// any earlier poll loop of this chart.
    #[wasm_bindgen(js_name = startPolling)]
    pub fn start_polling(&mut self) {
        self.polling = Some(self.session.start_polling());
    }

    #[wasm_bindgen(js_name = stopPolling)]
    pub fn stop_polling(&mut self) {
        if let Some(handle) = self.polling.take() {
            handle.cancel();
            log_info!(COMPONENT, "polling stopped for {}", self.session.window().symbol);
        }
    }

    /// Stops polling and discards anything still in flight.
    pub fn dispose(&mut self) {
        self.stop_polling();
        self.session.dispose();
    }
}

fn refresh_promise(session: &Rc<Session>) -> Promise {
    let session = Rc::clone(session);
    future_to_promise(async move { Ok(JsValue::from_bool(session.refresh().await)) })
}

fn spawn_refresh(session: &Rc<Session>) {
    let session = Rc::clone(session);
    spawn_local(async move {
        session.refresh().await;
    });
}
