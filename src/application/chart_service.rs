use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use futures::future::{AbortHandle, Abortable};
use futures::{FutureExt, Stream, StreamExt};
use serde::Serialize;

use crate::application::coordinator::{FetchCoordinator, LoadOutcome};
use crate::application::day_window::DayWindowController;
use crate::config::ChartConfig;
use crate::domain::{
    chart::{ChartFrame, ChartState},
    logging::LogComponent,
    market_data::{ChartFeedRepository, SeriesWindow, Symbol},
};
use crate::{log_debug, log_info};

const COMPONENT: LogComponent = LogComponent::Application("ChartSession");

/// What a view needs to draw a chart instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub symbol: String,
    pub offset: i32,
    pub label: String,
    pub can_go_forward: bool,
    #[serde(flatten)]
    pub state: ChartState,
}

pub type ChartObserver = Box<dyn Fn(&ChartView)>;

/// One chart instance: its day window, its fetch lifecycle and the frame
/// derived from the last fresh load. Instances share nothing.
pub struct ChartSession<R> {
    config: ChartConfig,
    symbol: RefCell<Symbol>,
    days: RefCell<DayWindowController>,
    coordinator: FetchCoordinator<R>,
    state: RefCell<ChartState>,
    observers: RefCell<Vec<ChartObserver>>,
    disposed: Cell<bool>,
}

impl<R: ChartFeedRepository> ChartSession<R> {
    pub fn new(symbol: Symbol, config: ChartConfig, repository: R) -> Self {
        Self {
            config,
            symbol: RefCell::new(symbol),
            days: RefCell::new(DayWindowController::new()),
            coordinator: FetchCoordinator::new(repository),
            state: RefCell::new(ChartState::Loading),
            observers: RefCell::new(Vec::new()),
            disposed: Cell::new(false),
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &FetchCoordinator<R> {
        &self.coordinator
    }

    pub fn window(&self) -> SeriesWindow {
        self.days.borrow().window(&self.symbol.borrow())
    }

    pub fn state(&self) -> ChartState {
        self.state.borrow().clone()
    }

    pub fn label(&self) -> String {
        self.days.borrow().label(self.config.timezone)
    }

    pub fn can_go_forward(&self) -> bool {
        self.days.borrow().can_go_forward()
    }

    pub fn view(&self) -> ChartView {
        let window = self.window();
        ChartView {
            symbol: window.symbol.value().to_string(),
            offset: window.offset,
            label: self.label(),
            can_go_forward: self.can_go_forward(),
            state: self.state(),
        }
    }

    pub fn subscribe(&self, observer: impl Fn(&ChartView) + 'static) {
        self.observers.borrow_mut().push(Box::new(observer));
    }

    pub fn go_prev_day(&self) -> SeriesWindow {
        self.days.borrow_mut().go_prev_day();
        self.window_changed()
    }

    /// `None` at the latest session: the window, and any load in flight for
    /// it, are left alone.
    pub fn go_next_day(&self) -> Option<SeriesWindow> {
        let before = self.days.borrow().offset();
        let after = self.days.borrow_mut().go_next_day();
        (before != after).then(|| self.window_changed())
    }

    pub fn set_symbol(&self, symbol: Symbol) -> SeriesWindow {
        *self.symbol.borrow_mut() = symbol;
        self.days.borrow_mut().reset();
        self.window_changed()
    }

    /// Retires in-flight loads and blanks the display before any new fetch,
    /// so the old day's data never shows under the new label.
    fn window_changed(&self) -> SeriesWindow {
        self.coordinator.invalidate();
        *self.state.borrow_mut() = ChartState::Loading;
        let window = self.window();
        log_debug!(COMPONENT, "window changed to {}", window);
        self.notify();
        window
    }

    /// Loads the live window and applies the result if it is still live.
    /// Returns whether the result was applied.
    pub async fn refresh(&self) -> bool {
        if self.is_disposed() {
            return false;
        }
        let window = self.window();
        let query = self.days.borrow().query(&window.symbol, &self.config);
        let ticket = self.coordinator.begin(window.clone());

        match self.coordinator.load_guarded(&ticket, &query).await {
            LoadOutcome::Fresh(snapshot) => {
                let frame = ChartFrame::build(window, snapshot, self.config.sampling);
                *self.state.borrow_mut() = ChartState::from_frame(frame);
                self.notify();
                true
            }
            LoadOutcome::Stale => false,
        }
    }

    /// Tear-down: anything still in flight is discarded on arrival and later
    /// refreshes do nothing.
    pub fn dispose(&self) {
        self.disposed.set(true);
        self.coordinator.invalidate();
        self.observers.borrow_mut().clear();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    fn notify(&self) {
        let observers = self.observers.borrow();
        if observers.is_empty() {
            return;
        }
        let view = self.view();
        for observer in observers.iter() {
            observer(&view);
        }
    }
}

/// Stops a poll loop when cancelled or dropped
#[derive(Debug)]
pub struct PollHandle {
    abort: AbortHandle,
}

impl PollHandle {
    pub fn cancel(self) {}
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

impl<R: ChartFeedRepository + 'static> ChartSession<R> {
    /// Re-fetches the latest session on every tick. Past days are left alone.
    ///
    /// The loop ends when the handle goes away, the tick stream ends, or the
    /// session is dropped.
    pub fn poll_with<S>(self: &Rc<Self>, ticks: S) -> (impl Future<Output = ()> + 'static, PollHandle)
    where
        S: Stream<Item = ()> + 'static,
    {
        let (abort, registration) = AbortHandle::new_pair();
        let session = Rc::downgrade(self);

        let task = async move {
            let mut ticks = Box::pin(ticks);
            while ticks.next().await.is_some() {
                let Some(live) = session.upgrade() else { break };
                if live.window().is_latest() {
                    live.refresh().await;
                }
            }
        };

        (Abortable::new(task, registration).map(|_| ()), PollHandle { abort })
    }

    /// Spawns the poll loop on the browser event loop.
    pub fn start_polling(self: &Rc<Self>) -> PollHandle {
        let interval_ms = u32::try_from(self.config.poll_interval.as_millis()).unwrap_or(u32::MAX);
        let ticks = gloo_timers::future::IntervalStream::new(interval_ms);
        let (task, handle) = self.poll_with(ticks);
        log_info!(COMPONENT, "polling {} every {} ms", self.window().symbol, interval_ms);
        wasm_bindgen_futures::spawn_local(task);
        handle
    }
}
