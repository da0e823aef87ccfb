use leptos::*;

use crate::application::{ChartSession, ChartView};
use crate::domain::chart::ChartState;
use crate::domain::market_data::ChartFeedRepository;

/// Reactive mirror of a `ChartSession`, fed by its change notifications
#[derive(Clone, Copy)]
pub struct ChartViewModel {
    pub symbol: RwSignal<String>,
    pub label: RwSignal<String>,
    pub can_go_forward: RwSignal<bool>,
    pub state: RwSignal<ChartState>,
}

impl ChartViewModel {
    pub fn new(view: &ChartView) -> Self {
        Self {
            symbol: create_rw_signal(view.symbol.clone()),
            label: create_rw_signal(view.label.clone()),
            can_go_forward: create_rw_signal(view.can_go_forward),
            state: create_rw_signal(view.state.clone()),
        }
    }

    pub fn bind<R: ChartFeedRepository>(session: &ChartSession<R>) -> Self {
        let model = Self::new(&session.view());
        session.subscribe(move |view| model.apply(view));
        model
    }

    pub fn apply(&self, view: &ChartView) {
        self.symbol.set(view.symbol.clone());
        self.label.set(view.label.clone());
        self.can_go_forward.set(view.can_go_forward);
        self.state.set(view.state.clone());
    }

    /// Placeholder text while there is no chart to draw
    pub fn status(&self) -> Option<&'static str> {
        self.state.with(|state| match state {
            ChartState::Loading => Some("Loading..."),
            ChartState::NoData { .. } => Some("No data"),
            ChartState::Ready(_) => None,
        })
    }

    pub fn log_lines(&self) -> Vec<String> {
        self.state.with(|state| state.logs().iter().map(|log| log.display_line()).collect())
    }

    /// Log lines keyed by position, for `<For>`
    pub fn log_rows(&self) -> Vec<(usize, String)> {
        self.log_lines().into_iter().enumerate().collect()
    }

    pub fn logs_placeholder(&self) -> Option<&'static str> {
        self.state.with(|state| state.logs().is_empty().then_some("No logs"))
    }
}

/// Header with the day label and prev/next arrows
#[component]
pub fn DayNavigator(
    model: ChartViewModel,
    #[prop(into)] on_prev: Callback<()>,
    #[prop(into)] on_next: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="day-nav">
            <button class="day-btn" on:click=move |_| on_prev.call(())>"<"</button>
            <span class="day-label">{move || model.label.get()}</span>
            <button
                class="day-btn"
                disabled=move || !model.can_go_forward.get()
                on:click=move |_| on_next.call(())
            >
                ">"
            </button>
        </div>
    }
}

#[component]
pub fn ChartStatus(model: ChartViewModel) -> impl IntoView {
    view! {
        <div class="chart-status">
            {move || model.status().unwrap_or_default()}
        </div>
    }
}

#[component]
pub fn LogList(model: ChartViewModel) -> impl IntoView {
    view! {
        <div class="log-list">
            {move || model.logs_placeholder().map(|text| view! { <div class="log-empty">{text}</div> })}
            <For
                each=move || model.log_rows()
                key=|(index, line)| format!("{index}:{line}")
                children=move |(_, line)| {
                    view! { <div class="log-line">{line}</div> }
                }
            />
        </div>
    }
}

/// Everything around the plot surface for one chart
#[component]
pub fn ChartPanel(
    model: ChartViewModel,
    #[prop(into)] on_prev: Callback<()>,
    #[prop(into)] on_next: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="chart-panel">
            <div class="chart-symbol">{move || model.symbol.get()}</div>
            <DayNavigator model=model on_prev=on_prev on_next=on_next/>
            <ChartStatus model=model/>
            <LogList model=model/>
        </div>
    }
}
