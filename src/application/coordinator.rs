use std::cell::{Cell, RefCell};

use crate::domain::{
    errors::FeedResult,
    logging::LogComponent,
    market_data::{ChartFeedRepository, FeedQuery, FeedSnapshot, RawTrade, SeriesWindow, TradeEvent},
};
use crate::{log_debug, log_warn};

const COMPONENT: LogComponent = LogComponent::Application("FetchCoordinator");

/// Identity of one load, captured when it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    window: SeriesWindow,
    generation: u64,
}

impl LoadTicket {
    pub fn window(&self) -> &SeriesWindow {
        &self.window
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of a guarded load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Fresh(FeedSnapshot),
    /// The live window moved on while the load was in flight
    Stale,
}

/// Resolves the three feeds of a window and guards against late arrivals.
///
/// Every `begin`/`invalidate` bumps a generation counter; a load may only be
/// applied if the counter still matches the value captured on its ticket.
pub struct FetchCoordinator<R> {
    repository: R,
    generation: Cell<u64>,
    live: RefCell<Option<SeriesWindow>>,
}

impl<R: ChartFeedRepository> FetchCoordinator<R> {
    pub fn new(repository: R) -> Self {
        Self { repository, generation: Cell::new(0), live: RefCell::new(None) }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Marks `window` live and supersedes every earlier ticket.
    pub fn begin(&self, window: SeriesWindow) -> LoadTicket {
        let generation = self.bump();
        *self.live.borrow_mut() = Some(window.clone());
        LoadTicket { window, generation }
    }

    /// Drops the live window; all outstanding tickets become stale.
    pub fn invalidate(&self) {
        self.bump();
        *self.live.borrow_mut() = None;
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation.get()
            && self.live.borrow().as_ref() == Some(&ticket.window)
    }

    pub fn live_window(&self) -> Option<SeriesWindow> {
        self.live.borrow().clone()
    }

    fn bump(&self) -> u64 {
        let next = self.generation.get().wrapping_add(1);
        self.generation.set(next);
        next
    }

    /// Fetches chart, trades and logs concurrently. Never fails: a feed that
    /// errors or is absent contributes an empty list.
    pub async fn load(&self, query: &FeedQuery) -> FeedSnapshot {
        let (chart, trades, logs) = futures::join!(
            self.repository.fetch_chart(query),
            self.repository.fetch_trades(query),
            self.repository.fetch_logs(query)
        );

        let points = settle("chart", query, chart).map(|p| p.points).unwrap_or_default();
        let trades = settle("trades", query, trades).map(|p| ingest_trades(p.trades)).unwrap_or_default();
        let logs = settle("logs", query, logs).map(|p| p.logs).unwrap_or_default();

        FeedSnapshot { points, trades, logs }
    }

    /// `load`, then checks the ticket before handing the result out.
    pub async fn load_guarded(&self, ticket: &LoadTicket, query: &FeedQuery) -> LoadOutcome {
        let snapshot = self.load(query).await;
        if self.is_current(ticket) {
            LoadOutcome::Fresh(snapshot)
        } else {
            log_debug!(
                COMPONENT,
                "discarding stale result for {} (generation {} < {})",
                ticket.window,
                ticket.generation,
                self.generation.get()
            );
            LoadOutcome::Stale
        }
    }
}

fn settle<T>(feed: &str, query: &FeedQuery, result: FeedResult<Option<T>>) -> Option<T> {
    match result {
        Ok(Some(payload)) => Some(payload),
        Ok(None) => {
            log_debug!(COMPONENT, "no {} data for {}@{}", feed, query.symbol, query.offset);
            None
        }
        Err(e) => {
            log_warn!(COMPONENT, "{} feed failed for {}@{}: {}", feed, query.symbol, query.offset, e);
            None
        }
    }
}

fn ingest_trades(rows: Vec<RawTrade>) -> Vec<TradeEvent> {
    rows.into_iter()
        .filter_map(|row| match TradeEvent::try_from(row) {
            Ok(trade) => Some(trade),
            Err(e) => {
                log_warn!(COMPONENT, "skipping trade row: {}", e);
                None
            }
        })
        .collect()
}
