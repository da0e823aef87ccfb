#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::task::Poll;

use dashboard_chart_wasm::domain::errors::FeedResult;
use dashboard_chart_wasm::domain::market_data::{
    ChartFeedRepository, ChartPayload, FeedQuery, LogEvent, LogsPayload, Point, Timestamp, TradesPayload,
};

/// 2024-05-03 13:30 UTC (a Friday)
pub const T0: i64 = 1_714_743_000_000;

pub fn ts(minutes: i64) -> Timestamp {
    Timestamp::from_millis(T0 + minutes * 60_000).unwrap()
}

pub fn points(prices: &[(i64, f64)]) -> ChartPayload {
    ChartPayload { points: prices.iter().map(|&(minutes, price)| Point::new(ts(minutes), price)).collect() }
}

pub fn logs(messages: &[&str]) -> LogsPayload {
    LogsPayload {
        logs: messages
            .iter()
            .enumerate()
            .map(|(i, message)| LogEvent { ts: ts(i as i64), message: message.to_string() })
            .collect(),
    }
}

pub fn trades(json: serde_json::Value) -> TradesPayload {
    serde_json::from_value(json).unwrap()
}

/// What the fake backend answers for one (symbol, offset)
#[derive(Clone)]
pub struct Reply {
    pub chart: FeedResult<Option<ChartPayload>>,
    pub trades: FeedResult<Option<TradesPayload>>,
    pub logs: FeedResult<Option<LogsPayload>>,
}

impl Default for Reply {
    fn default() -> Self {
        Self { chart: Ok(None), trades: Ok(None), logs: Ok(None) }
    }
}

type Key = (String, i32);

#[derive(Default)]
struct State {
    replies: HashMap<Key, Reply>,
    held: HashSet<Key>,
    calls: Vec<(&'static str, Key)>,
}

/// In-memory backend. Requests for a held window stay pending until released,
/// so tests can script the order in which loads complete.
#[derive(Clone, Default)]
pub struct FakeFeeds {
    state: Rc<RefCell<State>>,
}

impl FakeFeeds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, symbol: &str, offset: i32, reply: Reply) {
        self.state.borrow_mut().replies.insert(key(symbol, offset), reply);
    }

    pub fn hold(&self, symbol: &str, offset: i32) {
        self.state.borrow_mut().held.insert(key(symbol, offset));
    }

    pub fn release(&self, symbol: &str, offset: i32) {
        self.state.borrow_mut().held.remove(&key(symbol, offset));
    }

    /// Chart requests seen for a window
    pub fn chart_calls(&self, symbol: &str, offset: i32) -> usize {
        let wanted = key(symbol, offset);
        self.state.borrow().calls.iter().filter(|(feed, k)| *feed == "chart" && *k == wanted).count()
    }

    pub fn total_calls(&self) -> usize {
        self.state.borrow().calls.len()
    }

    fn enter(&self, feed: &'static str, query: &FeedQuery) -> Key {
        let key = key(query.symbol.value(), query.offset);
        self.state.borrow_mut().calls.push((feed, key.clone()));
        key
    }

    async fn gate(&self, key: &Key) {
        futures::future::poll_fn(|_| {
            if self.state.borrow().held.contains(key) { Poll::Pending } else { Poll::Ready(()) }
        })
        .await
    }

    fn answer(&self, key: &Key) -> Reply {
        self.state.borrow().replies.get(key).cloned().unwrap_or_default()
    }
}

fn key(symbol: &str, offset: i32) -> Key {
    (symbol.to_uppercase(), offset)
}

impl ChartFeedRepository for FakeFeeds {
    async fn fetch_chart(&self, query: &FeedQuery) -> FeedResult<Option<ChartPayload>> {
        let key = self.enter("chart", query);
        self.gate(&key).await;
        self.answer(&key).chart
    }

    async fn fetch_trades(&self, query: &FeedQuery) -> FeedResult<Option<TradesPayload>> {
        let key = self.enter("trades", query);
        self.gate(&key).await;
        self.answer(&key).trades
    }

    async fn fetch_logs(&self, query: &FeedQuery) -> FeedResult<Option<LogsPayload>> {
        let key = self.enter("logs", query);
        self.gate(&key).await;
        self.answer(&key).logs
    }
}
