mod common;

use common::{FakeFeeds, Reply, logs, points, trades};
use dashboard_chart_wasm::application::{FetchCoordinator, LoadOutcome};
use dashboard_chart_wasm::domain::errors::FeedError;
use dashboard_chart_wasm::domain::market_data::{
    Direction, FeedQuery, FeedSnapshot, SeriesWindow, Side, Symbol, TradeKind,
};
use futures::executor::block_on;
use serde_json::json;

fn query(offset: i32) -> FeedQuery {
    FeedQuery { symbol: Symbol::from("AAPL"), offset, days: 1, intraday: true }
}

#[test]
fn failed_feed_does_not_block_the_others() {
    let feeds = FakeFeeds::new();
    feeds.reply(
        "AAPL",
        0,
        Reply {
            chart: Err(FeedError::Status { status: 500, url: "/stock/AAPL".to_string() }),
            trades: Ok(Some(trades(json!({"trades": [{"ts": "2024-05-03T13:35:00Z", "side": "BUY", "price": 10.5}]})))),
            logs: Ok(Some(logs(&["opened position"]))),
        },
    );

    let snapshot = block_on(FetchCoordinator::new(feeds.clone()).load(&query(0)));

    assert!(snapshot.points.is_empty());
    assert_eq!(snapshot.trades.len(), 1);
    assert_eq!(snapshot.trades[0].kind, TradeKind::Side(Side::Buy));
    assert_eq!(snapshot.trades[0].price, Some(10.5));
    assert_eq!(snapshot.logs.len(), 1);
    assert_eq!(feeds.total_calls(), 3);
}

#[test]
fn transport_failure_of_every_feed_is_empty() {
    let feeds = FakeFeeds::new();
    let down = FeedError::Transport("connection refused".to_string());
    feeds.reply(
        "AAPL",
        0,
        Reply { chart: Err(down.clone()), trades: Err(down.clone()), logs: Err(down) },
    );

    let snapshot = block_on(FetchCoordinator::new(feeds).load(&query(0)));

    assert_eq!(snapshot, FeedSnapshot::empty());
}

#[test]
fn absent_and_empty_feeds_are_the_canonical_empty_state() {
    let feeds = FakeFeeds::new();
    feeds.reply(
        "AAPL",
        -1,
        Reply {
            chart: Ok(Some(points(&[]))),
            trades: Ok(None),
            logs: Ok(Some(logs(&[]))),
        },
    );

    let snapshot = block_on(FetchCoordinator::new(feeds).load(&query(-1)));

    assert_eq!(snapshot, FeedSnapshot { points: vec![], trades: vec![], logs: vec![] });
    assert!(snapshot.is_empty());
}

#[test]
fn unclassifiable_trade_rows_are_skipped() {
    let feeds = FakeFeeds::new();
    feeds.reply(
        "AAPL",
        0,
        Reply {
            chart: Ok(Some(points(&[(0, 10.0), (5, 11.0)]))),
            trades: Ok(Some(trades(json!({"trades": [
                {"ts": "2024-05-03T13:30:00Z", "direction": "long", "qty": 3},
                {"ts": "2024-05-03T13:31:00Z", "side": "HOLD"},
                {"ts": "2024-05-03T13:32:00Z", "price": 10.2},
                {"ts": "2024-05-03T13:33:00Z", "direction": "CLOSE", "quantity": 3}
            ]})))),
            logs: Ok(None),
        },
    );

    let snapshot = block_on(FetchCoordinator::new(feeds).load(&query(0)));

    let kinds: Vec<_> = snapshot.trades.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TradeKind::Direction(Direction::Long), TradeKind::Direction(Direction::Close)]
    );
    assert_eq!(snapshot.trades[1].qty, Some(3.0));
    assert_eq!(snapshot.points.len(), 2);
}

#[test]
fn stale_ticket_discards_a_completed_load() {
    let feeds = FakeFeeds::new();
    feeds.reply("AAPL", 0, Reply { chart: Ok(Some(points(&[(0, 10.0)]))), ..Reply::default() });
    let coordinator = FetchCoordinator::new(feeds);

    let ticket = coordinator.begin(SeriesWindow::new(Symbol::from("AAPL"), 0));
    coordinator.invalidate();

    let outcome = block_on(coordinator.load_guarded(&ticket, &query(0)));
    assert_eq!(outcome, LoadOutcome::Stale);
}

#[test]
fn one_malformed_row_keeps_the_rest_of_its_feed() {
    let feeds = FakeFeeds::new();
    feeds.reply(
        "AAPL",
        0,
        Reply {
            chart: Ok(Some(
                serde_json::from_value(json!({"points": [
                    {"ts": 1714743000000.0, "price": 10.0},
                    {"ts": null, "price": 10.5},
                    {"ts": "2024-05-03T13:40:00Z", "price": 11.0}
                ]}))
                .unwrap(),
            )),
            trades: Ok(Some(trades(json!({"trades": [
                {"ts": "2024-05-03 13:32:00+0000", "side": "SELL"},
                {"ts": "sometime", "side": "BUY"},
                {"ts": "2024-05-03T13:33:00Z", "direction": "SHORT"}
            ]})))),
            logs: Ok(Some(
                serde_json::from_value(json!({"logs": [
                    {"ts": null, "message": "no clock"},
                    {"ts": "2024-05-03T13:30:00Z", "message": "kept"}
                ]}))
                .unwrap(),
            )),
        },
    );

    let snapshot = block_on(FetchCoordinator::new(feeds).load(&query(0)));

    assert_eq!(snapshot.points.len(), 2);
    assert_eq!(snapshot.points[1].price, Some(11.0));
    let kinds: Vec<_> = snapshot.trades.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TradeKind::Side(Side::Sell), TradeKind::Direction(Direction::Short)]);
    assert_eq!(snapshot.logs.len(), 1);
    assert_eq!(snapshot.logs[0].message, "kept");
}
