use chrono::{DateTime, Duration, LocalResult, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::config::ChartConfig;
use crate::domain::market_data::{FeedQuery, SeriesWindow, Symbol};

/// Wall-clock hour used when shifting dates, far from DST transitions and midnight
const NEUTRAL_HOUR: u32 = 12;

/// Navigable day offset of one chart. `0` is the most recent session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayWindowController {
    offset: i32,
}

impl DayWindowController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn go_prev_day(&mut self) -> i32 {
        self.offset = self.offset.saturating_sub(1);
        self.offset
    }

    pub fn go_next_day(&mut self) -> i32 {
        self.offset = (self.offset + 1).min(0);
        self.offset
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    pub fn can_go_forward(&self) -> bool {
        self.offset < 0
    }

    pub fn window(&self, symbol: &Symbol) -> SeriesWindow {
        SeriesWindow::new(symbol.clone(), self.offset)
    }

    pub fn query(&self, symbol: &Symbol, config: &ChartConfig) -> FeedQuery {
        FeedQuery {
            symbol: symbol.clone(),
            offset: self.offset,
            days: config.days,
            intraday: config.sampling.is_intraday(),
        }
    }

    pub fn label(&self, tz: Tz) -> String {
        label_at(self.offset, Utc::now(), tz)
    }
}

/// Short weekday + month/day for the session `offset` days before `now`,
/// as seen in `tz`.
pub fn label_at(offset: i32, now: DateTime<Utc>, tz: Tz) -> String {
    let today = now.with_timezone(&tz).date_naive();
    let day = today + Duration::days(i64::from(offset));
    let noon = day.and_time(NaiveTime::from_hms_opt(NEUTRAL_HOUR, 0, 0).unwrap_or_default());
    match tz.from_local_datetime(&noon) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.format("%a, %-m/%-d").to_string(),
        LocalResult::None => day.format("%a, %-m/%-d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;

    fn utc(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn next_day_clamps_at_latest_session() {
        let mut controller = DayWindowController::new();
        assert_eq!(controller.go_next_day(), 0);
        assert_eq!(controller.go_next_day(), 0);
        controller.go_prev_day();
        assert_eq!(controller.offset(), -1);
        assert!(controller.can_go_forward());
        assert_eq!(controller.go_next_day(), 0);
        assert!(!controller.can_go_forward());
    }

    #[test]
    fn prev_day_is_unbounded() {
        let mut controller = DayWindowController::new();
        for _ in 0..10 {
            controller.go_prev_day();
        }
        assert_eq!(controller.offset(), -10);
    }

    #[test]
    fn label_uses_reference_timezone_date() {
        // 02:00 UTC on Saturday is still Friday evening in New York
        let now = utc("2024-05-04T02:00:00Z");
        insta::assert_snapshot!(label_at(0, now, New_York), @"Fri, 5/3");
        insta::assert_snapshot!(label_at(-1, now, New_York), @"Thu, 5/2");
    }

    #[test]
    fn label_steps_whole_days_across_dst_change() {
        // US clocks sprang forward on 2024-03-10
        let now = utc("2024-03-11T04:30:00Z");
        assert_eq!(label_at(0, now, New_York), "Mon, 3/11");
        assert_eq!(label_at(-1, now, New_York), "Sun, 3/10");
        assert_eq!(label_at(-2, now, New_York), "Sat, 3/9");
    }

    #[test]
    fn query_carries_config() {
        let mut controller = DayWindowController::new();
        controller.go_prev_day();
        let query = controller.query(&Symbol::from("mu"), &ChartConfig::daily(30));
        assert_eq!(query.offset, -1);
        assert_eq!(query.days, 30);
        assert!(!query.intraday);
        assert_eq!(controller.window(&Symbol::from("mu")).offset, -1);
    }
}
