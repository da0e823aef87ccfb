use crate::domain::errors::FeedResult;
use crate::domain::market_data::{ChartPayload, FeedQuery, LogsPayload, TradesPayload};

/// Backend feeds for one chart window.
///
/// `Ok(None)` means the backend has nothing for the window ("not found");
/// every other failure is an `Err`.
#[allow(async_fn_in_trait)]
pub trait ChartFeedRepository {
    async fn fetch_chart(&self, query: &FeedQuery) -> FeedResult<Option<ChartPayload>>;

    async fn fetch_trades(&self, query: &FeedQuery) -> FeedResult<Option<TradesPayload>>;

    async fn fetch_logs(&self, query: &FeedQuery) -> FeedResult<Option<LogsPayload>>;
}
