use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::{
    errors::{DomainError, DomainResult, FeedError, FeedResult},
    logging::LogComponent,
    market_data::{ChartFeedRepository, ChartPayload, FeedQuery, LogsPayload, Symbol, TradesPayload},
};
use crate::log_debug;

const COMPONENT: LogComponent = LogComponent::Infrastructure("DashboardHttpClient");
const NOT_FOUND: u16 = 404;

/// REST client for the dashboard backend's chart, trades and logs feeds
#[derive(Debug, Clone)]
pub struct DashboardHttpClient {
    base_url: Url,
}

impl DashboardHttpClient {
    pub fn new(base_url: &str) -> DomainResult<Self> {
        let parsed = Url::parse(base_url).map_err(|e| DomainError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(DomainError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { base_url: parsed })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn chart_url(&self, query: &FeedQuery) -> String {
        let mut params = vec![("days", query.days.to_string())];
        if query.intraday {
            params.push(("intraday", "true".to_string()));
        }
        params.push(("offset", query.offset.to_string()));
        self.endpoint("stock", &query.symbol, &params)
    }

    pub fn trades_url(&self, query: &FeedQuery) -> String {
        let params = [("days", query.days.to_string()), ("offset", query.offset.to_string())];
        self.endpoint("trades", &query.symbol, &params)
    }

    pub fn logs_url(&self, query: &FeedQuery) -> String {
        self.endpoint("logs", &query.symbol, &[("offset", query.offset.to_string())])
    }

    /// `{base}/{route}/{symbol}?{params}` with the symbol encoded as one path segment
    fn endpoint(&self, route: &str, symbol: &Symbol, params: &[(&str, String)]) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(route).push(symbol.value());
        }
        url.query_pairs_mut().extend_pairs(params.iter());
        url.to_string()
    }

    /// GETs `url` and decodes the JSON body. 404 means "no data" and yields `None`.
    async fn get_json<T: DeserializeOwned>(&self, url: String) -> FeedResult<Option<T>> {
        log_debug!(COMPONENT, "GET {}", url);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| FeedError::Transport(format!("{url}: {e}")))?;

        if !has_payload(response.status(), response.ok(), &url)? {
            log_debug!(COMPONENT, "no data at {}", url);
            return Ok(None);
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| FeedError::Decode(format!("{url}: {e}")))
    }
}

/// `Ok(false)` for 404, an error for any other non-2xx status.
fn has_payload(status: u16, ok: bool, url: &str) -> FeedResult<bool> {
    if ok {
        Ok(true)
    } else if status == NOT_FOUND {
        Ok(false)
    } else {
        Err(FeedError::Status { status, url: url.to_string() })
    }
}

impl ChartFeedRepository for DashboardHttpClient {
    async fn fetch_chart(&self, query: &FeedQuery) -> FeedResult<Option<ChartPayload>> {
        self.get_json(self.chart_url(query)).await
    }

    async fn fetch_trades(&self, query: &FeedQuery) -> FeedResult<Option<TradesPayload>> {
        self.get_json(self.trades_url(query)).await
    }

    async fn fetch_logs(&self, query: &FeedQuery) -> FeedResult<Option<LogsPayload>> {
        self.get_json(self.logs_url(query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BASE_URL;

    fn query(intraday: bool) -> FeedQuery {
        FeedQuery { symbol: Symbol::from("aapl"), offset: -2, days: 1, intraday }
    }

    #[test]
    fn chart_url_carries_sampling_and_offset() {
        let client = DashboardHttpClient::new("https://api.example.com/").unwrap();
        assert_eq!(
            client.chart_url(&query(true)),
            "https://api.example.com/stock/AAPL?days=1&intraday=true&offset=-2"
        );
        assert_eq!(
            client.chart_url(&query(false)),
            "https://api.example.com/stock/AAPL?days=1&offset=-2"
        );
    }

    #[test]
    fn trades_and_logs_urls() {
        let client = DashboardHttpClient::new("https://api.example.com").unwrap();
        assert_eq!(client.trades_url(&query(true)), "https://api.example.com/trades/AAPL?days=1&offset=-2");
        assert_eq!(client.logs_url(&query(true)), "https://api.example.com/logs/AAPL?offset=-2");
    }

    #[test]
    fn not_found_is_absence_not_error() {
        assert_eq!(has_payload(404, false, "u"), Ok(false));
        assert_eq!(has_payload(200, true, "u"), Ok(true));
        assert_eq!(
            has_payload(500, false, "u"),
            Err(FeedError::Status { status: 500, url: "u".to_string() })
        );
    }

    #[test]
    fn symbol_is_one_encoded_path_segment() {
        let client = DashboardHttpClient::new("https://api.example.com/v1/").unwrap();
        let query = FeedQuery { symbol: Symbol::from("brk/b"), offset: 0, days: 30, intraday: false };
        assert_eq!(client.chart_url(&query), "https://api.example.com/v1/stock/BRK%2FB?days=30&offset=0");
        assert_eq!(client.logs_url(&query), "https://api.example.com/v1/logs/BRK%2FB?offset=0");
    }

    #[test]
    fn hosted_backend_url_is_valid() {
        let client = DashboardHttpClient::new(DEFAULT_BASE_URL).unwrap();
        assert!(client.base_url().starts_with(DEFAULT_BASE_URL));
        assert!(matches!(DashboardHttpClient::new("not a url"), Err(DomainError::InvalidBaseUrl(_))));
        assert!(matches!(DashboardHttpClient::new("mailto:desk@example.com"), Err(DomainError::InvalidBaseUrl(_))));
    }
}
