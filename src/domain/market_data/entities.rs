use super::value_objects::{Direction, Side, Symbol, Timestamp, TradeKind};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::logging::LogComponent;
use crate::log_warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

const COMPONENT: LogComponent = LogComponent::Domain("FeedPayload");

/// One sampled price with its pre-computed moving averages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub ts: Timestamp,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub fast: Option<f64>,
    #[serde(default)]
    pub slow: Option<f64>,
}

impl Point {
    pub fn new(ts: Timestamp, price: f64) -> Self {
        Self { ts, price: Some(price), fast: None, slow: None }
    }

    pub fn with_averages(mut self, fast: Option<f64>, slow: Option<f64>) -> Self {
        self.fast = fast;
        self.slow = slow;
        self
    }
}

/// Filled order as sent by the backend, in either of its two shapes
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrade {
    pub ts: Timestamp,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, alias = "quantity")]
    pub qty: Option<f64>,
}

/// Discrete trade event with its classification resolved
#[derive(Debug, Clone, PartialEq)]
pub struct TradeEvent {
    pub ts: Timestamp,
    pub kind: TradeKind,
    pub price: Option<f64>,
    pub qty: Option<f64>,
}

impl TradeEvent {
    pub fn new(ts: Timestamp, kind: TradeKind) -> Self {
        Self { ts, kind, price: None, qty: None }
    }
}

impl TryFrom<RawTrade> for TradeEvent {
    type Error = DomainError;

    fn try_from(raw: RawTrade) -> DomainResult<Self> {
        let side = raw.side.as_deref().and_then(|s| s.parse::<Side>().ok());
        let direction = raw.direction.as_deref().and_then(|d| d.parse::<Direction>().ok());
        let kind = match (side, direction) {
            (Some(side), _) => TradeKind::Side(side),
            (None, Some(direction)) => TradeKind::Direction(direction),
            (None, None) => {
                let shown = raw.side.or(raw.direction).unwrap_or_else(|| "<missing>".to_string());
                return Err(DomainError::UnknownTradeKind(shown));
            }
        };
        Ok(Self { ts: raw.ts, kind, price: raw.price, qty: raw.qty })
    }
}

/// Bot log line attached to a symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub ts: Timestamp,
    pub message: String,
}

impl LogEvent {
    /// `HH:MM:SS message` with the time shown in UTC
    pub fn display_line(&self) -> String {
        format!("{} {}", self.ts.to_utc().format("%H:%M:%S"), self.message)
    }
}

/// Unit of work: one symbol viewed at one day offset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesWindow {
    pub symbol: Symbol,
    pub offset: i32,
}

impl SeriesWindow {
    pub fn new(symbol: Symbol, offset: i32) -> Self {
        Self { symbol, offset: offset.min(0) }
    }

    pub fn is_latest(&self) -> bool {
        self.offset == 0
    }
}

impl std::fmt::Display for SeriesWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.symbol, self.offset)
    }
}

/// Backend query parameters derived from a window and chart configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub symbol: Symbol,
    pub offset: i32,
    pub days: u32,
    pub intraday: bool,
}

/// Decodes a row list one row at a time. A row that does not fit is logged
/// and dropped; its neighbours survive. A missing or `null` list is empty.
fn lenient_rows<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let rows = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<T>(row) {
            Ok(item) => Some(item),
            Err(e) => {
                log_warn!(COMPONENT, "skipping malformed row: {}", e);
                None
            }
        })
        .collect())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartPayload {
    #[serde(default, deserialize_with = "lenient_rows")]
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TradesPayload {
    #[serde(default, deserialize_with = "lenient_rows")]
    pub trades: Vec<RawTrade>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsPayload {
    #[serde(default, deserialize_with = "lenient_rows")]
    pub logs: Vec<LogEvent>,
}

/// The three feeds for one window after ingestion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedSnapshot {
    pub points: Vec<Point>,
    pub trades: Vec<TradeEvent>,
    pub logs: Vec<LogEvent>,
}

impl FeedSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.trades.is_empty() && self.logs.is_empty()
    }
}
