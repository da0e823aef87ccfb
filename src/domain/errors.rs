use derive_more::Display;

/// Failure of a single backend feed request.
///
/// "Not found" is deliberately absent: the client maps HTTP 404 to `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum FeedError {
    #[display(fmt = "request failed: {}", _0)]
    Transport(String),
    #[display(fmt = "HTTP {} from {}", status, url)]
    Status { status: u16, url: String },
    #[display(fmt = "malformed payload: {}", _0)]
    Decode(String),
}

impl std::error::Error for FeedError {}

/// Validation errors raised while ingesting feed rows or configuration.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DomainError {
    #[display(fmt = "symbol cannot be empty")]
    EmptySymbol,
    #[display(fmt = "invalid timestamp: {}", _0)]
    InvalidTimestamp(String),
    #[display(fmt = "trade row has neither a side nor a direction: {}", _0)]
    UnknownTradeKind(String),
    #[display(fmt = "unknown timezone: {}", _0)]
    InvalidTimezone(String),
    #[display(fmt = "invalid backend URL: {}", _0)]
    InvalidBaseUrl(String),
}

impl std::error::Error for DomainError {}

pub type FeedResult<T> = Result<T, FeedError>;
pub type DomainResult<T> = Result<T, DomainError>;
