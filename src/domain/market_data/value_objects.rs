use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use derive_more::{Deref, Display};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use strum::{AsRefStr, Display as StrumDisplay, EnumString};

use crate::domain::errors::{DomainError, DomainResult};

/// Value Object - ticker symbol, always upper case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: &str) -> DomainResult<Self> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptySymbol);
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.trim().to_uppercase())
    }
}

/// Value Object - feed timestamp.
///
/// Keeps the UTC offset the backend sent so hour-based axis breaks still line
/// up with the feed's wall clock. Timestamps without a zone are taken as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp(DateTime<FixedOffset>);

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
/// Zoned forms RFC 3339 rejects: space separator or `+0000`-style offsets
const ZONED_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

impl Timestamp {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Self(dt));
        }
        for format in ZONED_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(raw, format) {
                return Ok(Self(dt));
            }
        }
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(Self::from_naive_utc(naive));
            }
        }
        if let Some(naive) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Ok(Self::from_naive_utc(naive));
        }
        Err(DomainError::InvalidTimestamp(raw.to_string()))
    }

    pub fn from_millis(millis: i64) -> DomainResult<Self> {
        Utc.timestamp_millis_opt(millis)
            .single()
            .map(|dt| Self(dt.fixed_offset()))
            .ok_or_else(|| DomainError::InvalidTimestamp(millis.to_string()))
    }

    fn from_naive_utc(naive: NaiveDateTime) -> Self {
        Self(naive.and_utc().fixed_offset())
    }

    pub fn millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn datetime(&self) -> DateTime<FixedOffset> {
        self.0
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }

    /// Signed elapsed minutes from `earlier` to `self`.
    pub fn minutes_since(&self, earlier: &Timestamp) -> f64 {
        (self.millis() - earlier.millis()) as f64 / 60_000.0
    }

    /// Absolute distance in milliseconds.
    pub fn distance_ms(&self, other: &Timestamp) -> u64 {
        self.millis().abs_diff(other.millis())
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Millis(i64),
            FractionalMillis(f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Timestamp::parse(&text),
            Raw::Millis(millis) => Timestamp::from_millis(millis),
            Raw::FractionalMillis(millis) if millis.is_finite() => Timestamp::from_millis(millis.round() as i64),
            Raw::FractionalMillis(millis) => Err(DomainError::InvalidTimestamp(millis.to_string())),
        }
        .map_err(serde::de::Error::custom)
    }
}

/// Side-shaped trade classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

/// Direction-shaped trade classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
    Close,
}

/// Trade classification resolved once at ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeKind {
    Side(Side),
    Direction(Direction),
}

impl std::fmt::Display for TradeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeKind::Side(side) => write!(f, "{side}"),
            TradeKind::Direction(direction) => write!(f, "{direction}"),
        }
    }
}
