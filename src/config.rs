use crate::domain::chart::Sampling;
use crate::domain::errors::{DomainError, DomainResult};
use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://dashboard-api-422591363136.us-central1.run.app";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Dashboard-wide settings, loadable from a JSON blob
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub reference_timezone: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            reference_timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn timezone(&self) -> DomainResult<Tz> {
        self.reference_timezone
            .parse::<Tz>()
            .map_err(|_| DomainError::InvalidTimezone(self.reference_timezone.clone()))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Per-chart settings sharing this dashboard's clock and poll cadence
    pub fn chart(&self, sampling: Sampling, days: u32) -> DomainResult<ChartConfig> {
        Ok(ChartConfig {
            sampling,
            days,
            poll_interval: self.poll_interval(),
            timezone: self.timezone()?,
        })
    }
}

/// Settings of one chart instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartConfig {
    pub sampling: Sampling,
    /// Look-back in calendar days sent to the backend
    pub days: u32,
    pub poll_interval: Duration,
    pub timezone: Tz,
}

impl ChartConfig {
    /// Today's session in 5-minute bars
    pub fn intraday() -> Self {
        Self {
            sampling: Sampling::Intraday,
            days: 1,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            timezone: chrono_tz::America::New_York,
        }
    }

    /// Daily bars over the last `days` calendar days
    pub fn daily(days: u32) -> Self {
        Self { sampling: Sampling::Daily, days, ..Self::intraday() }
    }

    pub fn gap_threshold_minutes(&self) -> f64 {
        self.sampling.gap_threshold_minutes()
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::intraday()
    }
}
