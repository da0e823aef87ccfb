use crate::domain::market_data::{Point, Timestamp};
use derive_more::Display;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Value Object - bar spacing of a chart feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, AsRefStr, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sampling {
    #[display(fmt = "intraday")]
    #[strum(serialize = "intraday")]
    Intraday,
    #[display(fmt = "daily")]
    #[strum(serialize = "daily")]
    Daily,
}

impl Sampling {
    /// Spacing above which two adjacent points are drawn as disconnected.
    ///
    /// 5-minute bars never exceed 90 minutes inside a session; daily bars sit
    /// about 1440 minutes apart, so only missing days trip 1500.
    pub fn gap_threshold_minutes(&self) -> f64 {
        match self {
            Sampling::Intraday => 90.0,
            Sampling::Daily => 1500.0,
        }
    }

    pub fn is_intraday(&self) -> bool {
        matches!(self, Sampling::Intraday)
    }
}

/// Line series ready for drawing: four parallel columns of equal length.
///
/// `None` rows are gap sentinels (or missing averages).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderableSeries {
    #[serde(rename = "x")]
    timestamps: Vec<Option<Timestamp>>,
    price: Vec<Option<f64>>,
    fast: Vec<Option<f64>>,
    slow: Vec<Option<f64>>,
}

impl RenderableSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(capacity),
            price: Vec::with_capacity(capacity),
            fast: Vec::with_capacity(capacity),
            slow: Vec::with_capacity(capacity),
        }
    }

    pub fn push_point(&mut self, point: &Point) {
        self.timestamps.push(Some(point.ts));
        self.price.push(point.price);
        self.fast.push(point.fast);
        self.slow.push(point.slow);
    }

    pub fn push_gap(&mut self) {
        self.timestamps.push(None);
        self.price.push(None);
        self.fast.push(None);
        self.slow.push(None);
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[Option<Timestamp>] {
        &self.timestamps
    }

    pub fn price(&self) -> &[Option<f64>] {
        &self.price
    }

    pub fn fast(&self) -> &[Option<f64>] {
        &self.fast
    }

    pub fn slow(&self) -> &[Option<f64>] {
        &self.slow
    }

    /// Rows that carry a real sample rather than a gap sentinel
    pub fn sample_count(&self) -> usize {
        self.timestamps.iter().filter(|ts| ts.is_some()).count()
    }

    pub fn is_gap(&self, index: usize) -> bool {
        matches!(self.timestamps.get(index), Some(None))
    }
}

/// Value Object - marker glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerShape {
    #[display(fmt = "triangle-up")]
    #[strum(serialize = "triangle-up")]
    TriangleUp,
    #[display(fmt = "triangle-down")]
    #[strum(serialize = "triangle-down")]
    TriangleDown,
    #[display(fmt = "circle")]
    #[strum(serialize = "circle")]
    Circle,
}

/// Value Object - marker colour role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    #[display(fmt = "green")]
    Green,
    #[display(fmt = "red")]
    Red,
    #[display(fmt = "accent")]
    Accent,
}

impl MarkerColor {
    pub fn hex(&self) -> &'static str {
        match self {
            MarkerColor::Green => "#16a34a",
            MarkerColor::Red => "#dc2626",
            MarkerColor::Accent => "#7c3aed",
        }
    }
}

/// Trade overlay anchored on the price line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub x: Timestamp,
    pub y: Option<f64>,
    pub shape: MarkerShape,
    pub color: MarkerColor,
}

/// Interval elided from the time axis.
///
/// Serialises to the renderer's range-break objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakRule {
    /// Saturday through Monday
    Weekend,
    /// Hour band `[from, to)` in the feed's wall clock
    Hours { from: u8, to: u8 },
}

impl BreakRule {
    pub const EVENING: BreakRule = BreakRule::Hours { from: 17, to: 24 };
    pub const EARLY_MORNING: BreakRule = BreakRule::Hours { from: 0, to: 8 };
}

impl Serialize for BreakRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BreakRule::Weekend => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("bounds", &["sat", "mon"])?;
                map.end()
            }
            BreakRule::Hours { from, to } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("pattern", "hour")?;
                map.serialize_entry("bounds", &[from, to])?;
                map.end()
            }
        }
    }
}

/// Fixed look of one drawn trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceStyle {
    pub name: &'static str,
    pub color: &'static str,
    pub width: u8,
}

impl TraceStyle {
    pub const PRICE: TraceStyle = TraceStyle { name: "Price", color: "#1f77b4", width: 2 };
    pub const FAST: TraceStyle = TraceStyle { name: "Fast MA", color: "#ff7f0e", width: 1 };
    pub const SLOW: TraceStyle = TraceStyle { name: "Slow MA", color: "#2ca02c", width: 1 };
}
