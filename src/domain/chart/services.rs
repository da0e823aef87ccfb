use crate::domain::chart::{BreakRule, Marker, MarkerColor, MarkerShape, RenderableSeries};
use crate::domain::market_data::{Direction, Point, Side, TradeEvent, TradeKind};

/// Sentinel rows inserted per gap. A single null is bridged by renderers
/// drawing with connected gaps; two keep the break visible.
pub const GAP_SENTINELS: usize = 2;

/// Turns an ordered point list into parallel line columns with gap breaks
#[derive(Debug, Clone, Copy)]
pub struct SeriesBuilder {
    gap_threshold_minutes: f64,
}

impl SeriesBuilder {
    pub fn new(gap_threshold_minutes: f64) -> Self {
        Self { gap_threshold_minutes }
    }

    pub fn gap_threshold_minutes(&self) -> f64 {
        self.gap_threshold_minutes
    }

    pub fn build(&self, points: &[Point]) -> RenderableSeries {
        let mut series = RenderableSeries::with_capacity(points.len());
        let mut previous: Option<&Point> = None;

        for point in points {
            if let Some(prev) = previous {
                if point.ts.minutes_since(&prev.ts) > self.gap_threshold_minutes {
                    for _ in 0..GAP_SENTINELS {
                        series.push_gap();
                    }
                }
            }
            series.push_point(point);
            previous = Some(point);
        }

        series
    }
}

/// Chooses which time intervals the axis elides
pub struct AxisBreakPlanner;

impl AxisBreakPlanner {
    /// Fewest real samples for which the overnight bands are kept
    pub const MIN_SAMPLES_FOR_HOUR_BREAKS: usize = 3;

    pub fn plan(is_intraday: bool, sample_count: usize) -> Vec<BreakRule> {
        let mut rules = vec![BreakRule::Weekend];
        if is_intraday && sample_count >= Self::MIN_SAMPLES_FOR_HOUR_BREAKS {
            rules.push(BreakRule::EVENING);
            rules.push(BreakRule::EARLY_MORNING);
        }
        rules
    }
}

/// Anchors trade events on the nearest sampled price
pub struct MarkerCorrelator;

impl MarkerCorrelator {
    pub fn correlate(trades: &[TradeEvent], series: &RenderableSeries) -> Vec<Marker> {
        if series.sample_count() == 0 {
            return Vec::new();
        }

        trades
            .iter()
            .filter_map(|trade| {
                let index = Self::nearest_index(series, trade)?;
                let (shape, color) = Self::encoding(trade.kind);
                Some(Marker { x: trade.ts, y: series.price()[index], shape, color })
            })
            .collect()
    }

    /// First row with the smallest absolute time distance; gap rows are skipped.
    // No distance cutoff: a trade outside the window lands on the edge point.
    fn nearest_index(series: &RenderableSeries, trade: &TradeEvent) -> Option<usize> {
        let mut best: Option<(usize, u64)> = None;
        for (index, ts) in series.timestamps().iter().enumerate() {
            let Some(ts) = ts else { continue };
            let distance = ts.distance_ms(&trade.ts);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((index, distance)),
            }
        }
        best.map(|(index, _)| index)
    }

    pub fn encoding(kind: TradeKind) -> (MarkerShape, MarkerColor) {
        match kind {
            TradeKind::Side(Side::Buy) => (MarkerShape::TriangleUp, MarkerColor::Green),
            TradeKind::Side(Side::Sell) => (MarkerShape::TriangleDown, MarkerColor::Red),
            TradeKind::Direction(Direction::Long) => (MarkerShape::TriangleUp, MarkerColor::Green),
            TradeKind::Direction(Direction::Short) => (MarkerShape::TriangleDown, MarkerColor::Red),
            TradeKind::Direction(Direction::Close) => (MarkerShape::Circle, MarkerColor::Accent),
        }
    }
}
