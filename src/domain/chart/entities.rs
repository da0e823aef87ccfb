use crate::domain::chart::{
    AxisBreakPlanner, BreakRule, Marker, MarkerCorrelator, RenderableSeries, Sampling, SeriesBuilder,
    TraceStyle,
};
use crate::domain::market_data::{FeedSnapshot, LogEvent, SeriesWindow};
use serde::Serialize;

/// Everything the renderer needs for one window. Built fresh per load and
/// never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFrame {
    #[serde(skip)]
    pub window: SeriesWindow,
    pub series: RenderableSeries,
    /// Price, fast and slow traces, in column order
    pub traces: [TraceStyle; 3],
    pub markers: Vec<Marker>,
    pub breaks: Vec<BreakRule>,
    pub logs: Vec<LogEvent>,
}

impl ChartFrame {
    pub fn build(window: SeriesWindow, snapshot: FeedSnapshot, sampling: Sampling) -> Self {
        let series = SeriesBuilder::new(sampling.gap_threshold_minutes()).build(&snapshot.points);
        let markers = MarkerCorrelator::correlate(&snapshot.trades, &series);
        let breaks = AxisBreakPlanner::plan(sampling.is_intraday(), series.sample_count());
        Self {
            window,
            series,
            traces: [TraceStyle::PRICE, TraceStyle::FAST, TraceStyle::SLOW],
            markers,
            breaks,
            logs: snapshot.logs,
        }
    }

    pub fn has_points(&self) -> bool {
        self.series.sample_count() > 0
    }
}

/// Display state of a chart instance
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "frame", rename_all = "snake_case")]
pub enum ChartState {
    /// A load for the live window is in flight and nothing is shown yet
    #[default]
    Loading,
    /// The live window resolved without any price points
    NoData { logs: Vec<LogEvent> },
    Ready(ChartFrame),
}

impl ChartState {
    pub fn from_frame(frame: ChartFrame) -> Self {
        if frame.has_points() {
            ChartState::Ready(frame)
        } else {
            ChartState::NoData { logs: frame.logs }
        }
    }

    pub fn frame(&self) -> Option<&ChartFrame> {
        match self {
            ChartState::Ready(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn logs(&self) -> &[LogEvent] {
        match self {
            ChartState::Loading => &[],
            ChartState::NoData { logs } => logs,
            ChartState::Ready(frame) => &frame.logs,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ChartState::Loading)
    }
}
