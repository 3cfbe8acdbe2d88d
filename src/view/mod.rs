//! Chart view state.
//!
//! [`ViewController`] is a small state machine over [`ChartMode`] that owns
//! the one live chart. Switching modes destroys the current chart before the
//! renderer builds the next, so two charts never coexist. New analyses go
//! through [`ViewController::refresh`], which updates the live chart in place.

pub mod chart;
pub mod snapshot;
pub mod terminal;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::history::History;

pub use chart::{Chart, ChartData, Renderer};
pub use snapshot::SnapshotRenderer;
pub use terminal::TerminalRenderer;

// ---------------------------------------------------------------------------
// Chart mode
// ---------------------------------------------------------------------------

/// Presentation of the history chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    /// Share of each sentiment.
    #[default]
    Distribution,
    /// One bar per sentiment.
    Bar,
    /// Hourly counts over the last 24 hours.
    Timeseries,
}

impl ChartMode {
    pub const ALL: [ChartMode; 3] = [Self::Distribution, Self::Bar, Self::Timeseries];

    /// Parse a mode name. Accepts a few common aliases.
    pub fn parse(val: &str) -> Option<Self> {
        match val.trim().to_ascii_lowercase().as_str() {
            "distribution" | "doughnut" | "pie" => Some(Self::Distribution),
            "bar" | "bars" => Some(Self::Bar),
            "timeseries" | "time-series" | "time_series" | "line" => Some(Self::Timeseries),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Distribution => "distribution",
            Self::Bar => "bar",
            Self::Timeseries => "timeseries",
        }
    }
}

impl fmt::Display for ChartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the active chart mode and the single live chart.
pub struct ViewController<R: Renderer> {
    renderer: R,
    active: ChartMode,
    chart: Option<Box<dyn Chart>>,
}

impl<R: Renderer> ViewController<R> {
    /// Build the first chart for `mode` from the current history.
    pub fn mount(renderer: R, mode: ChartMode, history: &History, now: DateTime<Utc>) -> Self {
        let mut controller = Self {
            renderer,
            active: mode,
            chart: None,
        };
        controller.switch_mode(mode, history, now);
        controller
    }

    /// Tear down the live chart and build one for `target`.
    ///
    /// Switching to the already-active mode rebuilds it.
    pub fn switch_mode(&mut self, target: ChartMode, history: &History, now: DateTime<Utc>) {
        if let Some(previous) = self.chart.take() {
            previous.destroy();
        }

        let data = ChartData::for_mode(target, history, now);
        self.chart = Some(self.renderer.create(target, data));
        self.active = target;
        tracing::debug!(mode = %target, "chart mode switched");
    }

    /// Push fresh aggregates for the active mode into the live chart.
    pub fn refresh(&mut self, history: &History, now: DateTime<Utc>) {
        let data = ChartData::for_mode(self.active, history, now);
        if let Some(chart) = self.chart.as_mut() {
            chart.update(data);
            return;
        }
        self.chart = Some(self.renderer.create(self.active, data));
    }

    pub fn active_mode(&self) -> ChartMode {
        self.active
    }

    pub fn chart(&self) -> Option<&dyn Chart> {
        self.chart.as_deref()
    }

    /// Draw the live chart, or an empty string if none is mounted.
    pub fn render(&self) -> String {
        self.chart.as_ref().map(|c| c.render()).unwrap_or_default()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<R: Renderer> Drop for ViewController<R> {
    fn drop(&mut self) {
        if let Some(chart) = self.chart.take() {
            chart.destroy();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::history::{AnalysisRecord, Sentiment};

    #[derive(Default)]
    struct Surface {
        live: usize,
        created: Vec<ChartMode>,
        destroyed: Vec<ChartMode>,
        updates: usize,
    }

    struct CountingRenderer(Rc<RefCell<Surface>>);

    struct CountingChart {
        mode: ChartMode,
        data: ChartData,
        surface: Rc<RefCell<Surface>>,
    }

    impl Renderer for CountingRenderer {
        fn create(&mut self, mode: ChartMode, data: ChartData) -> Box<dyn Chart> {
            let mut surface = self.0.borrow_mut();
            assert_eq!(surface.live, 0, "surface already holds a chart");
            surface.live += 1;
            surface.created.push(mode);
            Box::new(CountingChart {
                mode,
                data,
                surface: Rc::clone(&self.0),
            })
        }
    }

    impl Chart for CountingChart {
        fn mode(&self) -> ChartMode {
            self.mode
        }
        fn data(&self) -> &ChartData {
            &self.data
        }
        fn update(&mut self, data: ChartData) {
            self.surface.borrow_mut().updates += 1;
            self.data = data;
        }
        fn render(&self) -> String {
            self.mode.to_string()
        }
        fn destroy(self: Box<Self>) {
            let mut surface = self.surface.borrow_mut();
            surface.live -= 1;
            surface.destroyed.push(self.mode);
        }
    }

    fn positive_record(id: i64) -> AnalysisRecord {
        AnalysisRecord {
            text: "great".to_string(),
            sentiment: Sentiment::Positive,
            polarity: 0.8,
            subjectivity: 0.7,
            word_count: 1,
            timestamp: Utc::now(),
            id,
            found_words: Vec::new(),
            analysis_details: None,
        }
    }

    fn controller() -> (ViewController<CountingRenderer>, Rc<RefCell<Surface>>) {
        let surface = Rc::new(RefCell::new(Surface::default()));
        let view = ViewController::mount(
            CountingRenderer(Rc::clone(&surface)),
            ChartMode::default(),
            &History::default(),
            Utc::now(),
        );
        (view, surface)
    }

    #[test]
    fn mount_starts_in_distribution_with_one_chart() {
        let (view, surface) = controller();
        assert_eq!(view.active_mode(), ChartMode::Distribution);
        assert_eq!(surface.borrow().live, 1);
        assert_eq!(view.chart().unwrap().mode(), ChartMode::Distribution);
    }

    #[test]
    fn switching_modes_keeps_exactly_one_live_chart() {
        let (mut view, surface) = controller();
        let history = History::default();

        view.switch_mode(ChartMode::Bar, &history, Utc::now());
        view.switch_mode(ChartMode::Timeseries, &history, Utc::now());

        let s = surface.borrow();
        assert_eq!(s.live, 1);
        assert_eq!(s.created, vec![ChartMode::Distribution, ChartMode::Bar, ChartMode::Timeseries]);
        assert_eq!(s.destroyed, vec![ChartMode::Distribution, ChartMode::Bar]);
        assert_eq!(view.active_mode(), ChartMode::Timeseries);
    }

    #[test]
    fn switching_to_same_mode_rebuilds() {
        let (mut view, surface) = controller();
        view.switch_mode(ChartMode::Distribution, &History::default(), Utc::now());
        assert_eq!(surface.borrow().created.len(), 2);
        assert_eq!(surface.borrow().live, 1);
    }

    #[test]
    fn refresh_updates_in_place() {
        let (mut view, surface) = controller();
        let mut history = History::default();
        history.push_front(positive_record(1));

        view.refresh(&history, Utc::now());

        assert_eq!(surface.borrow().created.len(), 1);
        assert_eq!(surface.borrow().updates, 1);
        let counts = view.chart().unwrap().data().as_counts().unwrap().clone();
        assert_eq!(counts.positive, 1);
    }

    #[test]
    fn refresh_in_timeseries_mode_pushes_buckets() {
        let (mut view, _surface) = controller();
        let mut history = History::default();
        history.push_front(positive_record(1));
        view.switch_mode(ChartMode::Timeseries, &history, Utc::now());
        history.push_front(positive_record(2));

        view.refresh(&history, Utc::now());

        let timeline = view.chart().unwrap().data().as_timeline().unwrap().clone();
        assert_eq!(timeline.buckets.len(), 24);
        assert_eq!(timeline.buckets[23].positive, 2);
    }

    #[test]
    fn dropping_controller_destroys_chart() {
        let (view, surface) = controller();
        drop(view);
        assert_eq!(surface.borrow().live, 0);
    }

    #[test]
    fn chart_mode_parses_aliases() {
        assert_eq!(ChartMode::parse("doughnut"), Some(ChartMode::Distribution));
        assert_eq!(ChartMode::parse("BAR"), Some(ChartMode::Bar));
        assert_eq!(ChartMode::parse("time-series"), Some(ChartMode::Timeseries));
        assert_eq!(ChartMode::parse("radar"), None);
    }
}
