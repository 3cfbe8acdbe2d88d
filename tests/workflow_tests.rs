/// End-to-end workflow tests.
///
/// Drives `AnalysisWorkflow` with a scripted analyzer, an in-memory store and
/// a renderer that tracks how many charts are alive, and checks what reaches
/// history, storage, the chart and the notification area.
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::Result;

use sentidash::analyzer::{AnalysisResult, AnalyzerClient};
use sentidash::history::store::{FileStore, HISTORY_KEY, HistoryStore, MemoryStore};
use sentidash::history::{MAX_HISTORY, Sentiment};
use sentidash::notify::{Notifier, Severity};
use sentidash::view::{Chart, ChartData, ChartMode, Renderer};
use sentidash::workflow::{AnalysisWorkflow, WorkflowState};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Replies from a script; falls back to echoing a neutral result.
#[derive(Default)]
struct ScriptedAnalyzer {
    script: RefCell<VecDeque<Result<AnalysisResult>>>,
    calls: Rc<Cell<usize>>,
}

impl ScriptedAnalyzer {
    fn replying(replies: Vec<Result<AnalysisResult>>) -> Self {
        Self {
            script: RefCell::new(replies.into()),
            calls: Rc::new(Cell::new(0)),
        }
    }
}

impl AnalyzerClient for ScriptedAnalyzer {
    fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        self.calls.set(self.calls.get() + 1);
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(reply(Sentiment::Neutral, text)))
    }

    fn is_healthy(&self) -> bool {
        true
    }

    fn endpoint(&self) -> String {
        "scripted".to_string()
    }
}

fn reply(sentiment: Sentiment, text: &str) -> AnalysisResult {
    AnalysisResult {
        sentiment,
        polarity: 0.5,
        subjectivity: 0.75,
        word_count: text.split_whitespace().count() as u32,
        text: text.to_string(),
        found_words: Vec::new(),
        analysis_details: None,
    }
}

#[derive(Default)]
struct Surface {
    live: usize,
    max_live: usize,
    created: usize,
}

/// Renderer that records live chart counts on a shared surface.
struct TrackingRenderer(Rc<RefCell<Surface>>);

struct TrackedChart {
    mode: ChartMode,
    data: ChartData,
    surface: Rc<RefCell<Surface>>,
}

impl Renderer for TrackingRenderer {
    fn create(&mut self, mode: ChartMode, data: ChartData) -> Box<dyn Chart> {
        let mut s = self.0.borrow_mut();
        s.live += 1;
        s.created += 1;
        s.max_live = s.max_live.max(s.live);
        Box::new(TrackedChart {
            mode,
            data,
            surface: Rc::clone(&self.0),
        })
    }
}

impl Chart for TrackedChart {
    fn mode(&self) -> ChartMode {
        self.mode
    }

    fn data(&self) -> &ChartData {
        &self.data
    }

    fn update(&mut self, data: ChartData) {
        self.data = data;
    }

    fn render(&self) -> String {
        format!("{} chart", self.mode)
    }

    fn destroy(self: Box<Self>) {
        self.surface.borrow_mut().live -= 1;
    }
}

type TestWorkflow = AnalysisWorkflow<ScriptedAnalyzer, MemoryStore, TrackingRenderer>;

fn workflow_with(
    analyzer: ScriptedAnalyzer,
    store: MemoryStore,
) -> (TestWorkflow, Rc<RefCell<Surface>>) {
    let surface = Rc::new(RefCell::new(Surface::default()));
    let wf = AnalysisWorkflow::new(
        analyzer,
        HistoryStore::new(store, MAX_HISTORY),
        TrackingRenderer(Rc::clone(&surface)),
        ChartMode::Distribution,
        Notifier::default(),
    );
    (wf, surface)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn empty_input_never_reaches_the_analyzer() {
    let analyzer = ScriptedAnalyzer::default();
    let calls = Rc::clone(&analyzer.calls);
    let (mut wf, _) = workflow_with(analyzer, MemoryStore::new());

    for input in ["", "   ", "\n\t"] {
        assert!(wf.analyze(input).is_none());
    }

    assert_eq!(calls.get(), 0);
    assert!(wf.history().is_empty());
    assert!(wf.store().backend().raw(HISTORY_KEY).is_none());
    let note = wf.last_notification().unwrap();
    assert_eq!(note.severity, Severity::Warning);
    assert_eq!(note.message, "Please enter some text to analyze");
}

// ---------------------------------------------------------------------------
// Success path
// ---------------------------------------------------------------------------

#[test]
fn positive_result_lands_everywhere() {
    let analyzer = ScriptedAnalyzer::replying(vec![Ok(reply(Sentiment::Positive, "I love this"))]);
    let (mut wf, surface) = workflow_with(analyzer, MemoryStore::new());

    let before = wf
        .view()
        .chart()
        .and_then(|c| c.data().as_counts().cloned())
        .unwrap();

    wf.analyze("I love this").unwrap();

    let first = &wf.history().records()[0];
    assert_eq!(first.sentiment, Sentiment::Positive);
    assert_eq!(first.text, "I love this");

    let note = wf.last_notification().unwrap();
    assert_eq!(note.severity, Severity::Success);
    assert!(note.message.contains("POSITIVE"));

    let after = wf
        .view()
        .chart()
        .and_then(|c| c.data().as_counts().cloned())
        .unwrap();
    assert_eq!(after.positive, before.positive + 1);
    assert_eq!(surface.borrow().created, 1, "refresh must not rebuild the chart");

    let view = wf.result_view().unwrap();
    assert_eq!(view.label, "Positive");
    assert_eq!(view.polarity_pct, 75.0);
    assert_eq!(wf.state(), WorkflowState::Succeeded);
}

#[test]
fn slight_results_are_charted_in_their_direction() {
    let analyzer = ScriptedAnalyzer::replying(vec![
        Ok(reply(Sentiment::SlightlyPositive, "not bad")),
        Ok(reply(Sentiment::Negative, "awful")),
    ]);
    let (mut wf, _) = workflow_with(analyzer, MemoryStore::new());
    wf.analyze("not bad");
    wf.analyze("awful");

    assert_eq!(
        wf.last_notification().unwrap().message,
        "Sentiment: NEGATIVE detected!"
    );
    let counts = wf.view().chart().unwrap().data().as_counts().unwrap().clone();
    assert_eq!(counts.total, 2);
    assert_eq!(counts.counted(), 2);
    assert_eq!(counts.positive, 1);
    assert_eq!(counts.negative_percentage, 50.0);
}

// ---------------------------------------------------------------------------
// Failure path
// ---------------------------------------------------------------------------

#[test]
fn analyzer_failure_keeps_history_and_storage() {
    let analyzer = ScriptedAnalyzer::replying(vec![
        Ok(reply(Sentiment::Positive, "first")),
        Err(anyhow::anyhow!("HTTP 500")),
    ]);
    let (mut wf, _) = workflow_with(analyzer, MemoryStore::new());
    wf.analyze("first");
    let snapshot = wf.store().backend().raw(HISTORY_KEY).map(str::to_string);

    assert!(wf.analyze("second").is_none());

    assert_eq!(wf.history().len(), 1);
    assert_eq!(wf.store().backend().raw(HISTORY_KEY).map(str::to_string), snapshot);
    let note = wf.last_notification().unwrap();
    assert_eq!(note.severity, Severity::Error);
    assert_eq!(note.message, "Failed to analyze text. Please check backend connection.");
    assert_eq!(wf.state(), WorkflowState::Failed);
}

#[test]
fn storage_write_failure_is_not_fatal() {
    let mut store = MemoryStore::new();
    store.fail_writes = true;
    let (mut wf, _) = workflow_with(ScriptedAnalyzer::default(), store);

    assert!(wf.analyze("still works").is_some());
    assert_eq!(wf.history().len(), 1);
    assert_eq!(wf.last_notification().unwrap().severity, Severity::Success);
}

// ---------------------------------------------------------------------------
// Capacity
// ---------------------------------------------------------------------------

#[test]
fn hundred_and_first_success_evicts_the_oldest() {
    let (mut wf, _) = workflow_with(ScriptedAnalyzer::default(), MemoryStore::new());

    for i in 0..=MAX_HISTORY {
        wf.analyze(&format!("entry {i}")).unwrap();
        assert!(wf.history().len() <= MAX_HISTORY);
    }

    let history = wf.history();
    assert_eq!(history.len(), MAX_HISTORY);
    assert_eq!(history.latest().unwrap().text, format!("entry {MAX_HISTORY}"));
    assert_eq!(history.records().last().unwrap().text, "entry 1");
    assert!(history.iter().all(|r| r.text != "entry 0"));
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

#[test]
fn mode_cycle_leaves_exactly_one_live_chart() {
    let (mut wf, surface) = workflow_with(ScriptedAnalyzer::default(), MemoryStore::new());
    wf.analyze("something to chart");

    for mode in [ChartMode::Distribution, ChartMode::Bar, ChartMode::Timeseries] {
        wf.switch_mode(mode);
        assert_eq!(surface.borrow().live, 1);
    }

    let s = surface.borrow();
    assert_eq!(s.max_live, 1);
    assert_eq!(s.created, 4);
    assert_eq!(wf.view().active_mode(), ChartMode::Timeseries);
    assert_eq!(wf.view().render(), "timeseries chart");
}

#[test]
fn dropping_the_workflow_disposes_the_chart() {
    let (wf, surface) = workflow_with(ScriptedAnalyzer::default(), MemoryStore::new());
    assert_eq!(surface.borrow().live, 1);
    drop(wf);
    assert_eq!(surface.borrow().live, 0);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn history_survives_a_restart() {
    let (mut wf, _) = workflow_with(ScriptedAnalyzer::default(), MemoryStore::new());
    for text in ["alpha", "beta", "gamma"] {
        wf.analyze(text);
    }
    let saved = wf.history().clone();
    let store = wf.store().backend().clone();
    drop(wf);

    let (restarted, _) = workflow_with(ScriptedAnalyzer::default(), store);
    assert_eq!(restarted.history(), &saved);
    let counts = restarted.view().chart().unwrap().data().as_counts().unwrap().clone();
    assert_eq!(counts.neutral, 3);
}

#[test]
fn file_store_persists_between_workflows() {
    let dir = std::env::temp_dir().join(format!("sentidash-wf-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    {
        let mut wf = AnalysisWorkflow::new(
            ScriptedAnalyzer::default(),
            HistoryStore::new(FileStore::new(&dir), MAX_HISTORY),
            TrackingRenderer(Rc::new(RefCell::new(Surface::default()))),
            ChartMode::Bar,
            Notifier::default(),
        );
        wf.analyze("written to disk").unwrap();
    }

    assert!(dir.join("sentimentHistory.json").exists());
    let history = HistoryStore::new(FileStore::new(&dir), MAX_HISTORY).load();
    assert_eq!(history.len(), 1);
    assert_eq!(history.latest().unwrap().text, "written to disk");

    let _ = std::fs::remove_dir_all(&dir);
}
