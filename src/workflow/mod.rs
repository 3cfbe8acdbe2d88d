//! Analysis workflow: from submitted text to a stored, charted result.
//!
//! The workflow owns the history, its store, the chart view and the
//! notifier. A submission moves `Idle -> Submitting -> Succeeded | Failed`;
//! a new submission is rejected while one is outstanding. Callers with their
//! own transport drive [`AnalysisWorkflow::begin`] and
//! [`AnalysisWorkflow::complete`] directly; everyone else calls
//! [`AnalysisWorkflow::analyze`], which uses the injected analyzer.

pub mod debounce;
pub mod file_input;

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzer::{AnalysisResult, AnalyzerClient};
use crate::history::store::{HistoryStore, KeyValueStore};
use crate::history::{AnalysisRecord, History};
use crate::notify::result::ResultView;
use crate::notify::{Notification, Notifier, Severity};
use crate::view::{ChartMode, Renderer, ViewController};

pub use debounce::TypingDebouncer;
pub use file_input::FileInputError;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text to analyze";
pub const BUSY_MESSAGE: &str = "An analysis is already in progress";
pub const ANALYZER_FAILURE_MESSAGE: &str =
    "Failed to analyze text. Please check backend connection.";
pub const CLEARED_MESSAGE: &str = "Input cleared";

/// Where the workflow is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// An accepted submission awaiting its analyzer outcome.
#[derive(Debug)]
pub struct Submission {
    seq: u64,
    text: String,
}

impl Submission {
    /// Trimmed text to send to the analyzer.
    pub fn text(&self) -> &str {
        &self.text
    }
}

pub struct AnalysisWorkflow<A, S, R: Renderer> {
    analyzer: A,
    store: HistoryStore<S>,
    history: History,
    view: ViewController<R>,
    notifier: Notifier,
    state: WorkflowState,
    last_result: Option<AnalysisRecord>,
    next_seq: u64,
}

impl<A: AnalyzerClient, S: KeyValueStore, R: Renderer> AnalysisWorkflow<A, S, R> {
    /// Load persisted history and mount the chart in `mode`.
    pub fn new(
        analyzer: A,
        store: HistoryStore<S>,
        renderer: R,
        mode: ChartMode,
        notifier: Notifier,
    ) -> Self {
        let history = store.load();
        let view = ViewController::mount(renderer, mode, &history, Utc::now());
        tracing::debug!(records = history.len(), %mode, "workflow ready");
        Self {
            analyzer,
            store,
            history,
            view,
            notifier,
            state: WorkflowState::Idle,
            last_result: None,
            next_seq: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Submission cycle
    // -----------------------------------------------------------------------

    /// Validate `raw` and start a submission.
    ///
    /// Returns `None` (with a warning notification) for blank input or when
    /// another submission is still outstanding.
    pub fn begin(&mut self, raw: &str, now: DateTime<Utc>) -> Option<Submission> {
        let text = raw.trim();
        if text.is_empty() {
            self.notifier.show(Severity::Warning, EMPTY_INPUT_MESSAGE, now);
            return None;
        }
        if self.state == WorkflowState::Submitting {
            self.notifier.show(Severity::Warning, BUSY_MESSAGE, now);
            return None;
        }

        self.state = WorkflowState::Submitting;
        self.next_seq += 1;
        Some(Submission {
            seq: self.next_seq,
            text: text.to_string(),
        })
    }

    /// Apply the analyzer outcome for `submission`.
    ///
    /// On success the record is stored, persisted and charted. On failure
    /// history is left alone. Either way the workflow is ready for the next
    /// submission. Outcomes for a submission that is no longer current are
    /// dropped.
    pub fn complete(
        &mut self,
        submission: Submission,
        outcome: Result<AnalysisResult>,
        now: DateTime<Utc>,
    ) -> Option<&AnalysisRecord> {
        if self.state != WorkflowState::Submitting || submission.seq != self.next_seq {
            tracing::debug!(seq = submission.seq, "dropping stale analysis outcome");
            return None;
        }

        match outcome {
            Ok(result) => {
                let id = self.history.next_id(now);
                let record = AnalysisRecord::from_result(result, now, id);
                let message = format!(
                    "Sentiment: {} detected!",
                    record.sentiment.as_str().to_uppercase()
                );

                let evicted = self.history.push_front(record.clone());
                if !evicted.is_empty() {
                    tracing::debug!(evicted = evicted.len(), "history at capacity");
                }
                self.store.save(&self.history);
                self.view.refresh(&self.history, now);

                self.last_result = Some(record);
                self.state = WorkflowState::Succeeded;
                self.notifier.show(Severity::Success, message, now);
                self.last_result.as_ref()
            }
            Err(e) => {
                tracing::error!(endpoint = %self.analyzer.endpoint(), "analysis failed: {e:#}");
                self.state = WorkflowState::Failed;
                self.notifier.show(Severity::Error, ANALYZER_FAILURE_MESSAGE, now);
                None
            }
        }
    }

    /// Submit `raw` to the analyzer and apply the outcome.
    pub fn analyze(&mut self, raw: &str) -> Option<&AnalysisRecord> {
        let submission = self.begin(raw, Utc::now())?;
        let outcome = self.analyzer.analyze(submission.text());
        self.complete(submission, outcome, Utc::now())
    }

    /// Analyze the whole content of a `.txt`, `.csv` or `.json` file.
    pub fn analyze_file(&mut self, path: &Path) -> Option<&AnalysisRecord> {
        match file_input::read_input(path) {
            Ok(text) => self.analyze(&text),
            Err(e @ FileInputError::Unsupported(_)) => {
                self.notifier.show(Severity::Warning, e.to_string(), Utc::now());
                None
            }
            Err(e @ FileInputError::Unreadable(_)) => {
                self.notifier.show(Severity::Error, e.to_string(), Utc::now());
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // View and display
    // -----------------------------------------------------------------------

    pub fn switch_mode(&mut self, mode: ChartMode) {
        self.view.switch_mode(mode, &self.history, Utc::now());
    }

    /// Drop the displayed result.
    pub fn clear(&mut self) {
        self.last_result = None;
        if self.state != WorkflowState::Submitting {
            self.state = WorkflowState::Idle;
        }
        self.notifier.show(Severity::Info, CLEARED_MESSAGE, Utc::now());
    }

    /// Show an arbitrary notification, e.g. after an export.
    pub fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        self.notifier.show(severity, message, Utc::now());
    }

    /// Notification visible at `now`, if any.
    pub fn notification(&mut self, now: DateTime<Utc>) -> Option<&Notification> {
        self.notifier.current(now)
    }

    /// Most recent notification, expired or not.
    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifier.last()
    }

    pub fn result_view(&self) -> Option<ResultView> {
        self.last_result.as_ref().map(ResultView::from_record)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn view(&self) -> &ViewController<R> {
        &self.view
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn last_result(&self) -> Option<&AnalysisRecord> {
        self.last_result.as_ref()
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    pub fn store(&self) -> &HistoryStore<S> {
        &self.store
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    use super::*;
    use crate::history::Sentiment;
    use crate::history::store::{HISTORY_KEY, MemoryStore};
    use crate::view::SnapshotRenderer;

    struct ScriptedAnalyzer {
        replies: RefCell<VecDeque<Result<AnalysisResult>>>,
        calls: Cell<usize>,
    }

    impl ScriptedAnalyzer {
        fn new(replies: Vec<Result<AnalysisResult>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                calls: Cell::new(0),
            }
        }
    }

    impl AnalyzerClient for ScriptedAnalyzer {
        fn analyze(&self, _text: &str) -> Result<AnalysisResult> {
            self.calls.set(self.calls.get() + 1);
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted reply")))
        }

        fn is_healthy(&self) -> bool {
            true
        }

        fn endpoint(&self) -> String {
            "scripted".to_string()
        }
    }

    fn result(sentiment: &str, text: &str) -> AnalysisResult {
        AnalysisResult {
            sentiment: Sentiment::parse(sentiment),
            polarity: 0.5,
            subjectivity: 0.6,
            word_count: text.split_whitespace().count() as u32,
            text: text.to_string(),
            found_words: Vec::new(),
            analysis_details: None,
        }
    }

    type TestWorkflow = AnalysisWorkflow<ScriptedAnalyzer, MemoryStore, SnapshotRenderer>;

    fn workflow(replies: Vec<Result<AnalysisResult>>) -> TestWorkflow {
        AnalysisWorkflow::new(
            ScriptedAnalyzer::new(replies),
            HistoryStore::new(MemoryStore::new(), 100),
            SnapshotRenderer::new(),
            ChartMode::Distribution,
            Notifier::default(),
        )
    }

    #[test]
    fn blank_input_warns_without_calling_analyzer() {
        let mut wf = workflow(vec![]);
        assert!(wf.analyze("   \n\t ").is_none());

        assert_eq!(wf.analyzer().calls.get(), 0);
        assert!(wf.history().is_empty());
        let note = wf.last_notification().unwrap();
        assert_eq!(note.severity, Severity::Warning);
        assert_eq!(note.message, EMPTY_INPUT_MESSAGE);
        assert_eq!(wf.state(), WorkflowState::Idle);
    }

    #[test]
    fn success_records_persists_and_notifies() {
        let mut wf = workflow(vec![Ok(result("positive", "I love this"))]);
        let record = wf.analyze("  I love this  ").unwrap().clone();

        assert_eq!(record.sentiment, Sentiment::Positive);
        assert_eq!(wf.history().latest(), Some(&record));
        assert_eq!(wf.state(), WorkflowState::Succeeded);
        assert_eq!(
            wf.last_notification().unwrap().message,
            "Sentiment: POSITIVE detected!"
        );
        assert!(wf.store().backend().raw(HISTORY_KEY).is_some());

        let counts = wf.view().chart().unwrap().data().as_counts().unwrap().clone();
        assert_eq!(counts.positive, 1);
    }

    #[test]
    fn failure_leaves_history_untouched() {
        let mut wf = workflow(vec![Err(anyhow::anyhow!("connection refused"))]);
        assert!(wf.analyze("is anyone there?").is_none());

        assert!(wf.history().is_empty());
        assert_eq!(wf.state(), WorkflowState::Failed);
        let note = wf.last_notification().unwrap();
        assert_eq!(note.severity, Severity::Error);
        assert_eq!(note.message, ANALYZER_FAILURE_MESSAGE);
    }

    #[test]
    fn workflow_recovers_after_failure() {
        let mut wf = workflow(vec![
            Err(anyhow::anyhow!("503")),
            Ok(result("negative", "this is awful")),
        ]);
        assert!(wf.analyze("this is awful").is_none());
        assert!(wf.analyze("this is awful").is_some());
        assert_eq!(wf.history().len(), 1);
        assert_eq!(wf.analyzer().calls.get(), 2);
    }

    #[test]
    fn overlapping_submission_is_rejected() {
        let mut wf = workflow(vec![]);
        let now = Utc::now();
        let first = wf.begin("first text", now).unwrap();

        assert!(wf.begin("second text", now).is_none());
        assert_eq!(wf.last_notification().unwrap().message, BUSY_MESSAGE);

        wf.complete(first, Ok(result("neutral", "first text")), now);
        assert_eq!(wf.history().len(), 1);
        assert!(wf.begin("third text", now).is_some());
    }

    #[test]
    fn stale_outcome_is_dropped() {
        let mut wf = workflow(vec![]);
        let now = Utc::now();
        let first = wf.begin("first", now).unwrap();
        wf.complete(first, Err(anyhow::anyhow!("timeout")), now);

        let stale = Submission {
            seq: 1,
            text: "first".to_string(),
        };
        assert!(wf.complete(stale, Ok(result("positive", "first")), now).is_none());
        assert!(wf.history().is_empty());
    }

    #[test]
    fn submission_text_is_trimmed() {
        let mut wf = workflow(vec![]);
        let submission = wf.begin("\n  hello world  \n", Utc::now()).unwrap();
        assert_eq!(submission.text(), "hello world");
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut wf = workflow(vec![]);
        let now = Utc::now();
        for _ in 0..3 {
            let s = wf.begin("same instant", now).unwrap();
            wf.complete(s, Ok(result("neutral", "same instant")), now);
        }
        let mut ids: Vec<i64> = wf.history().iter().map(|r| r.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn unsupported_file_warns() {
        let mut wf = workflow(vec![]);
        assert!(wf.analyze_file(Path::new("slides.pptx")).is_none());
        assert_eq!(wf.last_notification().unwrap().severity, Severity::Warning);
        assert_eq!(wf.analyzer().calls.get(), 0);
    }

    #[test]
    fn unreadable_file_reports_error() {
        let mut wf = workflow(vec![]);
        assert!(wf.analyze_file(Path::new("/nonexistent/sentidash/notes.txt")).is_none());
        assert_eq!(wf.last_notification().unwrap().severity, Severity::Error);
        assert!(wf.history().is_empty());
    }

    #[test]
    fn clear_drops_result_and_informs() {
        let mut wf = workflow(vec![Ok(result("positive", "nice"))]);
        wf.analyze("nice");
        wf.clear();

        assert!(wf.last_result().is_none());
        assert!(wf.result_view().is_none());
        assert_eq!(wf.history().len(), 1);
        let note = wf.last_notification().unwrap();
        assert_eq!(note.severity, Severity::Info);
        assert_eq!(note.message, CLEARED_MESSAGE);
    }

    #[test]
    fn switch_mode_reseeds_from_history() {
        let mut wf = workflow(vec![Ok(result("positive", "sunny day"))]);
        wf.analyze("sunny day");
        wf.switch_mode(ChartMode::Timeseries);

        assert_eq!(wf.view().active_mode(), ChartMode::Timeseries);
        let timeline = wf.view().chart().unwrap().data().as_timeline().unwrap().clone();
        assert_eq!(timeline.buckets.len(), 24);
        assert_eq!(timeline.buckets[23].positive, 1);
    }
}
