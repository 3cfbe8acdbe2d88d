//! JSON exports of the history and of the dashboard summary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::{SentimentSummary, summarize};
use crate::history::{AnalysisRecord, History};

pub const HISTORY_EXPORTED: &str = "History exported successfully!";
pub const BUNDLE_EXPORTED: &str = "Chart data exported successfully!";

/// What to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// The raw history array.
    History,
    /// History plus summary and export time.
    Bundle,
}

impl ExportKind {
    /// Download file name, dated by the UTC day of `now`.
    pub fn file_name(self, now: DateTime<Utc>) -> String {
        let date = now.format("%Y-%m-%d");
        match self {
            Self::History => format!("sentiment-history-{date}.json"),
            Self::Bundle => format!("sentiment-analysis-{date}.json"),
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Self::History => HISTORY_EXPORTED,
            Self::Bundle => BUNDLE_EXPORTED,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Bundle<'a> {
    history: &'a [AnalysisRecord],
    summary: SentimentSummary,
    exported_at: DateTime<Utc>,
}

/// Pretty JSON body for `kind`.
pub fn render(kind: ExportKind, history: &History, now: DateTime<Utc>) -> Result<String> {
    match kind {
        ExportKind::History => history_json(history),
        ExportKind::Bundle => bundle_json(history, now),
    }
}

/// The history as a pretty-printed JSON array, newest first.
pub fn history_json(history: &History) -> Result<String> {
    serde_json::to_string_pretty(history.records()).context("failed to serialize history")
}

/// `{history, summary, exportedAt}` as pretty-printed JSON.
pub fn bundle_json(history: &History, now: DateTime<Utc>) -> Result<String> {
    let bundle = Bundle {
        history: history.records(),
        summary: summarize(history),
        exported_at: now,
    };
    serde_json::to_string_pretty(&bundle).context("failed to serialize export bundle")
}

/// Write an export into `dir`, returning the file written.
pub fn write_export(
    dir: &Path,
    kind: ExportKind,
    history: &History,
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    let body = render(kind, history, now)?;
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(kind.file_name(now));
    fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), records = history.len(), "export written");
    Ok(path)
}
