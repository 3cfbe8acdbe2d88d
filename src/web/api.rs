//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a [`Reply`]
//! with JSON content.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analytics::summarize;
use crate::analyzer::AnalyzerClient;
use crate::export::{self, ExportKind};
use crate::history::store::KeyValueStore;
use crate::history::{AnalysisRecord, MAX_HISTORY};
use crate::notify::result::{HISTORY_ROWS, HistoryRow, ResultView, history_rows};
use crate::notify::{Notification, Severity};
use crate::view::ChartMode;
use crate::workflow::WorkflowState;

use super::{Dashboard, Reply};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// `POST /api/analyze` body.
#[derive(Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    text: String,
}

/// `PUT /api/chart` body.
#[derive(Deserialize)]
struct ChartRequest {
    mode: String,
}

#[derive(Serialize)]
struct AnalyzeResponse<'a> {
    record: Option<AnalysisRecord>,
    result: Option<ResultView>,
    notification: Option<&'a Notification>,
}

#[derive(Serialize)]
struct HistoryResponse {
    total: usize,
    capacity: usize,
    rows: Vec<HistoryRow>,
}

#[derive(Serialize)]
struct NotificationResponse<'a> {
    notification: Option<&'a Notification>,
}

#[derive(Serialize)]
struct HealthResponse {
    analyzer: String,
    analyzer_reachable: bool,
    records: usize,
    capacity: usize,
    chart_mode: ChartMode,
    state: WorkflowState,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success reply.
fn json_reply<T: Serialize>(data: &T) -> Result<Reply> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Reply::json(200, body))
}

/// Parse the `?limit=N` query parameter from a URL.
fn parse_limit_param(url: &str) -> Option<usize> {
    url.split('?').nth(1)?.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        if k == "limit" { v.parse().ok() } else { None }
    })
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `POST /api/analyze`: analyze `{"text": ...}`.
///
/// 200 with the new record on success, 400 for rejected input, 502 when the
/// analyzer failed. The notification is included in every case.
pub fn post_analyze<A: AnalyzerClient, S: KeyValueStore>(
    dashboard: &mut Dashboard<A, S>,
    body: &str,
) -> Result<Reply> {
    let req: AnalyzeRequest = match serde_json::from_str(body) {
        Ok(req) => req,
        Err(e) => return Ok(Reply::error(400, &format!("invalid analyze request: {e}"))),
    };

    let record = dashboard.analyze(&req.text).cloned();
    let result = record.as_ref().map(ResultView::from_record);
    let notification = dashboard.last_notification();
    let status = match (&record, notification.map(|n| n.severity)) {
        (Some(_), _) => 200,
        (None, Some(Severity::Error)) => 502,
        (None, _) => 400,
    };

    let resp = AnalyzeResponse {
        record,
        result,
        notification,
    };
    let body = serde_json::to_string(&resp).context("failed to serialize JSON response")?;
    Ok(Reply::json(status, body))
}

/// `POST /api/clear`: drop the displayed result.
pub fn post_clear<A: AnalyzerClient, S: KeyValueStore>(
    dashboard: &mut Dashboard<A, S>,
) -> Result<Reply> {
    dashboard.clear();
    json_reply(&NotificationResponse {
        notification: dashboard.last_notification(),
    })
}

/// `GET /api/notification`: the notification currently on screen.
pub fn get_notification<A: AnalyzerClient, S: KeyValueStore>(
    dashboard: &mut Dashboard<A, S>,
) -> Result<Reply> {
    json_reply(&NotificationResponse {
        notification: dashboard.notification(Utc::now()),
    })
}

/// `GET /api/history?limit=N`: newest history rows (default 10).
pub fn get_history<A: AnalyzerClient, S: KeyValueStore>(
    dashboard: &Dashboard<A, S>,
    url: &str,
) -> Result<Reply> {
    let limit = parse_limit_param(url)
        .unwrap_or(HISTORY_ROWS)
        .min(MAX_HISTORY);
    let history = dashboard.history();

    json_reply(&HistoryResponse {
        total: history.len(),
        capacity: history.capacity(),
        rows: history_rows(history, limit),
    })
}

/// `GET /api/summary`: channel counts and percentages.
pub fn get_summary<A: AnalyzerClient, S: KeyValueStore>(
    dashboard: &Dashboard<A, S>,
) -> Result<Reply> {
    json_reply(&summarize(dashboard.history()))
}

/// `GET /api/chart`: snapshot of the live chart.
pub fn get_chart<A: AnalyzerClient, S: KeyValueStore>(
    dashboard: &Dashboard<A, S>,
) -> Result<Reply> {
    Ok(Reply::json(200, dashboard.view().render()))
}

/// `PUT /api/chart`: switch chart mode.
///
/// Expects JSON body: `{ "mode": "timeseries" }`
pub fn put_chart<A: AnalyzerClient, S: KeyValueStore>(
    dashboard: &mut Dashboard<A, S>,
    body: &str,
) -> Result<Reply> {
    let req: ChartRequest = match serde_json::from_str(body) {
        Ok(req) => req,
        Err(e) => return Ok(Reply::error(400, &format!("invalid chart request: {e}"))),
    };
    let Some(mode) = ChartMode::parse(&req.mode) else {
        return Ok(Reply::error(400, &format!("unknown chart mode: {}", req.mode)));
    };

    dashboard.switch_mode(mode);
    get_chart(dashboard)
}

/// `GET /api/export/{history,bundle}`: download an export.
pub fn get_export<A: AnalyzerClient, S: KeyValueStore>(
    dashboard: &mut Dashboard<A, S>,
    kind: ExportKind,
) -> Result<Reply> {
    let now = Utc::now();
    let body = export::render(kind, dashboard.history(), now)?;
    dashboard.notify(Severity::Success, kind.success_message());

    let mut reply = Reply::json(200, body);
    reply.attachment = Some(kind.file_name(now));
    Ok(reply)
}

/// `GET /api/health`: analyzer reachability and dashboard state.
pub fn get_health<A: AnalyzerClient, S: KeyValueStore>(
    dashboard: &Dashboard<A, S>,
) -> Result<Reply> {
    let history = dashboard.history();
    json_reply(&HealthResponse {
        analyzer: dashboard.analyzer().endpoint(),
        analyzer_reachable: dashboard.analyzer().is_healthy(),
        records: history.len(),
        capacity: history.capacity(),
        chart_mode: dashboard.view().active_mode(),
        state: dashboard.state(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
