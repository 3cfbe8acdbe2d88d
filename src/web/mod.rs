//! Embedded web dashboard for sentidash.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page dashboard with text input, result card, chart and history
//! - JSON API endpoints driving the same [`AnalysisWorkflow`] the CLI uses
//!
//! Launched via `sentidash serve` (default: `http://127.0.0.1:9747`).

mod api;
mod frontend;

use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::analyzer::AnalyzerClient;
use crate::history::store::KeyValueStore;
use crate::view::SnapshotRenderer;
use crate::workflow::AnalysisWorkflow;

/// Workflow behind the dashboard; charts are rendered as JSON snapshots.
pub type Dashboard<A, S> = AnalysisWorkflow<A, S, SnapshotRenderer>;

type HttpResponse = Response<Cursor<Vec<u8>>>;

/// A handler's answer before it is turned into a `tiny_http` response.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    /// Offer the body as a download with this file name.
    pub attachment: Option<String>,
}

impl Reply {
    pub fn json(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: JSON,
            body,
            attachment: None,
        }
    }

    pub fn html(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: body.to_string(),
            attachment: None,
        }
    }

    /// JSON `{"error": message}` with the given status.
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }).to_string())
    }

    fn into_response(self) -> Result<HttpResponse> {
        let mut response = Response::from_data(self.body.into_bytes())
            .with_header(header("Content-Type", self.content_type)?)
            .with_status_code(StatusCode(self.status));
        if let Some(name) = self.attachment {
            response = response.with_header(header(
                "Content-Disposition",
                &format!("attachment; filename=\"{name}\""),
            )?);
        }
        Ok(response)
    }
}

const JSON: &str = "application/json; charset=utf-8";

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server on the given address.
///
/// Blocks the current thread. Requests are handled one at a time, so at most
/// one analysis is ever in flight. Errors are reported per request without
/// stopping the server.
pub fn serve<A: AnalyzerClient, S: KeyValueStore>(
    addr: &str,
    dashboard: &mut Dashboard<A, S>,
    open: bool,
) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("sentidash dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if open {
        let url = format!("http://{addr}");
        if let Err(e) = open_browser(&url) {
            tracing::debug!("could not open browser: {e:#}");
        }
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        // Read body up-front for methods that carry one
        let body = if matches!(method, Method::Put | Method::Post) {
            let mut buf = String::new();
            if let Err(e) = request.as_reader().read_to_string(&mut buf) {
                tracing::warn!("failed to read request body: {e}");
            }
            Some(buf)
        } else {
            None
        };

        let reply = match dispatch(dashboard, &method, &url, body.as_deref()) {
            Ok(reply) => reply,
            Err(e) => Reply::error(500, &format!("{e:#}")),
        };
        let status = reply.status;
        match reply.into_response() {
            Ok(response) => {
                if let Err(e) = request.respond(response) {
                    tracing::warn!("failed to send response: {e}");
                }
            }
            Err(e) => tracing::error!("failed to build response: {e:#}"),
        }

        tracing::info!(%method, %url, status, "request");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch<A: AnalyzerClient, S: KeyValueStore>(
    dashboard: &mut Dashboard<A, S>,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Reply> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => {
            Ok(Reply::html(frontend::INDEX_HTML))
        }

        // API: Analysis
        (&Method::Post, "/api/analyze") => api::post_analyze(dashboard, body.unwrap_or("{}")),
        (&Method::Post, "/api/clear") => api::post_clear(dashboard),
        (&Method::Get, "/api/notification") => api::get_notification(dashboard),

        // API: History and aggregates
        (&Method::Get, "/api/history") => api::get_history(dashboard, url),
        (&Method::Get, "/api/summary") => api::get_summary(dashboard),

        // API: Chart
        (&Method::Get, "/api/chart") => api::get_chart(dashboard),
        (&Method::Put, "/api/chart") => api::put_chart(dashboard, body.unwrap_or("{}")),

        // API: Export
        (&Method::Get, "/api/export/history") => {
            api::get_export(dashboard, crate::export::ExportKind::History)
        }
        (&Method::Get, "/api/export/bundle") => {
            api::get_export(dashboard, crate::export::ExportKind::Bundle)
        }

        // API: Health
        (&Method::Get, "/api/health") => api::get_health(dashboard),

        // 404
        _ => Ok(Reply::error(404, "not found")),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Build a header; fails only on non-ASCII input.
fn header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow::anyhow!("invalid header {name}: {value}"))
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalysisResult;
    use crate::history::Sentiment;
    use crate::history::store::{HistoryStore, MemoryStore};
    use crate::notify::Notifier;
    use crate::view::ChartMode;

    struct FixedAnalyzer {
        reply: Option<AnalysisResult>,
    }

    impl AnalyzerClient for FixedAnalyzer {
        fn analyze(&self, text: &str) -> Result<AnalysisResult> {
            let mut result = self
                .reply
                .clone()
                .ok_or_else(|| anyhow::anyhow!("connection refused"))?;
            result.text = text.to_string();
            Ok(result)
        }

        fn is_healthy(&self) -> bool {
            self.reply.is_some()
        }

        fn endpoint(&self) -> String {
            "http://127.0.0.1:5000".to_string()
        }
    }

    fn dashboard(reply: Option<Sentiment>) -> Dashboard<FixedAnalyzer, MemoryStore> {
        let reply = reply.map(|sentiment| AnalysisResult {
            sentiment,
            polarity: 0.6,
            subjectivity: 0.5,
            word_count: 3,
            text: String::new(),
            found_words: Vec::new(),
            analysis_details: None,
        });
        AnalysisWorkflow::new(
            FixedAnalyzer { reply },
            HistoryStore::new(MemoryStore::new(), 100),
            SnapshotRenderer::new(),
            ChartMode::Distribution,
            Notifier::default(),
        )
    }

    fn body_of(reply: &Reply) -> serde_json::Value {
        serde_json::from_str(&reply.body).unwrap()
    }

    #[test]
    fn attachment_reply_converts_to_response() {
        let mut reply = Reply::json(200, "[]".to_string());
        reply.attachment = Some("sentiment-history-2025-01-01.json".to_string());
        let response = reply.into_response().unwrap();
        assert_eq!(response.status_code(), StatusCode(200));
    }

    #[test]
    fn unknown_route_is_404() {
        let mut d = dashboard(None);
        let reply = dispatch(&mut d, &Method::Get, "/api/nope", None).unwrap();
        assert_eq!(reply.status, 404);
        assert_eq!(body_of(&reply)["error"], "not found");
    }

    #[test]
    fn frontend_is_served_at_root() {
        let mut d = dashboard(None);
        let reply = dispatch(&mut d, &Method::Get, "/", None).unwrap();
        assert_eq!(reply.status, 200);
        assert!(reply.content_type.starts_with("text/html"));
        assert!(reply.body.contains("sentidash"));
    }

    #[test]
    fn frontend_offers_example_texts() {
        let mut d = dashboard(None);
        let reply = dispatch(&mut d, &Method::Get, "/", None).unwrap();
        let buttons = reply.body.matches("class=\"example-btn\"").count();
        assert!(buttons >= 3, "expected sample buttons, found {buttons}");
        assert_eq!(buttons, reply.body.matches("data-text=\"").count());
        assert!(reply.body.contains("input.value = e.target.dataset.text"));
    }

    #[test]
    fn query_string_is_ignored_for_routing() {
        let mut d = dashboard(None);
        let reply = dispatch(&mut d, &Method::Get, "/api/summary?x=1", None).unwrap();
        assert_eq!(reply.status, 200);
    }

    #[test]
    fn analyze_then_summary_reflects_record() {
        let mut d = dashboard(Some(Sentiment::Positive));
        let reply = dispatch(
            &mut d,
            &Method::Post,
            "/api/analyze",
            Some(r#"{"text": "I love this"}"#),
        )
        .unwrap();
        assert_eq!(reply.status, 200);

        let reply = dispatch(&mut d, &Method::Get, "/api/summary", None).unwrap();
        let json = body_of(&reply);
        assert_eq!(json["positive"], 1);
        assert_eq!(json["positivePercentage"], 100.0);
    }

    #[test]
    fn blank_text_is_rejected_with_warning() {
        let mut d = dashboard(Some(Sentiment::Positive));
        let reply = dispatch(&mut d, &Method::Post, "/api/analyze", Some(r#"{"text": "  "}"#)).unwrap();
        assert_eq!(reply.status, 400);
        let json = body_of(&reply);
        assert_eq!(json["notification"]["severity"], "warning");
        assert!(json["record"].is_null());
        assert!(d.history().is_empty());
    }

    #[test]
    fn analyzer_failure_is_bad_gateway() {
        let mut d = dashboard(None);
        let reply = dispatch(&mut d, &Method::Post, "/api/analyze", Some(r#"{"text": "hello"}"#)).unwrap();
        assert_eq!(reply.status, 502);
        assert_eq!(
            body_of(&reply)["notification"]["message"],
            "Failed to analyze text. Please check backend connection."
        );
    }

    #[test]
    fn put_chart_switches_mode() {
        let mut d = dashboard(None);
        let reply = dispatch(&mut d, &Method::Put, "/api/chart", Some(r#"{"mode": "timeseries"}"#)).unwrap();
        assert_eq!(reply.status, 200);
        let json = body_of(&reply);
        assert_eq!(json["mode"], "timeseries");
        assert_eq!(json["labels"][0], "No Data");

        let reply = dispatch(&mut d, &Method::Put, "/api/chart", Some(r#"{"mode": "radar"}"#)).unwrap();
        assert_eq!(reply.status, 400);
        assert_eq!(d.view().active_mode(), ChartMode::Timeseries);
    }

    #[test]
    fn history_respects_limit() {
        let mut d = dashboard(Some(Sentiment::Negative));
        for text in ["one", "two", "three"] {
            d.analyze(text);
        }
        let reply = dispatch(&mut d, &Method::Get, "/api/history?limit=2", None).unwrap();
        let json = body_of(&reply);
        assert_eq!(json["total"], 3);
        assert_eq!(json["rows"].as_array().unwrap().len(), 2);
        assert_eq!(json["rows"][0]["text"], "three");
        assert_eq!(json["rows"][0]["sentiment"], "NEGATIVE");
    }

    #[test]
    fn export_is_served_as_attachment() {
        let mut d = dashboard(Some(Sentiment::Neutral));
        d.analyze("plain statement");
        let reply = dispatch(&mut d, &Method::Get, "/api/export/bundle", None).unwrap();

        let name = reply.attachment.clone().unwrap();
        assert!(name.starts_with("sentiment-analysis-"));
        assert_eq!(body_of(&reply)["summary"]["neutral"], 1);
        assert_eq!(
            d.last_notification().unwrap().message,
            "Chart data exported successfully!"
        );
    }

    #[test]
    fn clear_returns_info_notification() {
        let mut d = dashboard(None);
        let reply = dispatch(&mut d, &Method::Post, "/api/clear", Some("")).unwrap();
        assert_eq!(body_of(&reply)["notification"]["message"], "Input cleared");

        let reply = dispatch(&mut d, &Method::Get, "/api/notification", None).unwrap();
        assert_eq!(body_of(&reply)["notification"]["severity"], "info");
    }
}
