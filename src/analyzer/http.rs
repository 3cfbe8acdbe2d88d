/// HTTP client for the remote sentiment analyzer.
///
/// Talks to the analyzer service with the synchronous `ureq` client:
///
/// - **Analyze**: `POST /api/analyze` with `{"text": ...}`.
/// - **Health**: `GET /api/health`.
///
/// `ureq` reports any non-2xx status as an error, so every failure mode
/// (connection refused, timeout, 4xx/5xx, bad JSON) surfaces as `Err`.
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use super::{AnalysisResult, AnalyzerClient};
use crate::config::schema::AnalyzerConfig;

/// Request body for `POST /api/analyze`.
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

/// Short timeout for the health probe so diagnostics never stall.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// Synchronous analyzer client.
#[derive(Debug, Clone)]
pub struct HttpAnalyzer {
    base_url: String,
    timeout: Duration,
}

impl HttpAnalyzer {
    /// Build a client from the resolved config.
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(&config.url, Duration::from_millis(config.timeout_ms))
    }

    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn url(&self, path: &str) -> String {
        // "localhost" may resolve to ::1 first while the analyzer only binds IPv4.
        format!("{}{}", self.base_url, path).replace("://localhost", "://127.0.0.1")
    }
}

impl AnalyzerClient for HttpAnalyzer {
    fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        let url = self.url("/api/analyze");
        tracing::debug!(%url, chars = text.len(), "submitting text for analysis");

        let resp = ureq::post(&url)
            .timeout(self.timeout)
            .send_json(&AnalyzeRequest { text })
            .context("analyzer request failed")?;

        resp.into_json::<AnalysisResult>()
            .context("failed to parse analyzer response")
    }

    fn is_healthy(&self) -> bool {
        let url = self.url("/api/health");
        matches!(ureq::get(&url).timeout(HEALTH_TIMEOUT).call(), Ok(resp) if resp.status() == 200)
    }

    fn endpoint(&self) -> String {
        self.base_url.clone()
    }
}
