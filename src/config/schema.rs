/// Configuration schema and defaults for sentidash.
///
/// Defines the TOML-serializable configuration structure with sections
/// `[analyzer]`, `[storage]`, `[chart]`, `[notifications]`, `[typing]`,
/// `[web]` and `[logging]`.
///
/// Every field has a sensible built-in default. Users only need to set the
/// values they want to override.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::history::MAX_HISTORY;
use crate::view::ChartMode;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level sentidash configuration.
///
/// Maps directly to the `~/.sentidash/config.toml` and `.sentidash.toml`
/// file schemas. All sections and fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub analyzer: AnalyzerConfig,
    pub storage: StorageConfig,
    pub chart: ChartConfig,
    pub notifications: NotificationConfig,
    pub typing: TypingConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

impl DashConfig {
    /// Annotated default config written by `sentidash config init`.
    pub fn default_toml() -> String {
        DEFAULT_TOML.to_string()
    }
}

// ---------------------------------------------------------------------------
// [analyzer]
// ---------------------------------------------------------------------------

/// Remote sentiment analyzer endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Base URL; `/api/analyze` and `/api/health` are appended.
    pub url: String,
    /// Request timeout (milliseconds).
    pub timeout_ms: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [storage]
// ---------------------------------------------------------------------------

/// Where history is persisted and how much of it is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory. `~` is expanded to the home directory.
    pub dir: String,
    /// Maximum history length (at most 100).
    pub capacity: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: "~/.sentidash".to_string(),
            capacity: MAX_HISTORY,
        }
    }
}

impl StorageConfig {
    /// The data directory with `~` expanded.
    pub fn resolved_dir(&self) -> PathBuf {
        expand_tilde(&self.dir)
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest.trim_start_matches(['/', '\\']));
    }
    PathBuf::from(path)
}

// ---------------------------------------------------------------------------
// [chart]
// ---------------------------------------------------------------------------

/// Chart settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Mode shown at startup: `distribution`, `bar` or `timeseries`.
    pub default_mode: ChartMode,
}

// ---------------------------------------------------------------------------
// [notifications]
// ---------------------------------------------------------------------------

/// Notification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// How long a notification stays visible (milliseconds).
    pub dismiss_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dismiss_ms: crate::notify::DEFAULT_DISMISS_MS,
        }
    }
}

// ---------------------------------------------------------------------------
// [typing]
// ---------------------------------------------------------------------------

/// Auto-analysis while typing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    /// Whether the watch session analyzes automatically after a pause.
    pub enabled: bool,
    /// Quiet period after the last edit before analysis fires (milliseconds).
    pub quiet_period_ms: u64,
    /// Input must be longer than this many characters (after trimming).
    pub min_chars: usize,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            quiet_period_ms: 1000,
            min_chars: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

/// Embedded web dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Bind address.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9747".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Diagnostic logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset: `error`, `warn`, `info`,
    /// `debug` or `trace`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML
// ---------------------------------------------------------------------------

const DEFAULT_TOML: &str = r#"# sentidash configuration
#
# Precedence (lowest to highest): built-in defaults, this file,
# .sentidash.toml in the working directory, SENTIDASH_* environment variables.

[analyzer]
# Base URL of the sentiment analyzer service.
url = "http://localhost:5000"
timeout_ms = 10000

[storage]
# History is stored as <dir>/sentimentHistory.json.
dir = "~/.sentidash"
# Number of analyses kept (1-100). Oldest entries are dropped first.
capacity = 100

[chart]
# distribution | bar | timeseries
default_mode = "distribution"

[notifications]
dismiss_ms = 5000

[typing]
# Used by `sentidash watch`: analyze after a pause in typing.
enabled = true
quiet_period_ms = 1000
min_chars = 10

[web]
addr = "127.0.0.1:9747"
open_browser = true

[logging]
# Overridden by RUST_LOG when set.
level = "warn"
"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
