//! Transient user-facing notifications.
//!
//! At most one notification is visible at a time: showing a new one replaces
//! whatever is on screen. Each notification expires after a fixed delay.
//! Every notification is also emitted as a `tracing` event.

pub mod result;

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Default time a notification stays visible.
pub const DEFAULT_DISMISS_MS: u64 = 5000;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub shown_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Holds the single visible notification.
#[derive(Debug, Clone)]
pub struct Notifier {
    current: Option<Notification>,
    dismiss_after: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_MS)
    }
}

impl Notifier {
    pub fn new(dismiss_ms: u64) -> Self {
        Self {
            current: None,
            dismiss_after: Duration::milliseconds(dismiss_ms as i64),
        }
    }

    /// Show `message`, replacing any notification on screen.
    pub fn show(&mut self, severity: Severity, message: impl Into<String>, now: DateTime<Utc>) {
        let message = message.into();
        match severity {
            Severity::Info | Severity::Success => tracing::info!(%severity, "{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
        }
        self.current = Some(Notification {
            severity,
            message,
            shown_at: now,
            expires_at: now + self.dismiss_after,
        });
    }

    /// Visible notification at `now`; expired ones are dropped.
    pub fn current(&mut self, now: DateTime<Utc>) -> Option<&Notification> {
        if self.current.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.current = None;
        }
        self.current.as_ref()
    }

    /// Latest notification regardless of expiry.
    pub fn last(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
