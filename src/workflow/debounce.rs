//! Analyze-while-typing debounce.
//!
//! Every edit restarts the quiet period. When it elapses without another
//! edit, the latest text is released for analysis, but only if its trimmed
//! form is longer than the minimum length.

use std::time::{Duration, Instant};

use crate::config::schema::TypingConfig;

#[derive(Debug, Clone)]
pub struct TypingDebouncer {
    quiet: Duration,
    min_chars: usize,
    deadline: Option<Instant>,
    pending: String,
}

impl TypingDebouncer {
    pub fn new(quiet: Duration, min_chars: usize) -> Self {
        Self {
            quiet,
            min_chars,
            deadline: None,
            pending: String::new(),
        }
    }

    pub fn from_config(config: &TypingConfig) -> Self {
        Self::new(Duration::from_millis(config.quiet_period_ms), config.min_chars)
    }

    /// Record the full current input after an edit at `now`.
    ///
    /// Any scheduled analysis is cancelled. A new one is scheduled only
    /// when the text is long enough.
    pub fn on_input(&mut self, text: &str, now: Instant) {
        self.pending = text.to_string();
        self.deadline = if text.trim().chars().count() > self.min_chars {
            Some(now + self.quiet)
        } else {
            None
        };
    }

    /// Text to analyze if the quiet period has elapsed by `now`.
    /// Fires at most once per scheduled deadline.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        Some(self.pending.clone())
    }

    /// Time left until the scheduled analysis, if any.
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop the pending text and any scheduled analysis.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.pending.clear();
    }
}

impl Default for TypingDebouncer {
    fn default() -> Self {
        Self::from_config(&TypingConfig::default())
    }
}
