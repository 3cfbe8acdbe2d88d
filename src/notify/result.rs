//! Presentation of a single analysis result and of the recent-history list.

use chrono::Local;
use colored::Colorize;
use serde::Serialize;

use crate::history::{AnalysisRecord, History, Sentiment};

/// Characters of analyzed text shown in the result preview.
pub const PREVIEW_CHARS: usize = 100;

/// Characters of text shown per history row.
pub const HISTORY_TEXT_CHARS: usize = 80;

/// Rows shown in the recent-history list.
pub const HISTORY_ROWS: usize = 10;

/// Width of the terminal metric bars, in cells.
const METER_WIDTH: usize = 30;

/// Coloring of the polarity bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Neutral,
    Negative,
}

impl Tone {
    /// Negative below -0.1, positive above 0.1.
    pub fn of_polarity(polarity: f64) -> Self {
        if polarity < -0.1 {
            Self::Negative
        } else if polarity > 0.1 {
            Self::Positive
        } else {
            Self::Neutral
        }
    }
}

/// Display label and icon for a sentiment tag. Unrecognized tags show as
/// neutral.
pub fn label_and_icon(sentiment: &Sentiment) -> (&'static str, &'static str) {
    match sentiment {
        Sentiment::Positive => ("Positive", "😊"),
        Sentiment::Negative => ("Negative", "😠"),
        Sentiment::SlightlyPositive => ("Slightly Positive", "🙂"),
        Sentiment::SlightlyNegative => ("Slightly Negative", "🙁"),
        Sentiment::Neutral | Sentiment::Unrecognized(_) => ("Neutral", "😐"),
    }
}

/// Truncate to `max` characters, appending `...` when cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Result card
// ---------------------------------------------------------------------------

/// Everything needed to draw the result card for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub label: &'static str,
    pub icon: &'static str,
    pub polarity: f64,
    /// Polarity rescaled from `[-1, 1]` to `[0, 100]`.
    pub polarity_pct: f64,
    pub tone: Tone,
    pub subjectivity: f64,
    /// Subjectivity rescaled from `[0, 1]` to `[0, 100]`.
    pub subjectivity_pct: f64,
    pub word_count: u32,
    pub preview: String,
    pub matched_words: Vec<String>,
}

impl ResultView {
    pub fn from_record(record: &AnalysisRecord) -> Self {
        let (label, icon) = label_and_icon(&record.sentiment);
        Self {
            label,
            icon,
            polarity: record.polarity,
            polarity_pct: ((record.polarity + 1.0) / 2.0 * 100.0).clamp(0.0, 100.0),
            tone: Tone::of_polarity(record.polarity),
            subjectivity: record.subjectivity,
            subjectivity_pct: (record.subjectivity * 100.0).clamp(0.0, 100.0),
            word_count: record.word_count,
            preview: truncate_chars(&record.text, PREVIEW_CHARS),
            matched_words: record.found_words.iter().map(|w| w.word.clone()).collect(),
        }
    }

    /// Multi-line colored card for the terminal.
    pub fn render_terminal(&self) -> String {
        let label = match self.tone {
            Tone::Positive => self.label.green().bold(),
            Tone::Negative => self.label.red().bold(),
            Tone::Neutral => self.label.bold(),
        };
        let polarity_bar = match self.tone {
            Tone::Positive => meter(self.polarity_pct).green(),
            Tone::Negative => meter(self.polarity_pct).red(),
            Tone::Neutral => meter(self.polarity_pct).bright_black(),
        };

        let mut out = format!("{} {}\n", self.icon, label);
        out.push_str(&format!(
            "  {} {:>7.4}  {}\n",
            "Polarity:    ".bold(),
            self.polarity,
            polarity_bar
        ));
        out.push_str(&format!(
            "  {} {:>7.4}  {}\n",
            "Subjectivity:".bold(),
            self.subjectivity,
            meter(self.subjectivity_pct).blue()
        ));
        out.push_str(&format!("  {} {}\n", "Word count:  ".bold(), self.word_count));
        if !self.matched_words.is_empty() {
            out.push_str(&format!(
                "  {} {}\n",
                "Lexicon:     ".bold(),
                self.matched_words.join(", ")
            ));
        }
        out.push_str(&format!("  {} \"{}\"\n", "Analyzed:    ".bold(), self.preview.dimmed()));
        out
    }
}

/// A filled/empty bar for a percentage.
fn meter(pct: f64) -> String {
    let filled = ((pct / 100.0) * METER_WIDTH as f64).round() as usize;
    let filled = filled.min(METER_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(METER_WIDTH - filled))
}

// ---------------------------------------------------------------------------
// History list
// ---------------------------------------------------------------------------

/// One row of the recent-history list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub id: i64,
    pub icon: &'static str,
    pub text: String,
    pub sentiment: String,
    /// Local `HH:MM` of the analysis.
    pub time: String,
}

impl HistoryRow {
    pub fn from_record(record: &AnalysisRecord) -> Self {
        let icon = match record.sentiment {
            Sentiment::Positive => "😊",
            Sentiment::Negative => "😠",
            _ => "😐",
        };
        Self {
            id: record.id,
            icon,
            text: truncate_chars(&record.text, HISTORY_TEXT_CHARS),
            sentiment: record.sentiment.as_str().to_uppercase(),
            time: record.timestamp.with_timezone(&Local).format("%H:%M").to_string(),
        }
    }
}

/// The newest `limit` rows of history.
pub fn history_rows(history: &History, limit: usize) -> Vec<HistoryRow> {
    history.iter().take(limit).map(HistoryRow::from_record).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
