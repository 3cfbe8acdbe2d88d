//! Analysis history: the records produced by successful analyses.
//!
//! History is kept newest-first and bounded: once it holds `capacity`
//! records, prepending a new one evicts the oldest. The whole list is
//! persisted as a single JSON snapshot through [`store::HistoryStore`].

pub mod store;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::AnalysisResult;

/// Hard upper bound on the number of records kept.
pub const MAX_HISTORY: usize = 100;

// ---------------------------------------------------------------------------
// Sentiment tag
// ---------------------------------------------------------------------------

/// Sentiment label assigned by the remote analyzer.
///
/// The analyzer spells the intermediate classes with a space
/// (`"slightly positive"`), which is the form written back out. Hyphen and
/// underscore spellings are accepted when reading. Any other tag is kept as
/// [`Sentiment::Unrecognized`] so snapshots survive a newer analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    SlightlyPositive,
    SlightlyNegative,
    Unrecognized(String),
}

impl Sentiment {
    /// Parse a wire tag. Never fails; unknown tags become `Unrecognized`.
    pub fn parse(tag: &str) -> Self {
        let normalized = tag.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            "neutral" => Self::Neutral,
            "slightly positive" => Self::SlightlyPositive,
            "slightly negative" => Self::SlightlyNegative,
            _ => Self::Unrecognized(tag.to_string()),
        }
    }

    /// Wire spelling of the tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::SlightlyPositive => "slightly positive",
            Self::SlightlyNegative => "slightly negative",
            Self::Unrecognized(tag) => tag,
        }
    }
}

impl From<String> for Sentiment {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<Sentiment> for String {
    fn from(sentiment: Sentiment) -> Self {
        sentiment.as_str().to_string()
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A lexicon word the analyzer matched in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconMatch {
    pub word: String,
    pub sentiment: String,
    pub score: f64,
}

/// Scoring breakdown reported by the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDetails {
    #[serde(default)]
    pub textblob_score: f64,
    #[serde(default)]
    pub lexicon_avg: f64,
    #[serde(default)]
    pub final_score: f64,
    #[serde(default)]
    pub threshold_info: String,
}

/// One completed analysis as stored in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub text: String,
    pub sentiment: Sentiment,
    /// In `[-1, 1]`.
    pub polarity: f64,
    /// In `[0, 1]`.
    pub subjectivity: f64,
    pub word_count: u32,
    pub timestamp: DateTime<Utc>,
    pub id: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub found_words: Vec<LexiconMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_details: Option<AnalysisDetails>,
}

impl AnalysisRecord {
    /// Stamp an analyzer result with its creation time and id.
    pub fn from_result(result: AnalysisResult, timestamp: DateTime<Utc>, id: i64) -> Self {
        Self {
            text: result.text,
            sentiment: result.sentiment,
            polarity: result.polarity,
            subjectivity: result.subjectivity,
            word_count: result.word_count,
            timestamp,
            id,
            found_words: result.found_words,
            analysis_details: result.analysis_details,
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Newest-first, capacity-bounded list of analysis records.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    records: Vec<AnalysisRecord>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }
}

impl History {
    /// Empty history holding at most `capacity` records (clamped to
    /// `1..=MAX_HISTORY`).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            capacity: capacity.clamp(1, MAX_HISTORY),
        }
    }

    /// Build from records already in newest-first order, dropping any beyond
    /// capacity.
    pub fn from_records(mut records: Vec<AnalysisRecord>, capacity: usize) -> Self {
        let mut history = Self::with_capacity(capacity);
        records.truncate(history.capacity);
        history.records = records;
        history
    }

    /// Prepend a record, evicting the oldest entries beyond capacity.
    ///
    /// Returns the evicted records, oldest last.
    pub fn push_front(&mut self, record: AnalysisRecord) -> Vec<AnalysisRecord> {
        self.records.insert(0, record);
        if self.records.len() > self.capacity {
            self.records.split_off(self.capacity)
        } else {
            Vec::new()
        }
    }

    pub fn records(&self) -> &[AnalysisRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&AnalysisRecord> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnalysisRecord> {
        self.records.iter()
    }

    /// Next unique record id for a record created at `now`.
    ///
    /// Uses the epoch milliseconds of `now`, bumped past the largest id
    /// already present so two analyses in the same millisecond stay distinct.
    pub fn next_id(&self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        match self.records.iter().map(|r| r.id).max() {
            Some(max) if max >= candidate => max + 1,
            _ => candidate,
        }
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a AnalysisRecord;
    type IntoIter = std::slice::Iter<'a, AnalysisRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
