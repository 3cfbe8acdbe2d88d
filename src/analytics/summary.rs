use serde::{Deserialize, Serialize};

use super::Channel;
use crate::history::History;

/// Sentiment counts over the whole history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSummary {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    /// Number of records, including ones outside the three channels.
    pub total: usize,
    pub positive_percentage: f64,
    pub neutral_percentage: f64,
    pub negative_percentage: f64,
}

impl SentimentSummary {
    /// Records counted in one of the three channels.
    pub fn counted(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Counts in chart order: positive, neutral, negative.
    pub fn counts(&self) -> [usize; 3] {
        [self.positive, self.neutral, self.negative]
    }

    /// Percentages in chart order: positive, neutral, negative.
    pub fn percentages(&self) -> [f64; 3] {
        [
            self.positive_percentage,
            self.neutral_percentage,
            self.negative_percentage,
        ]
    }
}

/// Count the history by sentiment.
pub fn summarize(history: &History) -> SentimentSummary {
    let mut summary = SentimentSummary {
        total: history.len(),
        ..SentimentSummary::default()
    };

    for record in history {
        match Channel::of(&record.sentiment) {
            Some(Channel::Positive) => summary.positive += 1,
            Some(Channel::Neutral) => summary.neutral += 1,
            Some(Channel::Negative) => summary.negative += 1,
            None => {}
        }
    }

    summary.positive_percentage = percentage(summary.positive, summary.total);
    summary.neutral_percentage = percentage(summary.neutral, summary.total);
    summary.negative_percentage = percentage(summary.negative, summary.total);
    summary
}

/// `count / total * 100` rounded to one decimal, 0 when total is zero.
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = count as f64 / total as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}
