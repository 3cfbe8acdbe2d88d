//! Aggregations derived from the analysis history.
//!
//! Nothing here is stored: both views are recomputed from [`History`] each
//! time a chart needs data.
//!
//! - **Summary**: per-sentiment counts and percentages
//! - **Timeline**: 24 hourly buckets over the trailing day
//!
//! The `slightly …` classes fold into the channel of their direction.
//! Unrecognized tags are left out of every channel but still count toward
//! the summary total.
//!
//! [`History`]: crate::history::History

pub mod summary;
pub mod timeline;

pub use summary::{SentimentSummary, summarize};
pub use timeline::{HourBucket, HourlyBuckets, bucketize};

use crate::history::Sentiment;

/// Chart channel a sentiment tag feeds, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Positive,
    Neutral,
    Negative,
}

impl Channel {
    pub fn of(sentiment: &Sentiment) -> Option<Self> {
        match sentiment {
            Sentiment::Positive | Sentiment::SlightlyPositive => Some(Self::Positive),
            Sentiment::Neutral => Some(Self::Neutral),
            Sentiment::Negative | Sentiment::SlightlyNegative => Some(Self::Negative),
            Sentiment::Unrecognized(_) => None,
        }
    }
}
