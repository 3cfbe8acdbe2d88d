use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};

use super::Channel;
use crate::history::History;

/// Width of the trailing window, in hourly buckets.
pub const WINDOW_HOURS: usize = 24;

/// Label of the single bucket returned for an empty history.
pub const NO_DATA_LABEL: &str = "No Data";

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Counts for one hour of the trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourBucket {
    /// Local clock time (`HH:MM`) of the bucket's reference instant.
    pub label: String,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl HourBucket {
    fn empty(label: String) -> Self {
        Self {
            label,
            positive: 0,
            negative: 0,
            neutral: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

/// Hourly activity over the last 24 hours, oldest bucket first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyBuckets {
    pub buckets: Vec<HourBucket>,
}

impl HourlyBuckets {
    /// True for the one-bucket `No Data` stand-in.
    pub fn is_placeholder(&self) -> bool {
        self.buckets.len() == 1 && self.buckets[0].label == NO_DATA_LABEL
    }

    pub fn labels(&self) -> Vec<&str> {
        self.buckets.iter().map(|b| b.label.as_str()).collect()
    }

    pub fn positive(&self) -> Vec<usize> {
        self.buckets.iter().map(|b| b.positive).collect()
    }

    pub fn negative(&self) -> Vec<usize> {
        self.buckets.iter().map(|b| b.negative).collect()
    }

    pub fn neutral(&self) -> Vec<usize> {
        self.buckets.iter().map(|b| b.neutral).collect()
    }

    /// Largest single channel count, for axis scaling.
    pub fn peak(&self) -> usize {
        self.buckets
            .iter()
            .flat_map(|b| [b.positive, b.negative, b.neutral])
            .max()
            .unwrap_or(0)
    }
}

/// Bucket the history into the 24 hours preceding `now`.
///
/// A record `h` whole hours old (`h = floor((now - timestamp) / 1h)`) lands
/// in bucket `23 - h`, so the last bucket is the current hour. Records from
/// the future or older than 24 hours are skipped. An empty history yields a
/// single `No Data` bucket instead.
pub fn bucketize(history: &History, now: DateTime<Utc>) -> HourlyBuckets {
    if history.is_empty() {
        return HourlyBuckets {
            buckets: vec![HourBucket::empty(NO_DATA_LABEL.to_string())],
        };
    }

    let mut buckets: Vec<HourBucket> = (0..WINDOW_HOURS)
        .rev()
        .map(|hours_ago| {
            let at = now - Duration::hours(hours_ago as i64);
            HourBucket::empty(at.with_timezone(&Local).format("%H:%M").to_string())
        })
        .collect();

    for record in history {
        let Some(index) = bucket_index(now, record.timestamp) else {
            continue;
        };
        let bucket = &mut buckets[index];
        match Channel::of(&record.sentiment) {
            Some(Channel::Positive) => bucket.positive += 1,
            Some(Channel::Negative) => bucket.negative += 1,
            Some(Channel::Neutral) => bucket.neutral += 1,
            None => {}
        }
    }

    HourlyBuckets { buckets }
}

/// Index of the bucket covering `timestamp`, or `None` outside the window.
fn bucket_index(now: DateTime<Utc>, timestamp: DateTime<Utc>) -> Option<usize> {
    let hour_diff = (now - timestamp)
        .num_milliseconds()
        .div_euclid(MILLIS_PER_HOUR);
    if (0..WINDOW_HOURS as i64).contains(&hour_diff) {
        Some(WINDOW_HOURS - 1 - hour_diff as usize)
    } else {
        None
    }
}
