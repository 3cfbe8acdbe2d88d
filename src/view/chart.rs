//! Chart collaborator seam.
//!
//! A [`Renderer`] owns a drawing surface and builds [`Chart`] objects on it.
//! The view controller holds at most one live chart and must call
//! [`Chart::destroy`] before asking the renderer for another.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ChartMode;
use crate::analytics::{self, HourlyBuckets, SentimentSummary};
use crate::history::History;

/// Data pushed into a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "lowercase")]
pub enum ChartData {
    /// Per-sentiment counts, used by the distribution and bar modes.
    Counts(SentimentSummary),
    /// Hourly series, used by the time-series mode.
    Timeline(HourlyBuckets),
}

impl ChartData {
    /// Aggregate `history` into the shape `mode` draws.
    pub fn for_mode(mode: ChartMode, history: &History, now: DateTime<Utc>) -> Self {
        match mode {
            ChartMode::Distribution | ChartMode::Bar => Self::Counts(analytics::summarize(history)),
            ChartMode::Timeseries => Self::Timeline(analytics::bucketize(history, now)),
        }
    }

    pub fn as_counts(&self) -> Option<&SentimentSummary> {
        match self {
            Self::Counts(summary) => Some(summary),
            Self::Timeline(_) => None,
        }
    }

    pub fn as_timeline(&self) -> Option<&HourlyBuckets> {
        match self {
            Self::Timeline(buckets) => Some(buckets),
            Self::Counts(_) => None,
        }
    }
}

/// A live chart bound to a renderer's surface.
pub trait Chart {
    fn mode(&self) -> ChartMode;

    /// Data currently shown.
    fn data(&self) -> &ChartData;

    /// Replace the data in place, without rebuilding the chart.
    fn update(&mut self, data: ChartData);

    /// Draw the chart in the renderer's output format.
    fn render(&self) -> String;

    /// Release the chart and its hold on the surface.
    fn destroy(self: Box<Self>);
}

/// Builds charts on a single shared surface.
pub trait Renderer {
    fn create(&mut self, mode: ChartMode, data: ChartData) -> Box<dyn Chart>;
}
