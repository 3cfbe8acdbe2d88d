//! Serializable chart payloads for the browser frontend.
//!
//! The embedded web dashboard draws charts client-side; this renderer just
//! hands it the mode, the series labels and the values as JSON.

use serde::Serialize;

use super::{Chart, ChartData, ChartMode, Renderer};

/// JSON body describing one chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSnapshot<'a> {
    pub mode: ChartMode,
    pub labels: Vec<&'a str>,
    pub data: &'a ChartData,
}

impl<'a> ChartSnapshot<'a> {
    pub fn new(mode: ChartMode, data: &'a ChartData) -> Self {
        let labels = match data {
            ChartData::Counts(_) => vec!["Positive", "Neutral", "Negative"],
            ChartData::Timeline(buckets) => buckets.labels(),
        };
        Self { mode, labels, data }
    }
}

/// Renders charts as JSON snapshots.
#[derive(Debug, Default)]
pub struct SnapshotRenderer;

impl SnapshotRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for SnapshotRenderer {
    fn create(&mut self, mode: ChartMode, data: ChartData) -> Box<dyn Chart> {
        Box::new(SnapshotChart { mode, data })
    }
}

struct SnapshotChart {
    mode: ChartMode,
    data: ChartData,
}

impl Chart for SnapshotChart {
    fn mode(&self) -> ChartMode {
        self.mode
    }

    fn data(&self) -> &ChartData {
        &self.data
    }

    fn update(&mut self, data: ChartData) {
        self.data = data;
    }

    fn render(&self) -> String {
        serde_json::to_string(&ChartSnapshot::new(self.mode, &self.data)).unwrap_or_default()
    }

    fn destroy(self: Box<Self>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{HourBucket, HourlyBuckets, SentimentSummary};

    #[test]
    fn counts_snapshot_has_three_labels() {
        let data = ChartData::Counts(SentimentSummary {
            positive: 2,
            total: 2,
            positive_percentage: 100.0,
            ..SentimentSummary::default()
        });
        let mut renderer = SnapshotRenderer::new();
        let chart = renderer.create(ChartMode::Bar, data);
        let json: serde_json::Value = serde_json::from_str(&chart.render()).unwrap();

        assert_eq!(json["mode"], "bar");
        assert_eq!(json["labels"].as_array().unwrap().len(), 3);
        assert_eq!(json["data"]["kind"], "counts");
        assert_eq!(json["data"]["values"]["positive"], 2);
    }

    #[test]
    fn timeline_snapshot_uses_bucket_labels() {
        let data = ChartData::Timeline(HourlyBuckets {
            buckets: vec![HourBucket {
                label: "No Data".to_string(),
                positive: 0,
                negative: 0,
                neutral: 0,
            }],
        });
        let snapshot = ChartSnapshot::new(ChartMode::Timeseries, &data);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["labels"][0], "No Data");
        assert_eq!(json["data"]["kind"], "timeline");
    }
}
