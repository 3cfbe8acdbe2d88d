//! Colored text charts for the CLI.

use colored::{ColoredString, Colorize};

use super::{Chart, ChartData, ChartMode, Renderer};
use crate::analytics::{HourlyBuckets, SentimentSummary};

/// Width of the distribution strip, in cells.
const STRIP_WIDTH: usize = 48;

/// Maximum bar height, in rows.
const BAR_ROWS: usize = 8;

/// Spark levels from empty to full.
const SPARKS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const LABELS: [&str; 3] = ["Positive", "Neutral", "Negative"];

/// Renders charts as terminal text.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TerminalRenderer {
    fn create(&mut self, mode: ChartMode, data: ChartData) -> Box<dyn Chart> {
        Box::new(TerminalChart { mode, data })
    }
}

struct TerminalChart {
    mode: ChartMode,
    data: ChartData,
}

impl Chart for TerminalChart {
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
        match (&self.mode, &self.data) {
            (ChartMode::Distribution, ChartData::Counts(summary)) => render_distribution(summary),
            (ChartMode::Bar, ChartData::Counts(summary)) => render_bars(summary),
            (ChartMode::Timeseries, ChartData::Timeline(buckets)) => render_timeline(buckets),
            _ => String::new(),
        }
    }

    fn destroy(self: Box<Self>) {}
}

fn paint(channel: usize, text: &str) -> ColoredString {
    match channel {
        0 => text.green(),
        1 => text.bright_black(),
        _ => text.red(),
    }
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

/// A proportional strip followed by a legend with counts and percentages.
fn render_distribution(summary: &SentimentSummary) -> String {
    let counts = summary.counts();
    let counted = summary.counted();
    let mut out = String::new();

    if counted == 0 {
        out.push_str(&format!("{}\n", "░".repeat(STRIP_WIDTH).dimmed()));
    } else {
        let widths = strip_widths(counts, counted);
        let strip: String = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| paint(i, &"█".repeat(w)).to_string())
            .collect();
        out.push_str(&strip);
        out.push('\n');
    }

    for (i, label) in LABELS.iter().enumerate() {
        out.push_str(&format!(
            "  {} {:<9} {:>4} ({:.1}%)\n",
            paint(i, "●"),
            label,
            counts[i],
            summary.percentages()[i],
        ));
    }
    out
}

/// Split `STRIP_WIDTH` cells in proportion to `counts`, largest remainder
/// first so the widths always add up to the full strip.
fn strip_widths(counts: [usize; 3], counted: usize) -> [usize; 3] {
    let exact: Vec<f64> = counts
        .iter()
        .map(|&c| c as f64 / counted as f64 * STRIP_WIDTH as f64)
        .collect();
    let mut widths = [0usize; 3];
    for (w, e) in widths.iter_mut().zip(&exact) {
        *w = e.floor() as usize;
    }

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.total_cmp(&ra)
    });
    let mut remaining = STRIP_WIDTH - widths.iter().sum::<usize>();
    for i in order {
        if remaining == 0 {
            break;
        }
        if counts[i] > 0 {
            widths[i] += 1;
            remaining -= 1;
        }
    }
    widths
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

/// Vertical bars on an integer axis, each topped by its value.
fn render_bars(summary: &SentimentSummary) -> String {
    let counts = summary.counts();
    let max = counts.iter().copied().max().unwrap_or(0).max(1);
    let step = max.div_ceil(BAR_ROWS);
    let rows = max.div_ceil(step);
    let mut out = String::new();

    // One spare row above the axis so a full-height bar still gets its label.
    for level in (1..=rows + 1).rev() {
        let tick = if level <= rows {
            format!("{:>4} ┤", level * step)
        } else {
            "     │".to_string()
        };
        out.push_str(&tick);

        for (i, &count) in counts.iter().enumerate() {
            let height = count.div_ceil(step);
            let cell = if level <= height {
                paint(i, "  ████  ").to_string()
            } else if level == height + 1 && count > 0 {
                format!("{:^8}", count)
            } else {
                " ".repeat(8)
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }

    out.push_str(&format!("   0 └{}\n", "─".repeat(8 * counts.len())));
    out.push_str("      ");
    for label in LABELS {
        out.push_str(&format!("{:^8}", label));
    }
    out.push('\n');
    out
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// Width of one bucket column.
const COLUMN: usize = 3;

/// One sparkline per channel over the hourly buckets.
fn render_timeline(buckets: &HourlyBuckets) -> String {
    if buckets.is_placeholder() {
        return format!("  {}\n", "No Data".dimmed());
    }

    let peak = buckets.peak().max(1);
    let series = [buckets.positive(), buckets.neutral(), buckets.negative()];
    let mut out = String::new();

    for (i, values) in series.iter().enumerate() {
        out.push_str(&format!("{:<9}│", LABELS[i]));
        for &v in values {
            let level = (v * (SPARKS.len() - 1)).div_ceil(peak);
            let spark = SPARKS[level].to_string().repeat(COLUMN - 1);
            out.push_str(&format!("{} ", paint(i, &spark)));
        }
        out.push_str(&format!(" max {}\n", values.iter().max().copied().unwrap_or(0)));
    }

    // Label every fourth bucket; each label spans four columns.
    out.push_str(&" ".repeat(10));
    for (idx, label) in buckets.labels().iter().enumerate().step_by(4) {
        let width = COLUMN * 4.min(buckets.buckets.len() - idx);
        out.push_str(&format!("{:<width$}", label, width = width));
    }
    out.push('\n');
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::HourBucket;

    fn plain() {
        colored::control::set_override(false);
    }

    fn summary(positive: usize, neutral: usize, negative: usize) -> SentimentSummary {
        let total = positive + neutral + negative;
        let pct = |c: usize| {
            if total == 0 {
                0.0
            } else {
                (c as f64 / total as f64 * 1000.0).round() / 10.0
            }
        };
        SentimentSummary {
            positive,
            neutral,
            negative,
            total,
            positive_percentage: pct(positive),
            neutral_percentage: pct(neutral),
            negative_percentage: pct(negative),
        }
    }

    #[test]
    fn strip_widths_fill_the_strip() {
        let widths = strip_widths([1, 1, 1], 3);
        assert_eq!(widths.iter().sum::<usize>(), STRIP_WIDTH);
        let widths = strip_widths([5, 0, 2], 7);
        assert_eq!(widths.iter().sum::<usize>(), STRIP_WIDTH);
        assert_eq!(widths[1], 0);
    }

    #[test]
    fn distribution_lists_counts_and_percentages() {
        plain();
        let out = render_distribution(&summary(3, 1, 0));
        assert!(out.contains("Positive"));
        assert!(out.contains("(75.0%)"));
        assert!(out.contains("(25.0%)"));
        assert!(out.contains("(0.0%)"));
    }

    #[test]
    fn bars_label_each_nonzero_value() {
        plain();
        let out = render_bars(&summary(4, 0, 2));
        let lines: Vec<&str> = out.lines().collect();
        // The spare top row carries the tallest bar's label.
        assert!(lines[0].contains('4'));
        assert!(out.contains("   0 └"));
        assert!(out.contains("Negative"));
    }

    #[test]
    fn bars_use_integer_ticks_for_large_counts() {
        plain();
        let out = render_bars(&summary(20, 3, 1));
        assert!(out.contains("  21 ┤") || out.contains("  24 ┤"));
        assert!(!out.contains('.'));
    }

    #[test]
    fn timeline_placeholder_says_no_data() {
        plain();
        let buckets = HourlyBuckets {
            buckets: vec![HourBucket {
                label: "No Data".to_string(),
                positive: 0,
                negative: 0,
                neutral: 0,
            }],
        };
        assert!(render_timeline(&buckets).contains("No Data"));
    }

    #[test]
    fn timeline_renders_three_series_and_axis() {
        plain();
        let buckets = HourlyBuckets {
            buckets: (0..24)
                .map(|h| HourBucket {
                    label: format!("{h:02}:00"),
                    positive: if h == 23 { 2 } else { 0 },
                    negative: 0,
                    neutral: 1,
                })
                .collect(),
        };
        let out = render_timeline(&buckets);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Positive"));
        assert!(lines[0].contains("max 2"));
        assert!(lines[3].contains("00:00"));
        assert!(lines[3].contains("20:00"));
    }

    #[test]
    fn chart_render_matches_mode() {
        plain();
        let mut renderer = TerminalRenderer::new();
        let chart = renderer.create(ChartMode::Bar, ChartData::Counts(summary(1, 0, 0)));
        assert!(chart.render().contains("└"));
        chart.destroy();
    }
}
