//! Remote sentiment analyzer.
//!
//! The scoring itself happens in a separate service; this module only
//! defines the wire result and the [`AnalyzerClient`] seam the workflow
//! talks to. [`http::HttpAnalyzer`] is the production client.

pub mod http;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::history::{AnalysisDetails, LexiconMatch, Sentiment};

pub use http::HttpAnalyzer;

/// Successful response body of `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiment: Sentiment,
    pub polarity: f64,
    pub subjectivity: f64,
    pub word_count: u32,
    pub text: String,
    #[serde(default)]
    pub found_words: Vec<LexiconMatch>,
    #[serde(default)]
    pub analysis_details: Option<AnalysisDetails>,
}

/// Anything that can turn text into an [`AnalysisResult`].
pub trait AnalyzerClient {
    /// Analyze `text`. Transport errors, non-success statuses and
    /// undecodable bodies are all reported as `Err`.
    fn analyze(&self, text: &str) -> Result<AnalysisResult>;

    /// Cheap reachability probe.
    fn is_healthy(&self) -> bool;

    /// Human-readable location of the analyzer, for diagnostics.
    fn endpoint(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_deserializes_minimal_body() {
        let json = r#"{
            "sentiment": "positive",
            "polarity": 0.6,
            "subjectivity": 0.4,
            "word_count": 3,
            "text": "I love this"
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.word_count, 3);
        assert!(result.found_words.is_empty());
        assert!(result.analysis_details.is_none());
    }

    #[test]
    fn result_deserializes_full_body() {
        let json = r#"{
            "text": "gloomy",
            "sentiment": "negative",
            "polarity": -0.57,
            "subjectivity": 0.0,
            "word_count": 1,
            "found_words": [{"word": "gloomy", "sentiment": "negative", "score": -0.6}],
            "analysis_details": {
                "textblob_score": 0.0,
                "lexicon_avg": -0.6,
                "final_score": -0.57,
                "threshold_info": "negative if < -0.1"
            }
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.found_words.len(), 1);
        assert_eq!(result.found_words[0].word, "gloomy");
        let details = result.analysis_details.unwrap();
        assert!((details.lexicon_avg + 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn result_keeps_slightly_tags() {
        let json = r#"{"sentiment": "slightly negative", "polarity": -0.05,
            "subjectivity": 0.1, "word_count": 4, "text": "not very great"}"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.sentiment, Sentiment::SlightlyNegative);
    }
}
