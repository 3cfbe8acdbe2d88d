//! sentidash: a terminal and browser dashboard for a remote sentiment
//! analyzer.
//!
//! Text goes to the analyzer, each result is kept in a bounded, persisted
//! history, and the history is aggregated into one of three charts.

pub mod analytics;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod export;
pub mod history;
pub mod logging;
pub mod notify;
pub mod view;
pub mod web;
pub mod workflow;
