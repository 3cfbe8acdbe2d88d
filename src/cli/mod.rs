//! CLI command implementations for sentidash.
//!
//! Provides subcommand handlers for:
//! - `sentidash analyze <TEXT>` / `--file PATH`: analyze once and show the result
//! - `sentidash watch`: interactive session with analyze-while-typing
//! - `sentidash history`: recent analyses
//! - `sentidash stats`: sentiment counts and percentages
//! - `sentidash chart`: draw the history chart in the terminal
//! - `sentidash export`: write JSON exports
//! - `sentidash serve`: embedded web dashboard
//! - `sentidash health`: analyzer, storage and config checks
//! - `sentidash config show|init|set|reset`: configuration management

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{Local, Utc};
use colored::Colorize;

use crate::analytics::{SentimentSummary, summarize};
use crate::analyzer::{AnalyzerClient, HttpAnalyzer};
use crate::config::{self, DashConfig};
use crate::export::{self, ExportKind};
use crate::history::store::{FileStore, HistoryStore, KeyValueStore};
use crate::history::{History, Sentiment};
use crate::notify::result::{HISTORY_ROWS, HISTORY_TEXT_CHARS, truncate_chars};
use crate::notify::{Notification, Notifier, Severity};
use crate::view::{ChartMode, Renderer, SnapshotRenderer, TerminalRenderer};
use crate::workflow::{AnalysisWorkflow, TypingDebouncer};

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

fn open_store(cfg: &DashConfig) -> HistoryStore<FileStore> {
    HistoryStore::new(
        FileStore::new(cfg.storage.resolved_dir()),
        cfg.storage.capacity,
    )
}

fn open_workflow<R: Renderer>(
    cfg: &DashConfig,
    renderer: R,
    mode: ChartMode,
) -> AnalysisWorkflow<HttpAnalyzer, FileStore, R> {
    AnalysisWorkflow::new(
        HttpAnalyzer::from_config(&cfg.analyzer),
        open_store(cfg),
        renderer,
        mode,
        Notifier::new(cfg.notifications.dismiss_ms),
    )
}

// ---------------------------------------------------------------------------
// sentidash analyze
// ---------------------------------------------------------------------------

/// Analyze text (or a file) once and print the result card.
pub fn run_analyze(cfg: &DashConfig, text: Option<&str>, file: Option<&Path>) -> Result<()> {
    let mut wf = open_workflow(cfg, TerminalRenderer::new(), cfg.chart.default_mode);

    let analyzed = match file {
        Some(path) => wf.analyze_file(path).is_some(),
        None => wf.analyze(text.unwrap_or_default()).is_some(),
    };

    print_notification(wf.last_notification());
    if analyzed && let Some(view) = wf.result_view() {
        println!();
        print!("{}", view.render_terminal());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// sentidash watch
// ---------------------------------------------------------------------------

/// How long the watch loop sleeps when nothing is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// One line typed into the watch session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchInput {
    /// More text for the current draft.
    Text(String),
    /// Blank line: analyze the draft now.
    Submit,
    Mode(Option<ChartMode>),
    History,
    Stats,
    Clear,
    Help,
    Quit,
    Unknown(String),
}

impl WatchInput {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Submit;
        }
        let Some(command) = trimmed.strip_prefix(':') else {
            return Self::Text(line.trim_end_matches(['\r', '\n']).to_string());
        };

        let mut parts = command.split_whitespace();
        match parts.next().unwrap_or_default() {
            "mode" | "m" => Self::Mode(parts.next().and_then(ChartMode::parse)),
            "history" | "h" => Self::History,
            "stats" | "s" => Self::Stats,
            "clear" | "c" => Self::Clear,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Interactive session: lines accumulate into a draft that is analyzed after
/// a pause in typing, or immediately on a blank line.
pub fn run_watch(cfg: &DashConfig) -> Result<()> {
    let mut wf = open_workflow(cfg, TerminalRenderer::new(), cfg.chart.default_mode);
    let mut debouncer = TypingDebouncer::from_config(&cfg.typing);
    let mut draft = String::new();

    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("{}", "sentidash watch".bold().cyan());
    println!("{}", "=".repeat(40));
    print_watch_help(cfg);
    prompt();

    loop {
        let wait = debouncer
            .time_remaining(Instant::now())
            .unwrap_or(IDLE_POLL);

        match rx.recv_timeout(wait) {
            Ok(line) => match WatchInput::parse(&line) {
                WatchInput::Text(text) => {
                    if !draft.is_empty() {
                        draft.push('\n');
                    }
                    draft.push_str(&text);
                    if cfg.typing.enabled {
                        debouncer.on_input(&draft, Instant::now());
                    }
                }
                WatchInput::Submit => {
                    debouncer.cancel();
                    submit_draft(&mut wf, &mut draft);
                    prompt();
                }
                WatchInput::Mode(Some(mode)) => {
                    wf.switch_mode(mode);
                    print!("{}", wf.view().render());
                    prompt();
                }
                WatchInput::Mode(None) => {
                    println!(
                        "{}",
                        "Usage: :mode distribution|bar|timeseries".yellow()
                    );
                    prompt();
                }
                WatchInput::History => {
                    print_history_table(wf.history(), HISTORY_ROWS);
                    prompt();
                }
                WatchInput::Stats => {
                    print_summary_table(&summarize(wf.history()));
                    prompt();
                }
                WatchInput::Clear => {
                    debouncer.cancel();
                    draft.clear();
                    wf.clear();
                    print_notification(wf.last_notification());
                    prompt();
                }
                WatchInput::Help => {
                    print_watch_help(cfg);
                    prompt();
                }
                WatchInput::Quit => break,
                WatchInput::Unknown(cmd) => {
                    println!("{} :{}", "Unknown command".yellow(), cmd);
                    prompt();
                }
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                if !draft.trim().is_empty() {
                    submit_draft(&mut wf, &mut draft);
                }
                break;
            }
        }

        if debouncer.poll(Instant::now()).is_some() {
            println!();
            submit_draft(&mut wf, &mut draft);
            prompt();
        }
    }

    Ok(())
}

/// Analyze the draft and print the outcome. The draft is emptied only when
/// the analysis succeeded, so a failed attempt can be retried with Enter.
fn submit_draft<A: AnalyzerClient, S: KeyValueStore, R: Renderer>(
    wf: &mut AnalysisWorkflow<A, S, R>,
    draft: &mut String,
) -> bool {
    let analyzed = wf.analyze(draft.as_str()).is_some();
    print_notification(wf.last_notification());
    if analyzed && let Some(view) = wf.result_view() {
        print!("{}", view.render_terminal());
        println!();
        print!("{}", wf.view().render());
    }
    if analyzed {
        draft.clear();
    }
    analyzed
}

fn print_watch_help(cfg: &DashConfig) {
    if cfg.typing.enabled {
        println!(
            "  Type text; it is analyzed {} ms after you stop typing,",
            cfg.typing.quiet_period_ms
        );
        println!("  or press Enter on an empty line to analyze now.");
    } else {
        println!("  Type text, then press Enter on an empty line to analyze.");
    }
    println!(
        "  {}",
        ":mode <distribution|bar|timeseries>  :history  :stats  :clear  :quit".dimmed()
    );
    println!();
}

fn prompt() {
    print!("{} ", ">".cyan().bold());
    let _ = io::stdout().flush();
}

// ---------------------------------------------------------------------------
// sentidash history
// ---------------------------------------------------------------------------

/// Show the newest `limit` analyses.
pub fn run_history(cfg: &DashConfig, limit: usize, format: OutputFormat) -> Result<()> {
    let history = open_store(cfg).load();

    if history.is_empty() {
        println!("{}", "No analysis history yet".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            let records = &history.records()[..limit.min(history.len())];
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        OutputFormat::Csv => print_history_csv(&history, limit),
        OutputFormat::Table => print_history_table(&history, limit),
    }
    Ok(())
}

fn print_history_table(history: &History, limit: usize) {
    if history.is_empty() {
        println!("{}", "No analysis history yet".yellow());
        return;
    }

    println!(
        "{} ({} of {} stored)",
        "Recent Analyses".bold().cyan(),
        limit.min(history.len()),
        history.len()
    );
    println!(
        "  {:<6} {:<18} {:>8}  Text",
        "Time", "Sentiment", "Polarity"
    );
    println!("  {}", "-".repeat(70));

    for (i, record) in history.iter().take(limit).enumerate() {
        let time = record.timestamp.with_timezone(&Local).format("%H:%M");
        let tag = record.sentiment.as_str().to_uppercase();
        let line = format!(
            "  {:<6} {} {:>8.3}  {}",
            time,
            colorize_sentiment(&record.sentiment, &format!("{tag:<18}")),
            record.polarity,
            truncate_chars(&record.text.replace('\n', " "), HISTORY_TEXT_CHARS),
        );
        if i % 2 == 0 {
            println!("{}", line);
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_history_csv(history: &History, limit: usize) {
    println!("id,timestamp,sentiment,polarity,subjectivity,word_count,text");
    for record in history.iter().take(limit) {
        println!(
            "{},{},{},{},{},{},\"{}\"",
            record.id,
            record.timestamp.to_rfc3339(),
            record.sentiment,
            record.polarity,
            record.subjectivity,
            record.word_count,
            record.text.replace('"', "\"\""),
        );
    }
}

// ---------------------------------------------------------------------------
// sentidash stats
// ---------------------------------------------------------------------------

/// Show sentiment counts and percentages over the stored history.
pub fn run_stats(cfg: &DashConfig, format: OutputFormat) -> Result<()> {
    let summary = summarize(&open_store(cfg).load());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Csv => {
            println!("sentiment,count,percentage");
            for (label, (count, pct)) in ["positive", "neutral", "negative"]
                .iter()
                .zip(summary.counts().into_iter().zip(summary.percentages()))
            {
                println!("{label},{count},{pct:.1}");
            }
        }
        OutputFormat::Table => print_summary_table(&summary),
    }
    Ok(())
}

fn print_summary_table(summary: &SentimentSummary) {
    println!("{}", "Sentiment Summary".bold().cyan());
    println!("{}", "=".repeat(40));

    if summary.total == 0 {
        println!("{}", "No data yet. Analyze some text to see stats.".yellow());
        return;
    }

    println!("  {} {}", "Total analyses:".bold(), summary.total);
    println!(
        "  {} {:>4} ({:.1}%)",
        "Positive:      ".green(),
        summary.positive,
        summary.positive_percentage
    );
    println!(
        "  {} {:>4} ({:.1}%)",
        "Neutral:       ".bright_black(),
        summary.neutral,
        summary.neutral_percentage
    );
    println!(
        "  {} {:>4} ({:.1}%)",
        "Negative:      ".red(),
        summary.negative,
        summary.negative_percentage
    );

    let other = summary.total - summary.counted();
    if other > 0 {
        println!(
            "  {}",
            format!("{other} unrecognized results are not charted").dimmed()
        );
    }
}

// ---------------------------------------------------------------------------
// sentidash chart
// ---------------------------------------------------------------------------

/// Draw the history chart in the terminal.
pub fn run_chart(cfg: &DashConfig, mode: Option<ChartMode>) -> Result<()> {
    let mode = mode.unwrap_or(cfg.chart.default_mode);
    let wf = open_workflow(cfg, TerminalRenderer::new(), mode);

    println!(
        "{} {}",
        "Sentiment".bold().cyan(),
        format!("({mode}, {} analyses)", wf.history().len()).dimmed()
    );
    println!();
    print!("{}", wf.view().render());
    Ok(())
}

// ---------------------------------------------------------------------------
// sentidash export
// ---------------------------------------------------------------------------

/// Write the history (or the summary bundle) as JSON into `out`.
pub fn run_export(cfg: &DashConfig, bundle: bool, out: Option<PathBuf>) -> Result<()> {
    let history = open_store(cfg).load();
    let kind = if bundle {
        ExportKind::Bundle
    } else {
        ExportKind::History
    };
    let dir = out.unwrap_or_else(|| PathBuf::from("."));

    let path = export::write_export(&dir, kind, &history, Utc::now())?;
    let mut notifier = Notifier::new(cfg.notifications.dismiss_ms);
    notifier.show(Severity::Success, kind.success_message(), Utc::now());
    print_notification(notifier.last());
    println!("  {}", path.display().to_string().dimmed());
    Ok(())
}

// ---------------------------------------------------------------------------
// sentidash serve
// ---------------------------------------------------------------------------

/// Run the web dashboard until interrupted.
pub fn run_serve(cfg: &DashConfig, addr: Option<&str>, no_open: bool) -> Result<()> {
    let addr = addr.unwrap_or(&cfg.web.addr);
    let mut dashboard = open_workflow(cfg, SnapshotRenderer::new(), cfg.chart.default_mode);
    crate::web::serve(addr, &mut dashboard, cfg.web.open_browser && !no_open)
}

// ---------------------------------------------------------------------------
// sentidash health
// ---------------------------------------------------------------------------

/// Check analyzer reachability, stored history and config files.
pub fn run_health(cfg: &DashConfig) -> Result<()> {
    println!("{}", "sentidash Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    // Config files
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.sentidash/config.toml found"
        } else {
            "not found (run `sentidash config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".sentidash.toml found"
        } else {
            "none (optional)"
        },
    );

    // Analyzer
    let analyzer = HttpAnalyzer::from_config(&cfg.analyzer);
    let analyzer_ok = analyzer.is_healthy();
    let detail = if analyzer_ok {
        format!("reachable at {}", analyzer.endpoint())
    } else {
        format!("not reachable at {} (is it running?)", analyzer.endpoint())
    };
    print_health_item("Analyzer", analyzer_ok, &detail);

    // Storage
    let store = open_store(cfg);
    let dir = store.backend().dir().to_path_buf();
    let snapshot_exists = store
        .backend()
        .get(crate::history::store::HISTORY_KEY)
        .map(|v| v.is_some())
        .unwrap_or(false);
    let history = store.load();
    print_health_item(
        "History",
        snapshot_exists,
        &if snapshot_exists {
            format!(
                "{} of {} records in {}",
                history.len(),
                history.capacity(),
                dir.display()
            )
        } else {
            format!("nothing stored yet in {}", dir.display())
        },
    );

    print_health_item(
        "Chart mode",
        true,
        cfg.chart.default_mode.as_str(),
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<18} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// sentidash config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective sentidash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.sentidash/config.toml", global_exists);
    print_source(".sentidash.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "SENTIDASH_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.sentidash/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Print a notification line, colored by severity.
fn print_notification(notification: Option<&Notification>) {
    let Some(n) = notification else { return };
    let line = match n.severity {
        Severity::Success => format!("✓ {}", n.message).green().bold(),
        Severity::Info => format!("ℹ {}", n.message).cyan(),
        Severity::Warning => format!("! {}", n.message).yellow().bold(),
        Severity::Error => format!("✗ {}", n.message).red().bold(),
    };
    println!("{line}");
}

/// Colorize text by sentiment.
fn colorize_sentiment(sentiment: &Sentiment, text: &str) -> colored::ColoredString {
    match sentiment {
        Sentiment::Positive => text.green(),
        Sentiment::Negative => text.red(),
        Sentiment::SlightlyPositive => text.bright_green(),
        Sentiment::SlightlyNegative => text.bright_red(),
        Sentiment::Neutral | Sentiment::Unrecognized(_) => text.normal(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
