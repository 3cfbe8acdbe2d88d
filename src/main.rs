use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use sentidash::view::ChartMode;
use sentidash::{cli, config, logging};

#[derive(Debug, Parser)]
#[command(name = "sentidash")]
#[command(about = "Sentiment analysis dashboard for the terminal and browser")]
#[command(version)]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze text once and show the result
    Analyze {
        /// Text to analyze
        #[arg(trailing_var_arg = true, required_unless_present = "file")]
        text: Vec<String>,
        /// Read the text from a .txt, .csv or .json file instead
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },
    /// Interactive session that analyzes as you type
    Watch,
    /// Show recent analyses
    History {
        /// Number of entries to show
        #[arg(long, default_value = "10")]
        limit: usize,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show sentiment counts and percentages
    Stats {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Draw the history chart
    Chart {
        /// distribution, bar or timeseries (default: from config)
        #[arg(long, value_parser = parse_mode)]
        mode: Option<ChartMode>,
    },
    /// Export history as JSON
    Export {
        /// Export history, summary and export time together
        #[arg(long)]
        bundle: bool,
        /// Directory to write into (default: current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run the web dashboard
    Serve {
        /// Bind address (default: from config)
        #[arg(long)]
        addr: Option<String>,
        /// Don't open a browser
        #[arg(long)]
        no_open: bool,
    },
    /// Check analyzer reachability, storage and config
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config to ~/.sentidash/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `analyzer.url http://host:5000`
    Set { key: String, value: String },
    /// Reset the config file to defaults
    Reset,
}

fn parse_mode(s: &str) -> Result<ChartMode, String> {
    ChartMode::parse(s).ok_or_else(|| format!("unknown chart mode '{s}'"))
}

fn main() -> Result<()> {
    let app = App::parse();
    let cfg = config::load();
    logging::init(&cfg.logging);

    match app.command {
        Commands::Analyze { text, file } => {
            let text = text.join(" ");
            cli::run_analyze(&cfg, Some(&text), file.as_deref())
        }
        Commands::Watch => cli::run_watch(&cfg),
        Commands::History { limit, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_history(&cfg, limit, fmt)
        }
        Commands::Stats { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_stats(&cfg, fmt)
        }
        Commands::Chart { mode } => cli::run_chart(&cfg, mode),
        Commands::Export { bundle, out } => cli::run_export(&cfg, bundle, out),
        Commands::Serve { addr, no_open } => cli::run_serve(&cfg, addr.as_deref(), no_open),
        Commands::Health => cli::run_health(&cfg),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
