//! Diagnostic logging setup.
//!
//! Events go to stderr so they never mix with command output on stdout.
//! Precedence: `RUST_LOG` > `logging.level` from config.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::schema::LoggingConfig;

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(config: &LoggingConfig) -> String {
    format!("sentidash={},tiny_http=warn", config.level)
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are no-ops.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
