//! Diagnostic logging setup
//!
//! Logs go to stderr so that stdout only carries the echoed document.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Warning and error messages (default)
    Warn,
    /// Merge and launch progress
    Info,
    /// Per-property changes
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::new(format!("propmerge={}", self.as_str()))
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(level: LogLevel) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level.filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
