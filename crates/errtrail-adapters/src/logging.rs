//! Log output for binaries embedding errtrail.
//!
//! Libraries only *emit*; a binary picks one of:
//!
//! - [`init_logging`]: install a `tracing` subscriber so that
//!   [`TracingSink`](errtrail_core::TracingSink) (and `ErrorNode::log`) write
//!   to stderr.
//! - [`WriterSink`]: bypass `tracing` and write plain timestamped lines to
//!   any `Write`.
//!
//! `RUST_LOG` overrides the configured level if set.

use std::io::{self, IsTerminal as _, Write};
use std::sync::{Mutex, PoisonError};

use anyhow::Context as _;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use errtrail_core::{LogSink, Severity};

/// Logging settings, loadable through [`Configer`](crate::configer::Configer)
/// as a `log` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter level for errtrail targets: `error`, `warn`, `info`, `debug`
    /// or `trace`.
    pub level: String,
    pub no_color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            no_color: false,
        }
    }
}

impl LogConfig {
    fn filter_directives(&self) -> String {
        let level = self.level.trim().to_ascii_lowercase();
        format!("errtrail={level},errtrail_core={level},errtrail_adapters={level}")
    }
}

/// Initialise the global tracing subscriber.
///
/// An unknown `level` is rejected before anything is installed. Returns an
/// error instead of panicking if a subscriber is already set.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    config
        .level
        .trim()
        .parse::<LevelFilter>()
        .with_context(|| format!("Invalid log level '{}'", config.level))?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.filter_directives())
            .with_context(|| format!("Invalid log level '{}'", config.level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(!config.no_color && io::stderr().is_terminal())
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}

// ── WriterSink ───────────────────────────────────────────────────────────────

/// Writes each line to `W`, prefixed with the local time
/// (`2006/01/02 15:04:05 `).
///
/// Write errors are dropped: there is nowhere left to report them.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl WriterSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn emit(&self, _severity: Option<Severity>, line: &str) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(writer, "{} {line}", Local::now().format("%Y/%m/%d %H:%M:%S"));
    }
}
