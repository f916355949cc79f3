//! Log sinks and single-line error emission.
//!
//! `errtrail-core` never owns a global logger. [`emit_log`] takes the sink as
//! an argument; [`TracingSink`] forwards to whatever `tracing` subscriber the
//! binary installed, and [`MemorySink`] captures lines for tests.
//!
//! # Line format
//!
//! ```text
//! [warn ] [handler.upload store.save]: disk full
//! ```
//!
//! The tag is the resolved severity padded to five characters, followed by
//! the operation trail (outermost first, space separated) and the leaf text.
//! Errors that are not nodes are written as their bare text.

use std::error::Error as StdError;
use std::sync::{Arc, PoisonError, RwLock};

use crate::node::ErrorNode;
use crate::values::Severity;

/// Destination for formatted error lines.
///
/// `severity` is `None` for errors that are not nodes; `line` already
/// contains the tag when there is one. Implementations must serialize
/// concurrent writes themselves.
#[cfg_attr(test, mockall::automock)]
pub trait LogSink: Send + Sync {
    fn emit(&self, severity: Option<Severity>, line: &str);
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn emit(&self, severity: Option<Severity>, line: &str) {
        (**self).emit(severity, line)
    }
}

/// Format the line for `err` without emitting it.
pub fn format_line(err: &(dyn StdError + 'static)) -> (Option<Severity>, String) {
    let Some(node) = err.downcast_ref::<ErrorNode>() else {
        return (None, err.to_string());
    };

    let severity = node.resolve_log_level();
    let operations = node
        .chain()
        .map(|n| n.operation().as_str())
        .collect::<Vec<_>>()
        .join(" ");

    (
        Some(severity),
        format!("[{}] [{}]: {}", severity.tag(), operations, node),
    )
}

/// Write one line describing `err` to `sink`.
pub fn emit_log(err: &(dyn StdError + 'static), sink: &dyn LogSink) {
    let (severity, line) = format_line(err);
    sink.emit(severity, &line);
}

/// [`emit_log`] through [`TracingSink`].
pub fn emit_log_default(err: &(dyn StdError + 'static)) {
    emit_log(err, &TracingSink)
}

impl ErrorNode {
    /// Emit this error to `sink`. See [`emit_log`].
    pub fn log_to(&self, sink: &dyn LogSink) {
        emit_log(self, sink)
    }

    /// Emit this error through `tracing`.
    pub fn log(&self) {
        emit_log_default(self)
    }
}

// ── TracingSink ──────────────────────────────────────────────────────────────

/// Forwards lines to `tracing` events under the `errtrail` target.
///
/// Lines without a severity are logged at `ERROR`, the default severity of
/// an unclassified error.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, severity: Option<Severity>, line: &str) {
        match severity {
            Some(Severity::Info) => tracing::info!(target: "errtrail", "{line}"),
            Some(Severity::Debug) => tracing::debug!(target: "errtrail", "{line}"),
            Some(Severity::Warn) => tracing::warn!(target: "errtrail", "{line}"),
            Some(Severity::Error) | None => tracing::error!(target: "errtrail", "{line}"),
        }
    }
}

// ── MemorySink ───────────────────────────────────────────────────────────────

/// In-memory sink for testing. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<RwLock<Vec<(Option<Severity>, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .map(|(_, line)| line)
            .collect()
    }

    /// Captured lines with the severity they were emitted at.
    pub fn records(&self) -> Vec<(Option<Severity>, String)> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    pub fn clear(&self) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogSink for MemorySink {
    fn emit(&self, severity: Option<Severity>, line: &str) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((severity, line.to_owned()));
    }
}
