//! Value objects carried by an [`ErrorNode`](crate::ErrorNode): `Code`,
//! `Operation`, `LogLevel` and the resolved `Severity`.
//!
//! # Design
//!
//! These are plain value types with equality by value. `Operation` and
//! `LogLevel` hold a `Cow<'static, str>` so call sites can declare them as
//! constants (`const OP: Operation = Operation::from_static("store.save")`)
//! without allocating, while still accepting runtime strings.
//!
//! `LogLevel` is deliberately *not* an enum: a node stores whatever hint the
//! caller gave it, and only resolution decides what that hint means. An
//! unrecognized value is kept as-is so that resolution can treat it as
//! `error` instead of silently dropping it.

use std::borrow::Cow;
use std::fmt;

// ── Code ─────────────────────────────────────────────────────────────────────

/// Machine-readable error classification.
///
/// `Code::NOT_SET` (0) means "no code assigned at this node" and is never
/// returned by resolution for a chain that reaches a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Code(pub i32);

impl Code {
    /// No code assigned at this node.
    pub const NOT_SET: Code = Code(0);

    /// Resolved for leaves and chains where no node sets a code.
    pub const UNEXPECTED: Code = Code(1);

    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    pub const fn is_set(self) -> bool {
        self.0 != Self::NOT_SET.0
    }
}

impl From<i32> for Code {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<Code> for i32 {
    fn from(code: Code) -> Self {
        code.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Operation ────────────────────────────────────────────────────────────────

/// Breadcrumb naming the call site that produced or forwarded an error,
/// e.g. `"store.save"`. May be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Operation(Cow<'static, str>);

impl Operation {
    pub fn new(label: impl Into<Cow<'static, str>>) -> Self {
        Self(label.into())
    }

    pub const fn from_static(label: &'static str) -> Self {
        Self(Cow::Borrowed(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Operation {
    fn from(label: &str) -> Self {
        Self(Cow::Owned(label.to_owned()))
    }
}

impl From<String> for Operation {
    fn from(label: String) -> Self {
        Self(Cow::Owned(label))
    }
}

impl PartialEq<str> for Operation {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Operation {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

// ── LogLevel ─────────────────────────────────────────────────────────────────

/// Raw log-level hint stored on a node.
///
/// Empty means "unset": resolution defers to the cause. The four named
/// constants are the recognized values; anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LogLevel(Cow<'static, str>);

impl LogLevel {
    pub const UNSET: LogLevel = LogLevel(Cow::Borrowed(""));
    pub const INFO: LogLevel = LogLevel(Cow::Borrowed("info"));
    pub const DEBUG: LogLevel = LogLevel(Cow::Borrowed("debug"));
    pub const WARN: LogLevel = LogLevel(Cow::Borrowed("warn"));
    pub const ERROR: LogLevel = LogLevel(Cow::Borrowed("error"));

    pub fn new(level: impl Into<Cow<'static, str>>) -> Self {
        Self(level.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Severity> for LogLevel {
    fn from(severity: Severity) -> Self {
        Self(Cow::Borrowed(severity.as_str()))
    }
}

// ── Severity ─────────────────────────────────────────────────────────────────

/// Resolved severity of an error chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    Info,
    Debug,
    Warn,
    #[default]
    Error,
}

impl Severity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Fixed-width tag used in emitted log lines.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Info => "info ",
            Self::Debug => "debug",
            Self::Warn => "warn ",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_sentinels_are_distinct() {
        assert_ne!(Code::NOT_SET, Code::UNEXPECTED);
        assert!(!Code::NOT_SET.is_set());
        assert!(Code::UNEXPECTED.is_set());
        assert_eq!(Code::default(), Code::NOT_SET);
    }

    #[test]
    fn code_converts_from_plain_integer() {
        assert_eq!(Code::from(1001), Code(1001));
        assert_eq!(i32::from(Code(42)), 42);
        assert_eq!(Code(2021).to_string(), "2021");
    }

    #[test]
    fn operation_static_and_owned_compare_equal() {
        const OP: Operation = Operation::from_static("a.b");
        assert_eq!(OP, Operation::from("a.b".to_string()));
        assert_eq!(OP, "a.b");
        assert!(Operation::default().is_empty());
    }

    #[test]
    fn log_level_keeps_unrecognized_text() {
        let level = LogLevel::new("warning");
        assert_eq!(level.as_str(), "warning");
        assert!(!level.is_unset());
        assert!(LogLevel::UNSET.is_unset());
        assert_eq!(LogLevel::default(), LogLevel::UNSET);
    }

    #[test]
    fn severity_round_trips_into_log_level() {
        assert_eq!(LogLevel::from(Severity::Debug), LogLevel::DEBUG);
        assert_eq!(LogLevel::from(Severity::Error), LogLevel::ERROR);
    }

    #[test]
    fn severity_tags_are_fixed_width() {
        for severity in [Severity::Info, Severity::Debug, Severity::Warn, Severity::Error] {
            assert_eq!(severity.tag().len(), 5);
            assert_eq!(severity.tag().trim_end(), severity.as_str());
        }
    }
}
