//! The wrapper node and its construction paths.
//!
//! An [`ErrorNode`] carries optional metadata (code, operation, log level)
//! and owns the error it wraps. Nodes are built once and never mutated, so a
//! chain is always acyclic: the only way to get a cause into a node is to
//! hand over an error that already exists.
//!
//! Three ways to build one, all with the same "last argument of a kind wins"
//! rule:
//!
//! - [`wrap!`](crate::wrap) / [`ErrorNode::from_args`]: a list of typed
//!   [`Arg`]s. Unknown kinds do not compile.
//! - [`ErrorNode::builder`]: chainable setters.
//! - [`ErrorNode::from_dynamic`]: type-erased values, dispatched at runtime.
//!   An unknown kind panics.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::io;

use crate::values::{Code, LogLevel, Operation, Severity};

/// Owned, thread-safe error used as a node's cause.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An error annotated with a code, an operation label and a log-level hint.
///
/// The node contributes no text of its own: its `Display` is exactly the
/// cause's `Display`, or empty when there is no cause.
///
/// # Example
///
/// ```rust
/// use errtrail_core::{Code, Severity, wrap};
///
/// let leaf = std::io::Error::other("disk full");
/// let err = wrap!(leaf, "store.save", Code(1001));
/// let err = wrap!(err, "handler.upload");
///
/// assert_eq!(err.resolve_code(), Code(1001));
/// assert_eq!(err.operations(), ["handler.upload", "store.save"]);
/// assert_eq!(err.resolve_log_level(), Severity::Error);
/// assert_eq!(err.to_string(), "disk full");
/// ```
#[derive(Debug, Default)]
pub struct ErrorNode {
    code: Code,
    operation: Operation,
    log_level: LogLevel,
    cause: Option<BoxError>,
}

impl fmt::Display for ErrorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.leaf() {
            Some(leaf) => fmt::Display::fmt(leaf, f),
            None => Ok(()),
        }
    }
}

impl StdError for ErrorNode {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause_dyn()
    }
}

// Unlink nested nodes one at a time so dropping a deep chain uses constant
// stack.
impl Drop for ErrorNode {
    fn drop(&mut self) {
        let mut next = self.cause.take();
        while let Some(cause) = next {
            next = match cause.downcast::<ErrorNode>() {
                Ok(mut node) => node.cause.take(),
                Err(_) => None,
            };
        }
    }
}

impl ErrorNode {
    /// An empty node: no code, no operation, no level, no cause.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ErrorNodeBuilder {
        ErrorNodeBuilder::default()
    }

    /// Build a node from typed arguments, applied in order.
    pub fn from_args(args: impl IntoIterator<Item = Arg>) -> Self {
        args.into_iter()
            .fold(Self::builder(), ErrorNodeBuilder::arg)
            .build()
    }

    /// Build a node from type-erased arguments.
    ///
    /// Accepts the same kinds as [`Arg`]: `Code`, `i32`, `&'static str`,
    /// `String`, `Operation`, `LogLevel`, `Severity`, `ErrorNode`,
    /// `std::io::Error` and `BoxError`.
    ///
    /// `Any` cannot tell whether a value implements `Error`, so an error type
    /// outside that list is an unknown kind here. Box custom errors as a
    /// [`BoxError`] first.
    ///
    /// # Panics
    ///
    /// Panics on any other kind. Passing one is a bug at the call site.
    #[track_caller]
    pub fn from_dynamic(args: impl IntoIterator<Item = Box<dyn Any + Send + Sync>>) -> Self {
        let mut builder = Self::builder();
        for value in args {
            match Arg::try_from_any(value) {
                Ok(arg) => builder = builder.arg(arg),
                Err(_) => panic!("unknown error node argument"),
            }
        }
        builder.build()
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// The code set on this node only. See [`ErrorNode::resolve_code`].
    pub fn code(&self) -> Code {
        self.code
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// The raw level hint set on this node only.
    pub fn log_level(&self) -> &LogLevel {
        &self.log_level
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn into_cause(mut self) -> Option<BoxError> {
        self.cause.take()
    }

    pub(crate) fn cause_dyn(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

// ── Arg ──────────────────────────────────────────────────────────────────────

/// One typed construction argument.
///
/// Conversions exist for every recognized kind, so `Arg::from(x)` is how
/// [`wrap!`](crate::wrap) dispatches. A type without a conversion is a
/// compile error:
///
/// ```compile_fail
/// use errtrail_core::wrap;
///
/// let _ = wrap!(3.5_f64);
/// ```
#[derive(Debug)]
pub enum Arg {
    Code(Code),
    Operation(Operation),
    Level(LogLevel),
    Cause(BoxError),
}

macro_rules! try_kind {
    ($value:ident, $ty:ty) => {
        let $value = match $value.downcast::<$ty>() {
            Ok(inner) => return Ok(Arg::from(*inner)),
            Err(other) => other,
        };
    };
}

impl Arg {
    /// Wrap any error as the cause argument.
    pub fn cause<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Cause(Box::new(err))
    }

    /// Recover a typed argument from a type-erased value.
    ///
    /// Returns the value unchanged if its kind is not recognized.
    pub fn try_from_any(
        value: Box<dyn Any + Send + Sync>,
    ) -> Result<Self, Box<dyn Any + Send + Sync>> {
        try_kind!(value, Code);
        try_kind!(value, i32);
        try_kind!(value, &'static str);
        try_kind!(value, String);
        try_kind!(value, Operation);
        try_kind!(value, LogLevel);
        try_kind!(value, Severity);
        try_kind!(value, ErrorNode);
        try_kind!(value, io::Error);
        try_kind!(value, BoxError);
        Err(value)
    }
}

impl From<Code> for Arg {
    fn from(code: Code) -> Self {
        Self::Code(code)
    }
}

impl From<i32> for Arg {
    fn from(code: i32) -> Self {
        Self::Code(Code(code))
    }
}

impl From<Operation> for Arg {
    fn from(operation: Operation) -> Self {
        Self::Operation(operation)
    }
}

impl From<&str> for Arg {
    fn from(label: &str) -> Self {
        Self::Operation(Operation::from(label))
    }
}

impl From<String> for Arg {
    fn from(label: String) -> Self {
        Self::Operation(Operation::from(label))
    }
}

impl From<LogLevel> for Arg {
    fn from(level: LogLevel) -> Self {
        Self::Level(level)
    }
}

impl From<Severity> for Arg {
    fn from(severity: Severity) -> Self {
        Self::Level(LogLevel::from(severity))
    }
}

impl From<ErrorNode> for Arg {
    fn from(node: ErrorNode) -> Self {
        Self::cause(node)
    }
}

impl From<io::Error> for Arg {
    fn from(err: io::Error) -> Self {
        Self::cause(err)
    }
}

impl From<BoxError> for Arg {
    fn from(err: BoxError) -> Self {
        Self::Cause(err)
    }
}

// ── Builder ──────────────────────────────────────────────────────────────────

/// Chainable construction of an [`ErrorNode`]. Each setter overwrites the
/// previous value of its kind.
#[derive(Debug, Default)]
#[must_use]
pub struct ErrorNodeBuilder {
    node: ErrorNode,
}

impl ErrorNodeBuilder {
    pub fn code(mut self, code: impl Into<Code>) -> Self {
        self.node.code = code.into();
        self
    }

    pub fn operation(mut self, operation: impl Into<Operation>) -> Self {
        self.node.operation = operation.into();
        self
    }

    pub fn level(mut self, level: impl Into<LogLevel>) -> Self {
        self.node.log_level = level.into();
        self
    }

    pub fn cause<E>(self, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.boxed_cause(Box::new(err))
    }

    pub fn boxed_cause(mut self, err: BoxError) -> Self {
        self.node.cause = Some(err);
        self
    }

    pub fn arg(self, arg: Arg) -> Self {
        match arg {
            Arg::Code(code) => self.code(code),
            Arg::Operation(operation) => self.operation(operation),
            Arg::Level(level) => self.level(level),
            Arg::Cause(err) => self.boxed_cause(err),
        }
    }

    pub fn args(self, args: impl IntoIterator<Item = Arg>) -> Self {
        args.into_iter().fold(self, Self::arg)
    }

    pub fn build(self) -> ErrorNode {
        self.node
    }
}

/// Build an [`ErrorNode`] from a list of arguments of any recognized kind.
///
/// ```rust
/// use errtrail_core::{Code, LogLevel, Operation, wrap};
///
/// const OP: Operation = Operation::from_static("repo.find");
///
/// let err = wrap!(std::io::Error::other("timeout"), OP, Code(2021), LogLevel::WARN);
/// assert_eq!(err.code(), Code(2021));
/// assert_eq!(err.operation(), "repo.find");
/// ```
#[macro_export]
macro_rules! wrap {
    ($($arg:expr),* $(,)?) => {
        $crate::ErrorNode::from_args([$($crate::Arg::from($arg)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrap;

    fn leaf(text: &str) -> io::Error {
        io::Error::other(text.to_string())
    }

    #[test]
    fn empty_args_build_empty_node() {
        let node = wrap!();
        assert_eq!(node.code(), Code::NOT_SET);
        assert!(node.operation().is_empty());
        assert!(node.log_level().is_unset());
        assert!(node.cause().is_none());
        assert_eq!(node.to_string(), "");
    }

    #[test]
    fn each_kind_lands_in_its_field() {
        let cases: Vec<(&str, Vec<Arg>, Code, &str, &str)> = vec![
            ("code only", vec![Arg::from(Code(1001))], Code(1001), "", ""),
            ("plain integer", vec![Arg::from(7)], Code(7), "", ""),
            ("operation from str", vec![Arg::from("lookup failed")], Code::NOT_SET, "lookup failed", ""),
            ("operation value", vec![Arg::from(Operation::from_static("a.b"))], Code::NOT_SET, "a.b", ""),
            ("level only", vec![Arg::from(LogLevel::DEBUG)], Code::NOT_SET, "", "debug"),
            (
                "everything",
                vec![
                    Arg::from(Code(2021)),
                    Arg::from(Operation::from_static("a.b")),
                    Arg::from(LogLevel::new("debug")),
                    Arg::from(leaf("new error")),
                ],
                Code(2021),
                "a.b",
                "debug",
            ),
        ];

        for (name, args, code, operation, level) in cases {
            let has_cause = args.iter().any(|arg| matches!(arg, Arg::Cause(_)));
            let node = ErrorNode::from_args(args);
            assert_eq!(node.code(), code, "{name}");
            assert_eq!(node.operation(), operation, "{name}");
            assert_eq!(node.log_level().as_str(), level, "{name}");
            if has_cause {
                assert_eq!(node.to_string(), "new error", "{name}");
            } else {
                assert!(node.cause().is_none(), "{name}");
            }
        }
    }

    #[test]
    fn last_argument_of_a_kind_wins() {
        let node = wrap!(
            Code(1),
            "first",
            leaf("first cause"),
            Code(2),
            LogLevel::INFO,
            "second",
            leaf("second cause"),
            LogLevel::WARN,
        );
        assert_eq!(node.code(), Code(2));
        assert_eq!(node.operation(), "second");
        assert_eq!(node.log_level(), &LogLevel::WARN);
        assert_eq!(node.to_string(), "second cause");
    }

    #[test]
    fn builder_matches_macro() {
        let built = ErrorNode::builder()
            .cause(leaf("boom"))
            .operation("svc.run")
            .code(42)
            .level(Severity::Info)
            .build();
        let macroed = wrap!(leaf("boom"), "svc.run", 42, Severity::Info);

        assert_eq!(built.code(), macroed.code());
        assert_eq!(built.operation(), macroed.operation());
        assert_eq!(built.log_level(), macroed.log_level());
        assert_eq!(built.to_string(), macroed.to_string());
    }

    #[test]
    fn display_is_the_leaf_text_unchanged() {
        let node = wrap!(leaf("original error"));
        assert_eq!(node.to_string(), "original error");

        let nested = wrap!(wrap!(node, "inner"), "outer");
        assert_eq!(nested.to_string(), "original error");
    }

    #[test]
    fn source_is_the_cause() {
        let node = wrap!(leaf("root"), "op");
        let source = node.source().expect("source present");
        assert_eq!(source.to_string(), "root");
        assert!(wrap!().source().is_none());
    }

    #[test]
    fn boxed_cause_is_accepted_as_is() {
        let boxed: BoxError = Box::new(wrap!(leaf("deep"), Code(9)));
        let node = wrap!(boxed, "outer");
        let inner = node
            .cause()
            .and_then(|c| c.downcast_ref::<ErrorNode>())
            .expect("inner node kept its type");
        assert_eq!(inner.code(), Code(9));
    }

    #[test]
    fn dynamic_arguments_dispatch_by_kind() {
        let args: Vec<Box<dyn Any + Send + Sync>> = vec![
            Box::new(Code(5)),
            Box::new("static.op"),
            Box::new(LogLevel::INFO),
            Box::new(leaf("io")),
            Box::new(String::from("owned.op")),
            Box::new(11_i32),
        ];
        let node = ErrorNode::from_dynamic(args);
        assert_eq!(node.code(), Code(11));
        assert_eq!(node.operation(), "owned.op");
        assert_eq!(node.log_level(), &LogLevel::INFO);
        assert_eq!(node.to_string(), "io");
    }

    #[test]
    fn dynamic_node_argument_becomes_cause() {
        let inner = wrap!(leaf("inner"), Code(3));
        let node = ErrorNode::from_dynamic([Box::new(inner) as Box<dyn Any + Send + Sync>]);
        assert!(node
            .cause()
            .and_then(|c| c.downcast_ref::<ErrorNode>())
            .is_some());
    }

    #[test]
    #[should_panic(expected = "unknown error node argument")]
    fn dynamic_unknown_kind_panics() {
        let args: Vec<Box<dyn Any + Send + Sync>> = vec![Box::new("op"), Box::new(3.5_f64)];
        let _ = ErrorNode::from_dynamic(args);
    }

    #[derive(Debug)]
    struct QuotaExceeded;

    impl fmt::Display for QuotaExceeded {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("quota exceeded")
        }
    }

    impl StdError for QuotaExceeded {}

    #[test]
    fn dynamic_custom_error_accepted_once_boxed() {
        let cause: BoxError = Box::new(QuotaExceeded);
        let args: Vec<Box<dyn Any + Send + Sync>> = vec![Box::new(cause), Box::new("billing.charge")];
        let node = ErrorNode::from_dynamic(args);
        assert_eq!(node.operation(), "billing.charge");
        assert_eq!(node.to_string(), "quota exceeded");
    }

    #[test]
    #[should_panic(expected = "unknown error node argument")]
    fn dynamic_unboxed_custom_error_panics() {
        let args: Vec<Box<dyn Any + Send + Sync>> = vec![Box::new(QuotaExceeded), Box::new("op")];
        let _ = ErrorNode::from_dynamic(args);
    }

    #[test]
    fn try_from_any_hands_back_unknown_values() {
        let rejected = Arg::try_from_any(Box::new(vec![1_u8])).expect_err("vec is not an arg");
        assert!(rejected.downcast_ref::<Vec<u8>>().is_some());
    }
}
