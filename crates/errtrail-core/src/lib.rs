//! errtrail Core - structured error chains
//!
//! Wrap any error with a machine-readable [`Code`], an [`Operation`] label
//! and a [`LogLevel`] hint as it travels up the call stack, then recover a
//! stable code, a breadcrumb trail and a severity at the top.
//!
//! ## Resolution rules
//!
//! ```text
//! wrap!(wrap!(wrap!(io_err, "db.query", Code(1001)), "repo.find"), "handler.get")
//!
//!   ┌────────────────┐   ┌────────────────┐   ┌────────────────┐   ┌────────┐
//!   │ handler.get    │──▶│ repo.find      │──▶│ db.query       │──▶│ io_err │
//!   │ code: -        │   │ code: -        │   │ code: 1001     │   │ (leaf) │
//!   └────────────────┘   └────────────────┘   └────────────────┘   └────────┘
//!
//!   code       → outermost set code            → 1001
//!   operations → every node, outermost first   → [handler.get, repo.find, db.query]
//!   severity   → outermost non-empty level     → error (default)
//!   text       → the leaf's text               → io_err.to_string()
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use errtrail_core::prelude::*;
//!
//! fn query() -> Result<(), ErrorNode> {
//!     Err(wrap!(std::io::Error::other("connection refused"), "db.query", Code(1001)))
//! }
//!
//! fn find() -> Result<(), ErrorNode> {
//!     query().wrap_op("repo.find")
//! }
//!
//! let err = find().unwrap_err();
//! let sink = MemorySink::new();
//! err.log_to(&sink);
//!
//! assert_eq!(err.resolve_code(), Code(1001));
//! assert_eq!(sink.lines(), ["[error] [repo.find db.query]: connection refused"]);
//! ```

pub mod ext;
pub mod node;
pub mod resolve;
pub mod sink;
pub mod values;

pub use ext::ResultExt;
pub use node::{Arg, BoxError, ErrorNode, ErrorNodeBuilder};
pub use resolve::{Nodes, collect_operations, nodes, resolve_code, resolve_log_level};
pub use sink::{LogSink, MemorySink, TracingSink, emit_log, emit_log_default, format_line};
pub use values::{Code, LogLevel, Operation, Severity};

// Public API - what external crates should use
pub mod prelude {
    pub use crate::ext::ResultExt;
    pub use crate::node::{Arg, ErrorNode};
    pub use crate::sink::{LogSink, MemorySink, TracingSink};
    pub use crate::values::{Code, LogLevel, Operation, Severity};
    pub use crate::wrap;
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
