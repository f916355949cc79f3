//! Infrastructure adapters for errtrail.
//!
//! This crate holds everything that touches the outside world: config files
//! and environment variables, time, and log output. Errors from the config
//! loader come back as [`ErrorNode`](errtrail_core::ErrorNode)s; the
//! timestamp hooks use their own [`TimeError`].

pub mod configer;
pub mod ctime;
pub mod error;
pub mod logging;

// Re-export commonly used adapters
pub use configer::Configer;
pub use ctime::{CTime, SqlValue, Zone, parse_timezone};
pub use error::{ConfigerError, TimeError};
pub use logging::{LogConfig, WriterSink, init_logging};
