//! Extension trait for wrapping errors as they leave a call site.

use std::error::Error as StdError;

use crate::node::{Arg, ErrorNode};
use crate::values::{Code, Operation};

/// Wrap the error of a `Result` in an [`ErrorNode`].
///
/// ```rust
/// use errtrail_core::{Code, ResultExt};
///
/// fn read() -> Result<String, errtrail_core::ErrorNode> {
///     std::fs::read_to_string("/does/not/exist").wrap_code(Code(404), "settings.read")
/// }
///
/// let err = read().unwrap_err();
/// assert_eq!(err.resolve_code(), Code(404));
/// assert_eq!(err.operations(), ["settings.read"]);
/// ```
pub trait ResultExt<T> {
    /// Wrap with an operation label only.
    fn wrap_op(self, operation: impl Into<Operation>) -> Result<T, ErrorNode>;

    /// Wrap with a code and an operation label.
    fn wrap_code(
        self,
        code: impl Into<Code>,
        operation: impl Into<Operation>,
    ) -> Result<T, ErrorNode>;

    /// Wrap with arbitrary arguments. The error is set as the cause first, so
    /// an explicit cause in `args` replaces it.
    fn wrap_with(self, args: impl IntoIterator<Item = Arg>) -> Result<T, ErrorNode>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn wrap_op(self, operation: impl Into<Operation>) -> Result<T, ErrorNode> {
        self.map_err(|e| ErrorNode::builder().cause(e).operation(operation).build())
    }

    fn wrap_code(
        self,
        code: impl Into<Code>,
        operation: impl Into<Operation>,
    ) -> Result<T, ErrorNode> {
        self.map_err(|e| {
            ErrorNode::builder()
                .cause(e)
                .code(code)
                .operation(operation)
                .build()
        })
    }

    fn wrap_with(self, args: impl IntoIterator<Item = Arg>) -> Result<T, ErrorNode> {
        self.map_err(|e| ErrorNode::builder().cause(e).args(args).build())
    }
}
