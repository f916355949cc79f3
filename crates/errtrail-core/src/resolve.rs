//! Walkers that resolve code, operation trail and severity from any error.
//!
//! Every walker follows the cause relation with a loop over [`Nodes`], not
//! recursion. The walk stops at the first cause that is not an
//! [`ErrorNode`] (a leaf) or at a node with no cause at all. Leaves are
//! never looked into, even if their own `source()` happens to be a node.

use std::error::Error as StdError;
use std::iter::FusedIterator;

use crate::node::ErrorNode;
use crate::values::{Code, Operation, Severity};

/// Iterator over the consecutive nodes of a chain, outermost first.
#[derive(Debug, Clone)]
pub struct Nodes<'a> {
    next: Option<&'a ErrorNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a ErrorNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.cause_dyn().and_then(as_node);
        Some(node)
    }
}

impl FusedIterator for Nodes<'_> {}

fn as_node<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a ErrorNode> {
    err.downcast_ref::<ErrorNode>()
}

/// Nodes of the chain starting at `err`. Empty if `err` is a leaf.
pub fn nodes<'a>(err: &'a (dyn StdError + 'static)) -> Nodes<'a> {
    Nodes { next: as_node(err) }
}

/// The outermost code that is set, or [`Code::UNEXPECTED`] once the walk
/// reaches a leaf or a missing cause.
pub fn resolve_code(err: &(dyn StdError + 'static)) -> Code {
    nodes(err)
        .map(ErrorNode::code)
        .find(|code| code.is_set())
        .unwrap_or(Code::UNEXPECTED)
}

/// Operation labels from the outermost node inward. Empty labels are kept.
pub fn collect_operations(err: &(dyn StdError + 'static)) -> Vec<Operation> {
    nodes(err).map(|node| node.operation().clone()).collect()
}

/// Resolve the severity of `err`.
///
/// An empty level defers to the cause. `info`, `debug` and `warn` are
/// returned as found. Any other non-empty value stops the walk with
/// [`Severity::Error`], so a misspelled level never picks up a milder one
/// from further in.
pub fn resolve_log_level(err: &(dyn StdError + 'static)) -> Severity {
    for node in nodes(err) {
        match node.log_level().as_str() {
            "" => continue,
            "info" => return Severity::Info,
            "debug" => return Severity::Debug,
            "warn" => return Severity::Warn,
            _ => return Severity::Error,
        }
    }
    Severity::Error
}

impl ErrorNode {
    /// Nodes of the chain starting at this one.
    pub fn chain(&self) -> Nodes<'_> {
        Nodes { next: Some(self) }
    }

    /// See [`resolve_code`].
    pub fn resolve_code(&self) -> Code {
        resolve_code(self)
    }

    /// See [`collect_operations`].
    pub fn operations(&self) -> Vec<Operation> {
        collect_operations(self)
    }

    /// See [`resolve_log_level`].
    pub fn resolve_log_level(&self) -> Severity {
        resolve_log_level(self)
    }

    /// The deepest cause that is not a node, if any.
    pub fn leaf(&self) -> Option<&(dyn StdError + 'static)> {
        self.chain().last().and_then(ErrorNode::cause_dyn)
    }
}
