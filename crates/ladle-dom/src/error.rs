//! Errors raised by the tree mutation API.
//!
//! Malformed markup never ends up here: the parser recovers from it. These
//! are programmer errors, reported synchronously to the caller that asked
//! for an impossible structure.

use thiserror::Error;

use crate::NodeId;

/// Failure of a tree operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The requested edit would produce something that is not a tree, such as
    /// inserting a node into its own subtree or giving a text node children.
    #[error("invalid structure: {0}")]
    InvalidStructure(String),

    /// The operation is relative to a node's parent, but the node is detached.
    #[error("node {0} has no parent")]
    NoParent(NodeId),

    /// A constructor or setter received an unusable value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
