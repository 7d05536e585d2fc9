//! Error types for shadow tree operations

use thiserror::Error;

use crate::layout::EngineError;
use crate::shadow::NodeTag;

/// Structural misuse of the shadow tree
///
/// Every operation validates its arguments before touching any state, so a
/// returned `TreeError` means nothing changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("no shadow node with tag {0}")]
    UnknownTag(NodeTag),

    #[error("a shadow node with tag {0} already exists")]
    DuplicateTag(NodeTag),

    #[error("index {index} out of range for node {parent} with {len} children")]
    IndexOutOfRange {
        parent: NodeTag,
        index: usize,
        len: usize,
    },

    #[error("node {child} is not a child of node {parent}")]
    NotAChild { parent: NodeTag, child: NodeTag },

    #[error("node {child} is already attached to node {parent}")]
    AlreadyAttached { child: NodeTag, parent: NodeTag },

    #[error("inserting node {child} under node {parent} would create a cycle")]
    Cycle { parent: NodeTag, child: NodeTag },

    #[error("node {tag} is still attached to node {parent}; remove it before purging")]
    PurgeAttached { tag: NodeTag, parent: NodeTag },

    #[error("node {tag} is attached to node {parent} and cannot be laid out as a root")]
    NotARoot { tag: NodeTag, parent: NodeTag },
}

/// Errors returned by [`ShadowTree`](crate::shadow::ShadowTree) operations
#[derive(Debug, Error)]
pub enum ShadowError {
    #[error("invalid tree operation: {0}")]
    Tree(#[from] TreeError),

    #[error("layout engine error: {0}")]
    Engine(#[from] EngineError),
}

impl ShadowError {
    /// The structural error, if this is one
    pub fn as_tree_error(&self) -> Option<&TreeError> {
        match self {
            ShadowError::Tree(err) => Some(err),
            ShadowError::Engine(_) => None,
        }
    }
}
