//! Error types for layout engines

use thiserror::Error;

use crate::style::StyleError;

use super::solver::SolverError;
use super::types::EngineNodeId;

/// Errors reported by a [`LayoutEngine`](super::LayoutEngine)
#[derive(Debug, Error)]
pub enum EngineError {
    /// Handle does not refer to a live node (never created or already released)
    #[error("unknown layout node {0:?}")]
    UnknownNode(EngineNodeId),

    /// Removal of a node that is not a child of the given parent
    #[error("layout node {child:?} is not a child of {parent:?}")]
    NotAChild {
        parent: EngineNodeId,
        child: EngineNodeId,
    },

    /// Insertion index past the end of the child list
    #[error("index {index} out of range for layout node {parent:?} with {len} children")]
    IndexOutOfRange {
        parent: EngineNodeId,
        index: usize,
        len: usize,
    },

    /// Insertion of a node that already has a parent, or into itself
    #[error("layout node {child:?} cannot be attached to {parent:?}")]
    InvalidAttachment {
        parent: EngineNodeId,
        child: EngineNodeId,
    },

    /// Style value rejected by the property it was written to
    #[error("invalid style: {0}")]
    Style(#[from] StyleError),

    /// Constraint solver error
    #[error("constraint solver error: {0}")]
    Solver(#[from] SolverError),
}

impl EngineError {
    pub fn not_a_child(parent: EngineNodeId, child: EngineNodeId) -> Self {
        Self::NotAChild { parent, child }
    }

    pub fn index_out_of_range(parent: EngineNodeId, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { parent, index, len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(index: u32) -> EngineNodeId {
        EngineNodeId {
            index,
            generation: 0,
        }
    }

    #[test]
    fn test_index_out_of_range_display() {
        let err = EngineError::index_out_of_range(id(1), 4, 2);
        let message = err.to_string();
        assert!(message.contains("index 4"));
        assert!(message.contains("2 children"));
    }

    #[test]
    fn test_style_error_converts() {
        let err: EngineError = StyleError::UnknownProperty("colour".to_string()).into();
        assert!(err.to_string().contains("colour"));
    }
}
