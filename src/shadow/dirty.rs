//! Dirty propagation
//!
//! Dirtiness is coarse: any change anywhere marks the whole tree containing
//! the changed node. The diff pass relies on this to skip clean subtrees.

use tracing::trace;

use crate::error::TreeError;

use super::node::{NodeArena, NodeTag};

/// Follow parent links from `tag` up to its root
pub fn find_root(nodes: &NodeArena, tag: NodeTag) -> Result<NodeTag, TreeError> {
    let mut current = tag;
    loop {
        let node = nodes.get(&current).ok_or(TreeError::UnknownTag(current))?;
        match node.parent {
            Some(parent) => current = parent,
            None => return Ok(current),
        }
    }
}

/// Mark every node in the tree containing `tag` dirty
///
/// Returns the root of that tree.
pub fn propagate_dirty(nodes: &mut NodeArena, tag: NodeTag) -> Result<NodeTag, TreeError> {
    let root = find_root(nodes, tag)?;

    let mut marked = 0usize;
    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        if let Some(node) = nodes.get_mut(&current) {
            node.is_dirty = true;
            stack.extend(node.children.iter().copied());
            marked += 1;
        }
    }

    trace!(%tag, %root, marked, "propagated dirty flag");
    Ok(root)
}
