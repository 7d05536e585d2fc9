//! Layout change collection
//!
//! After a layout pass, the diff walks the dirty part of a tree and reports
//! each node whose computed box differs from the one it last reported.

use std::fmt;

use tracing::{debug, trace};

use crate::error::{ShadowError, TreeError};
use crate::layout::{LayoutBox, LayoutEngine};

use super::node::NodeTag;
use super::tree::ShadowTree;

/// Whether a change record introduces a node or moves an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// First box ever reported for the node
    Add,
    /// Box differs from the previously reported one
    Update,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Add => f.write_str("add"),
            ChangeKind::Update => f.write_str("update"),
        }
    }
}

/// One entry of a diff pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutChange {
    pub tag: NodeTag,
    pub layout: LayoutBox,
    pub kind: ChangeKind,
}

impl fmt::Display for LayoutChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.tag, self.layout)
    }
}

impl<E: LayoutEngine> ShadowTree<E> {
    /// Collect change records for `tag` and its dirty descendants
    ///
    /// Children are visited in order and their records precede their
    /// parent's. Every visited node ends up clean. Clean children are
    /// skipped without looking at their boxes: this is only correct because
    /// [`mark_dirty`](ShadowTree::mark_dirty) dirties whole trees, so a clean
    /// child of a dirty node cannot have a stale box.
    pub fn collect_layout_changes(&mut self, tag: NodeTag) -> Result<Vec<LayoutChange>, ShadowError> {
        let mut changes = Vec::new();
        self.collect_into(tag, &mut changes)?;
        debug!(%tag, changes = changes.len(), "collected layout changes");
        Ok(changes)
    }

    fn collect_into(&mut self, tag: NodeTag, changes: &mut Vec<LayoutChange>) -> Result<(), ShadowError> {
        let node = self.nodes.get(&tag).ok_or(TreeError::UnknownTag(tag))?;
        let engine_node = node.engine_node;
        let children = node.children.clone();

        for child in children {
            let dirty = self.nodes.get(&child).is_some_and(|n| n.is_dirty);
            if dirty {
                self.collect_into(child, changes)?;
            }
        }

        let layout = self.engine.computed_box(engine_node)?;
        let node = self.nodes.get_mut(&tag).ok_or(TreeError::UnknownTag(tag))?;
        let kind = match node.previous_layout {
            None => Some(ChangeKind::Add),
            Some(previous) if previous.same_as(&layout) => None,
            Some(_) => Some(ChangeKind::Update),
        };
        if let Some(kind) = kind {
            trace!(%tag, %kind, %layout, "layout changed");
            node.previous_layout = Some(layout);
            changes.push(LayoutChange { tag, layout, kind });
        }
        node.is_dirty = false;
        Ok(())
    }
}
