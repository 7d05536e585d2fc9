//! The shadow tree arena and its mutations

use tracing::{debug, debug_span, trace};

use crate::error::{ShadowError, TreeError};
use crate::layout::{LayoutBox, LayoutConfig, LayoutEngine, ManualEngine};
use crate::style::{StyleProperty, StyleValue};

use super::diff::LayoutChange;
use super::dirty::{find_root, propagate_dirty};
use super::node::{NodeArena, NodeTag, ShadowNode};

/// A forest of shadow nodes mirrored into a layout engine
///
/// Nodes are addressed by their externally assigned [`NodeTag`]. Each node
/// owns one engine node, and the engine's child lists always match the
/// shadow child lists.
#[derive(Debug)]
pub struct ShadowTree<E: LayoutEngine> {
    pub(crate) nodes: NodeArena,
    pub(crate) engine: E,
}

impl<E: LayoutEngine> ShadowTree<E> {
    pub fn new(engine: E) -> Self {
        Self {
            nodes: NodeArena::new(),
            engine,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Create a detached, dirty node with the default style
    pub fn create_node(&mut self, tag: NodeTag, view_name: impl Into<String>) -> Result<(), ShadowError> {
        if self.nodes.contains_key(&tag) {
            return Err(TreeError::DuplicateTag(tag).into());
        }
        let view_name = view_name.into();
        let engine_node = self.engine.new_node();
        trace!(%tag, view = %view_name, engine_node = ?engine_node, "created shadow node");
        self.nodes
            .insert(tag, ShadowNode::new(tag, view_name, engine_node));
        Ok(())
    }

    pub fn node(&self, tag: NodeTag) -> Option<&ShadowNode> {
        self.nodes.get(&tag)
    }

    fn get(&self, tag: NodeTag) -> Result<&ShadowNode, TreeError> {
        self.nodes.get(&tag).ok_or(TreeError::UnknownTag(tag))
    }

    fn get_mut(&mut self, tag: NodeTag) -> Result<&mut ShadowNode, TreeError> {
        self.nodes.get_mut(&tag).ok_or(TreeError::UnknownTag(tag))
    }

    pub fn contains(&self, tag: NodeTag) -> bool {
        self.nodes.contains_key(&tag)
    }

    /// Number of live shadow nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, tag: NodeTag) -> Result<Option<NodeTag>, TreeError> {
        Ok(self.get(tag)?.parent)
    }

    pub fn children(&self, tag: NodeTag) -> Result<&[NodeTag], TreeError> {
        Ok(&self.get(tag)?.children)
    }

    pub fn is_dirty(&self, tag: NodeTag) -> Result<bool, TreeError> {
        Ok(self.get(tag)?.is_dirty)
    }

    pub fn previous_layout(&self, tag: NodeTag) -> Result<Option<LayoutBox>, TreeError> {
        Ok(self.get(tag)?.previous_layout)
    }

    /// Topmost ancestor of `tag` (the node itself when detached)
    pub fn root_of(&self, tag: NodeTag) -> Result<NodeTag, TreeError> {
        find_root(&self.nodes, tag)
    }

    /// `tag` and its descendants in pre-order
    pub fn subtree(&self, tag: NodeTag) -> Result<Vec<NodeTag>, TreeError> {
        let mut order = Vec::new();
        let mut stack = vec![tag];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.get(current)?.children.iter().rev().copied());
        }
        Ok(order)
    }

    /// Current value of a style property, as held by the engine
    pub fn style(&self, tag: NodeTag, property: StyleProperty) -> Result<StyleValue, ShadowError> {
        let engine_node = self.get(tag)?.engine_node;
        Ok(self.engine.style(engine_node, property)?)
    }

    /// Write a style property and dirty the node's tree
    ///
    /// A value the engine rejects leaves both the style and the dirty flags
    /// untouched.
    pub fn set_style(
        &mut self,
        tag: NodeTag,
        property: StyleProperty,
        value: StyleValue,
    ) -> Result<(), ShadowError> {
        let engine_node = self.get(tag)?.engine_node;
        self.engine.set_style(engine_node, property, value)?;
        trace!(%tag, %property, %value, "style set");
        self.mark_dirty(tag)?;
        Ok(())
    }

    pub fn background_color(&self, tag: NodeTag) -> Result<Option<&str>, TreeError> {
        Ok(self.get(tag)?.background_color.as_deref())
    }

    /// Store the background color for the rendering surface; layout is unaffected
    pub fn set_background_color(&mut self, tag: NodeTag, color: Option<String>) -> Result<(), TreeError> {
        self.get_mut(tag)?.background_color = color;
        Ok(())
    }

    pub fn set_hidden(&mut self, tag: NodeTag, hidden: bool) -> Result<(), TreeError> {
        self.get_mut(tag)?.is_hidden = hidden;
        Ok(())
    }

    pub fn set_new_view(&mut self, tag: NodeTag, new_view: bool) -> Result<(), TreeError> {
        self.get_mut(tag)?.is_new_view = new_view;
        Ok(())
    }

    /// Dirty every node in the tree containing `tag`
    pub fn mark_dirty(&mut self, tag: NodeTag) -> Result<(), TreeError> {
        propagate_dirty(&mut self.nodes, tag)?;
        Ok(())
    }

    /// Insert the detached node `child` into `parent`'s children at `index`
    ///
    /// `child` must not already have a parent and must not be `parent` or one
    /// of its ancestors.
    pub fn insert_child(&mut self, parent: NodeTag, child: NodeTag, index: usize) -> Result<(), ShadowError> {
        let parent_node = self.get(parent)?;
        let child_node = self.get(child)?;
        if let Some(current) = child_node.parent {
            return Err(TreeError::AlreadyAttached { child, parent: current }.into());
        }
        if self.root_of(parent)? == child {
            return Err(TreeError::Cycle { parent, child }.into());
        }
        let len = parent_node.children.len();
        if index > len {
            return Err(TreeError::IndexOutOfRange { parent, index, len }.into());
        }
        let (parent_engine, child_engine) = (parent_node.engine_node, child_node.engine_node);

        self.engine.insert_child(parent_engine, child_engine, index)?;
        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.children.insert(index, child);
        debug!(%parent, %child, index, "inserted child");

        self.mark_dirty(parent)?;
        Ok(())
    }

    /// Detach `child` from `parent`, keeping the child subtree alive
    pub fn remove_child(&mut self, parent: NodeTag, child: NodeTag) -> Result<(), ShadowError> {
        let parent_node = self.get(parent)?;
        let parent_engine = parent_node.engine_node;
        let position = parent_node
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or(TreeError::NotAChild { parent, child })?;
        let child_engine = self.get(child)?.engine_node;

        self.engine.remove_child(parent_engine, child_engine)?;
        self.get_mut(parent)?.children.remove(position);
        self.get_mut(child)?.parent = None;
        debug!(%parent, %child, "removed child");

        self.mark_dirty(parent)?;
        Ok(())
    }

    /// Destroy a detached node and its whole subtree
    ///
    /// Returns the number of shadow nodes dropped.
    pub fn purge(&mut self, tag: NodeTag) -> Result<usize, ShadowError> {
        let node = self.get(tag)?;
        if let Some(parent) = node.parent {
            return Err(TreeError::PurgeAttached { tag, parent }.into());
        }
        let engine_node = node.engine_node;

        self.engine.release_subtree(engine_node)?;

        let mut purged = 0;
        let mut stack = vec![tag];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
                purged += 1;
            }
        }
        debug!(%tag, purged, "purged subtree");
        Ok(purged)
    }

    /// Compute layout for the tree rooted at `root`, then collect its changes
    ///
    /// `root` must be detached; an attached node is rejected with
    /// [`TreeError::NotARoot`].
    pub fn layout_pass(&mut self, root: NodeTag, config: &LayoutConfig) -> Result<Vec<LayoutChange>, ShadowError> {
        let span = debug_span!("layout_pass", %root);
        let _guard = span.enter();

        let node = self.get(root)?;
        if let Some(parent) = node.parent {
            return Err(TreeError::NotARoot { tag: root, parent }.into());
        }
        let engine_node = node.engine_node;
        self.engine.calculate_layout(engine_node, config)?;
        self.collect_layout_changes(root)
    }
}

impl ShadowTree<ManualEngine> {
    /// Assign the box the engine reports for `tag` from the next pass on
    pub fn set_computed_box(&mut self, tag: NodeTag, layout: LayoutBox) -> Result<(), ShadowError> {
        let engine_node = self.get(tag)?.engine_node;
        self.engine.set_computed_box(engine_node, layout)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::EngineError;

    fn tree(tags: &[u32]) -> ShadowTree<ManualEngine> {
        let mut tree = ShadowTree::new(ManualEngine::new());
        for &tag in tags {
            tree.create_node(NodeTag(tag), "View").unwrap();
        }
        tree
    }

    fn tree_error(result: Result<impl std::fmt::Debug, ShadowError>) -> TreeError {
        match result {
            Err(ShadowError::Tree(err)) => err,
            other => panic!("expected a tree error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_tag_is_rejected() {
        let mut tree = tree(&[1]);
        assert_eq!(
            tree_error(tree.create_node(NodeTag(1), "Text")),
            TreeError::DuplicateTag(NodeTag(1))
        );
        assert_eq!(tree.node(NodeTag(1)).unwrap().view_name(), "View");
    }

    #[test]
    fn test_insert_keeps_engine_children_in_sync() {
        let mut tree = tree(&[1, 2, 3, 4]);
        tree.insert_child(NodeTag(1), NodeTag(2), 0).unwrap();
        tree.insert_child(NodeTag(1), NodeTag(3), 0).unwrap();
        tree.insert_child(NodeTag(1), NodeTag(4), 1).unwrap();

        assert_eq!(
            tree.children(NodeTag(1)).unwrap(),
            &[NodeTag(3), NodeTag(4), NodeTag(2)]
        );
        let engine_children: Vec<_> = [3, 4, 2]
            .iter()
            .map(|&t| tree.node(NodeTag(t)).unwrap().engine_node())
            .collect();
        let root_engine = tree.node(NodeTag(1)).unwrap().engine_node();
        assert_eq!(tree.engine().children(root_engine).unwrap(), engine_children.as_slice());
        assert_eq!(tree.parent(NodeTag(4)).unwrap(), Some(NodeTag(1)));
    }

    #[test]
    fn test_index_out_of_range_changes_nothing() {
        let mut tree = tree(&[1, 2]);
        assert_eq!(
            tree_error(tree.insert_child(NodeTag(1), NodeTag(2), 1)),
            TreeError::IndexOutOfRange {
                parent: NodeTag(1),
                index: 1,
                len: 0
            }
        );
        assert_eq!(tree.parent(NodeTag(2)).unwrap(), None);
    }

    #[test]
    fn test_reparenting_requires_removal() {
        let mut tree = tree(&[1, 2, 3]);
        tree.insert_child(NodeTag(1), NodeTag(3), 0).unwrap();
        assert_eq!(
            tree_error(tree.insert_child(NodeTag(2), NodeTag(3), 0)),
            TreeError::AlreadyAttached {
                child: NodeTag(3),
                parent: NodeTag(1)
            }
        );

        tree.remove_child(NodeTag(1), NodeTag(3)).unwrap();
        tree.insert_child(NodeTag(2), NodeTag(3), 0).unwrap();
        assert_eq!(tree.root_of(NodeTag(3)).unwrap(), NodeTag(2));
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut tree = tree(&[1, 2]);
        tree.insert_child(NodeTag(1), NodeTag(2), 0).unwrap();
        assert_eq!(
            tree_error(tree.insert_child(NodeTag(2), NodeTag(1), 0)),
            TreeError::Cycle {
                parent: NodeTag(2),
                child: NodeTag(1)
            }
        );
        assert_eq!(
            tree_error(tree.insert_child(NodeTag(1), NodeTag(1), 0)),
            TreeError::Cycle {
                parent: NodeTag(1),
                child: NodeTag(1)
            }
        );
    }

    #[test]
    fn test_remove_non_child() {
        let mut tree = tree(&[1, 2]);
        assert_eq!(
            tree_error(tree.remove_child(NodeTag(1), NodeTag(2))),
            TreeError::NotAChild {
                parent: NodeTag(1),
                child: NodeTag(2)
            }
        );
    }

    #[test]
    fn test_removal_dirties_former_tree() {
        let mut tree = tree(&[1, 2]);
        tree.insert_child(NodeTag(1), NodeTag(2), 0).unwrap();
        tree.collect_layout_changes(NodeTag(1)).unwrap();
        assert!(!tree.is_dirty(NodeTag(1)).unwrap());

        tree.remove_child(NodeTag(1), NodeTag(2)).unwrap();
        assert!(tree.is_dirty(NodeTag(1)).unwrap());
        assert!(tree.children(NodeTag(1)).unwrap().is_empty());
    }

    #[test]
    fn test_rejected_style_does_not_dirty() {
        let mut tree = tree(&[1]);
        tree.collect_layout_changes(NodeTag(1)).unwrap();

        let result = tree.set_style(NodeTag(1), StyleProperty::FlexDirection, StyleValue::Number(1.0));
        assert!(matches!(
            result,
            Err(ShadowError::Engine(EngineError::Style(_)))
        ));
        assert!(!tree.is_dirty(NodeTag(1)).unwrap());
    }

    #[test]
    fn test_purge_drops_subtree() {
        let mut tree = tree(&[1, 2, 3]);
        tree.insert_child(NodeTag(1), NodeTag(2), 0).unwrap();
        tree.insert_child(NodeTag(2), NodeTag(3), 0).unwrap();

        assert_eq!(
            tree_error(tree.purge(NodeTag(2))),
            TreeError::PurgeAttached {
                tag: NodeTag(2),
                parent: NodeTag(1)
            }
        );

        tree.remove_child(NodeTag(1), NodeTag(2)).unwrap();
        assert_eq!(tree.purge(NodeTag(2)).unwrap(), 2);
        assert_eq!(tree.len(), 1);
        assert!(!tree.contains(NodeTag(3)));
        assert_eq!(tree.engine().node_count(), 1);
        assert_eq!(
            tree_error(tree.purge(NodeTag(2))),
            TreeError::UnknownTag(NodeTag(2))
        );
    }

    #[test]
    fn test_layout_pass_rejects_attached_root() {
        let mut tree = tree(&[1, 2]);
        tree.insert_child(NodeTag(1), NodeTag(2), 0).unwrap();

        assert_eq!(
            tree_error(tree.layout_pass(NodeTag(2), &LayoutConfig::default())),
            TreeError::NotARoot {
                tag: NodeTag(2),
                parent: NodeTag(1)
            }
        );
        assert!(tree.is_dirty(NodeTag(2)).unwrap());
        assert_eq!(tree.previous_layout(NodeTag(2)).unwrap(), None);
    }

    #[test]
    fn test_assigned_box_keeps_engine_children_in_sync() {
        let mut tree = tree(&[1, 2]);
        tree.insert_child(NodeTag(1), NodeTag(2), 0).unwrap();

        let layout = LayoutBox::new(1.0, 2.0, 3.0, 4.0);
        tree.set_computed_box(NodeTag(2), layout).unwrap();
        assert_eq!(
            tree.layout_pass(NodeTag(1), &LayoutConfig::default()).unwrap()[0].layout,
            layout
        );

        tree.remove_child(NodeTag(1), NodeTag(2)).unwrap();
        let root_engine = tree.node(NodeTag(1)).unwrap().engine_node();
        assert!(tree.engine().children(root_engine).unwrap().is_empty());
        assert_eq!(
            tree_error(tree.set_computed_box(NodeTag(9), layout)),
            TreeError::UnknownTag(NodeTag(9))
        );
    }

    #[test]
    fn test_flags_do_not_dirty() {
        let mut tree = tree(&[1]);
        tree.collect_layout_changes(NodeTag(1)).unwrap();

        tree.set_hidden(NodeTag(1), true).unwrap();
        tree.set_new_view(NodeTag(1), true).unwrap();
        tree.set_background_color(NodeTag(1), Some("#ff0000".into()))
            .unwrap();

        let node = tree.node(NodeTag(1)).unwrap();
        assert!(node.is_hidden() && node.is_new_view());
        assert_eq!(tree.background_color(NodeTag(1)).unwrap(), Some("#ff0000"));
        assert!(!node.is_dirty());
    }
}
