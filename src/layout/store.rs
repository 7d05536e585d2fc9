//! Slot storage for layout-engine nodes
//!
//! Both engines keep their nodes here. Released slots are recycled through a
//! free list and generation counters make stale handles fail lookups.

use crate::style::Style;

use super::error::EngineError;
use super::types::{EngineNodeId, LayoutBox};

/// A node as seen by a layout engine
#[derive(Debug, Clone, Default)]
pub struct EngineNode {
    pub style: Style,
    pub children: Vec<EngineNodeId>,
    pub parent: Option<EngineNodeId>,
    /// Last computed box, relative to the parent's border box
    pub layout: LayoutBox,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<EngineNode>,
}

/// Generational slot storage for [`EngineNode`]s
#[derive(Debug, Default)]
pub struct NodeStore {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached node with the default style
    pub fn create(&mut self) -> EngineNodeId {
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation += 1;
            slot.node = Some(EngineNode::default());
            EngineNodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(EngineNode::default()),
            });
            EngineNodeId {
                index,
                generation: 0,
            }
        }
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: EngineNodeId) -> bool {
        self.get(id).is_ok()
    }

    pub fn get(&self, id: EngineNodeId) -> Result<&EngineNode, EngineError> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(EngineError::UnknownNode(id))
    }

    pub fn get_mut(&mut self, id: EngineNodeId) -> Result<&mut EngineNode, EngineError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(EngineError::UnknownNode(id))
    }

    /// Inserts `child` into `parent`'s children at `index`
    pub fn insert_child(
        &mut self,
        parent: EngineNodeId,
        child: EngineNodeId,
        index: usize,
    ) -> Result<(), EngineError> {
        let len = self.get(parent)?.children.len();
        let child_node = self.get(child)?;
        if parent == child || child_node.parent.is_some() {
            return Err(EngineError::InvalidAttachment { parent, child });
        }
        if index > len {
            return Err(EngineError::index_out_of_range(parent, index, len));
        }

        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.children.insert(index, child);
        Ok(())
    }

    /// Detaches `child` from `parent`
    pub fn remove_child(
        &mut self,
        parent: EngineNodeId,
        child: EngineNodeId,
    ) -> Result<(), EngineError> {
        let position = self
            .get(parent)?
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or_else(|| EngineError::not_a_child(parent, child))?;

        self.get_mut(parent)?.children.remove(position);
        self.get_mut(child)?.parent = None;
        Ok(())
    }

    /// Frees `id` and all of its descendants, detaching it from its parent
    ///
    /// Returns the number of nodes released.
    pub fn release_subtree(&mut self, id: EngineNodeId) -> Result<usize, EngineError> {
        if let Some(parent) = self.get(id)?.parent {
            self.remove_child(parent, id)?;
        }

        let mut released = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                slot.generation += 1;
                self.free_list.push(current.index);
                released += 1;
            }
        }
        Ok(released)
    }

    /// Collects `root` and its descendants in pre-order
    pub fn subtree(&self, root: EngineNodeId) -> Result<Vec<EngineNodeId>, EngineError> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let node = self.get(current)?;
            order.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove_child() {
        let mut store = NodeStore::new();
        let parent = store.create();
        let a = store.create();
        let b = store.create();

        store.insert_child(parent, a, 0).unwrap();
        store.insert_child(parent, b, 0).unwrap();
        assert_eq!(store.get(parent).unwrap().children, vec![b, a]);
        assert_eq!(store.get(a).unwrap().parent, Some(parent));

        store.remove_child(parent, b).unwrap();
        assert_eq!(store.get(parent).unwrap().children, vec![a]);
        assert_eq!(store.get(b).unwrap().parent, None);
    }

    #[test]
    fn test_insert_rejects_bad_index_and_second_parent() {
        let mut store = NodeStore::new();
        let parent = store.create();
        let other = store.create();
        let child = store.create();

        assert!(matches!(
            store.insert_child(parent, child, 1),
            Err(EngineError::IndexOutOfRange { index: 1, len: 0, .. })
        ));
        store.insert_child(parent, child, 0).unwrap();
        assert!(matches!(
            store.insert_child(other, child, 0),
            Err(EngineError::InvalidAttachment { .. })
        ));
        assert!(matches!(
            store.insert_child(parent, parent, 0),
            Err(EngineError::InvalidAttachment { .. })
        ));
    }

    #[test]
    fn test_release_subtree_frees_descendants() {
        let mut store = NodeStore::new();
        let root = store.create();
        let child = store.create();
        let grandchild = store.create();
        store.insert_child(root, child, 0).unwrap();
        store.insert_child(child, grandchild, 0).unwrap();

        let released = store.release_subtree(child).unwrap();
        assert_eq!(released, 2);
        assert_eq!(store.len(), 1);
        assert!(store.get(root).unwrap().children.is_empty());
        assert!(!store.contains(grandchild));
    }

    #[test]
    fn test_stale_handle_after_slot_reuse() {
        let mut store = NodeStore::new();
        let first = store.create();
        store.release_subtree(first).unwrap();
        let second = store.create();

        assert_eq!(first.index(), second.index());
        assert!(matches!(store.get(first), Err(EngineError::UnknownNode(_))));
        assert!(store.get(second).is_ok());
    }

    #[test]
    fn test_subtree_is_pre_order() {
        let mut store = NodeStore::new();
        let root = store.create();
        let a = store.create();
        let b = store.create();
        let a1 = store.create();
        store.insert_child(root, a, 0).unwrap();
        store.insert_child(root, b, 1).unwrap();
        store.insert_child(a, a1, 0).unwrap();

        assert_eq!(store.subtree(root).unwrap(), vec![root, a, a1, b]);
    }
}
