//! An engine whose boxes are assigned by the caller
//!
//! Useful when layout happens elsewhere (or in tests that need exact control
//! over which boxes change between passes).

use tracing::trace;

use crate::style::{StyleProperty, StyleValue};

use super::config::LayoutConfig;
use super::error::EngineError;
use super::store::NodeStore;
use super::types::{EngineNodeId, LayoutBox};
use super::LayoutEngine;

#[derive(Debug, Default)]
pub struct ManualEngine {
    store: NodeStore,
}

impl ManualEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the box reported for `node` from now on
    pub fn set_computed_box(&mut self, node: EngineNodeId, layout: LayoutBox) -> Result<(), EngineError> {
        self.store.get_mut(node)?.layout = layout;
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.store.len()
    }
}

impl LayoutEngine for ManualEngine {
    fn new_node(&mut self) -> EngineNodeId {
        self.store.create()
    }

    fn style(&self, node: EngineNodeId, property: StyleProperty) -> Result<StyleValue, EngineError> {
        Ok(property.read(&self.store.get(node)?.style))
    }

    fn set_style(
        &mut self,
        node: EngineNodeId,
        property: StyleProperty,
        value: StyleValue,
    ) -> Result<(), EngineError> {
        property.write(&mut self.store.get_mut(node)?.style, value)?;
        Ok(())
    }

    fn children(&self, node: EngineNodeId) -> Result<&[EngineNodeId], EngineError> {
        Ok(&self.store.get(node)?.children)
    }

    fn insert_child(
        &mut self,
        parent: EngineNodeId,
        child: EngineNodeId,
        index: usize,
    ) -> Result<(), EngineError> {
        self.store.insert_child(parent, child, index)
    }

    fn remove_child(&mut self, parent: EngineNodeId, child: EngineNodeId) -> Result<(), EngineError> {
        self.store.remove_child(parent, child)
    }

    fn calculate_layout(&mut self, root: EngineNodeId, _config: &LayoutConfig) -> Result<(), EngineError> {
        let nodes = self.store.subtree(root)?;
        trace!(root = ?root, nodes = nodes.len(), "manual layout keeps assigned boxes");
        Ok(())
    }

    fn computed_box(&self, node: EngineNodeId) -> Result<LayoutBox, EngineError> {
        Ok(self.store.get(node)?.layout)
    }

    fn release_subtree(&mut self, node: EngineNodeId) -> Result<(), EngineError> {
        self.store.release_subtree(node)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assigned_box_survives_layout() {
        let mut engine = ManualEngine::new();
        let root = engine.new_node();
        let layout = LayoutBox::new(1.0, 2.0, 3.0, 4.0);
        engine.set_computed_box(root, layout).unwrap();
        engine.calculate_layout(root, &LayoutConfig::default()).unwrap();
        assert_eq!(engine.computed_box(root).unwrap(), layout);
    }

    #[test]
    fn test_new_node_box_is_zero() {
        let mut engine = ManualEngine::new();
        let node = engine.new_node();
        assert_eq!(engine.computed_box(node).unwrap(), LayoutBox::ZERO);
    }

    #[test]
    fn test_style_round_trips_through_store() {
        let mut engine = ManualEngine::new();
        let node = engine.new_node();
        engine
            .set_style(node, StyleProperty::FlexGrow, StyleValue::Number(2.0))
            .unwrap();
        assert_eq!(
            engine.style(node, StyleProperty::FlexGrow).unwrap(),
            StyleValue::Number(2.0)
        );
    }

    #[test]
    fn test_released_node_is_unknown() {
        let mut engine = ManualEngine::new();
        let node = engine.new_node();
        engine.release_subtree(node).unwrap();
        assert!(matches!(
            engine.set_computed_box(node, LayoutBox::ZERO),
            Err(EngineError::UnknownNode(_))
        ));
        assert_eq!(engine.node_count(), 0);
    }
}
