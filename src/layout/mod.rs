//! Layout engines
//!
//! A [`LayoutEngine`] owns one node per shadow node, keeps the style and the
//! child list of each, and computes boxes for a tree on request. The shadow
//! tree only talks to engines through this trait, so the box model lives
//! entirely behind it.
//!
//! Two engines are provided:
//! - [`ConstraintEngine`] solves a flexbox subset with the kasuari constraint solver
//! - [`ManualEngine`] reports boxes assigned by the caller

pub mod config;
pub mod engine;
pub mod error;
pub mod manual;
pub mod solver;
pub mod store;
pub mod types;

pub use config::{ConfigError, LayoutConfig};
pub use engine::ConstraintEngine;
pub use error::EngineError;
pub use manual::ManualEngine;
pub use solver::SolverError;
pub use types::{EngineNodeId, LayoutBox};

use crate::style::{StyleProperty, StyleValue};

/// Node storage, styling and box computation for one tree
///
/// Boxes returned by [`computed_box`](LayoutEngine::computed_box) are relative
/// to the parent's border box and reflect the most recent
/// [`calculate_layout`](LayoutEngine::calculate_layout) over an ancestor.
pub trait LayoutEngine {
    /// Create a detached node with the default style
    fn new_node(&mut self) -> EngineNodeId;

    fn style(&self, node: EngineNodeId, property: StyleProperty) -> Result<StyleValue, EngineError>;

    /// Write one style property; `StyleValue::Undefined` resets it
    fn set_style(
        &mut self,
        node: EngineNodeId,
        property: StyleProperty,
        value: StyleValue,
    ) -> Result<(), EngineError>;

    fn children(&self, node: EngineNodeId) -> Result<&[EngineNodeId], EngineError>;

    fn insert_child(
        &mut self,
        parent: EngineNodeId,
        child: EngineNodeId,
        index: usize,
    ) -> Result<(), EngineError>;

    fn remove_child(&mut self, parent: EngineNodeId, child: EngineNodeId) -> Result<(), EngineError>;

    /// Compute boxes for `root` and all of its descendants
    fn calculate_layout(&mut self, root: EngineNodeId, config: &LayoutConfig)
        -> Result<(), EngineError>;

    fn computed_box(&self, node: EngineNodeId) -> Result<LayoutBox, EngineError>;

    /// Release `node` and every descendant; the handles become invalid
    fn release_subtree(&mut self, node: EngineNodeId) -> Result<(), EngineError>;
}
