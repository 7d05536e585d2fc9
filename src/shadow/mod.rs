//! Shadow tree
//!
//! A [`ShadowTree`] mirrors a host's view hierarchy. Every node forwards its
//! style to a node of a [`LayoutEngine`](crate::layout::LayoutEngine) and
//! remembers the last box it reported, so that after each layout pass only
//! the nodes whose boxes changed are handed to the rendering surface.
//!
//! # Example
//!
//! ```rust
//! use shadow_layout::layout::{ConstraintEngine, LayoutConfig};
//! use shadow_layout::shadow::{ChangeKind, NodeTag, ShadowTree};
//! use shadow_layout::style::{StyleProperty, StyleValue};
//!
//! let mut tree = ShadowTree::new(ConstraintEngine::new());
//! tree.create_node(NodeTag(1), "View").unwrap();
//! tree.set_style(NodeTag(1), StyleProperty::Width, StyleValue::Number(100.0)).unwrap();
//! tree.set_style(NodeTag(1), StyleProperty::Height, StyleValue::Number(100.0)).unwrap();
//!
//! let changes = tree.layout_pass(NodeTag(1), &LayoutConfig::default()).unwrap();
//! assert_eq!(changes.len(), 1);
//! assert_eq!(changes[0].kind, ChangeKind::Add);
//! assert!(tree.layout_pass(NodeTag(1), &LayoutConfig::default()).unwrap().is_empty());
//! ```

mod diff;
mod dirty;
mod node;
mod tree;

pub use diff::{ChangeKind, LayoutChange};
pub use dirty::{find_root, propagate_dirty};
pub use node::{NodeArena, NodeTag, ShadowNode};
pub use tree::ShadowTree;
