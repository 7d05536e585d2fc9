use std::collections::HashMap;
use std::fmt;

use crate::layout::{EngineNodeId, LayoutBox};

/// Externally assigned identity of a shadow node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeTag(pub u32);

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeTag {
    fn from(tag: u32) -> Self {
        NodeTag(tag)
    }
}

/// Tag-addressed storage for the nodes of a shadow tree
pub type NodeArena = HashMap<NodeTag, ShadowNode>;

/// One node of the shadow tree
///
/// Owns exactly one layout-engine node. Links to other nodes are tags into
/// the [`NodeArena`]; the parent link never owns its target.
#[derive(Debug, Clone)]
pub struct ShadowNode {
    pub(crate) tag: NodeTag,
    pub(crate) view_name: String,
    pub(crate) engine_node: EngineNodeId,
    pub(crate) parent: Option<NodeTag>,
    pub(crate) children: Vec<NodeTag>,
    pub(crate) previous_layout: Option<LayoutBox>,
    pub(crate) is_dirty: bool,
    pub(crate) is_hidden: bool,
    pub(crate) is_new_view: bool,
    pub(crate) background_color: Option<String>,
}

impl ShadowNode {
    pub(crate) fn new(tag: NodeTag, view_name: String, engine_node: EngineNodeId) -> Self {
        Self {
            tag,
            view_name,
            engine_node,
            parent: None,
            children: Vec::new(),
            previous_layout: None,
            is_dirty: true,
            is_hidden: false,
            is_new_view: false,
            background_color: None,
        }
    }

    pub fn tag(&self) -> NodeTag {
        self.tag
    }

    /// Kind of view this node mirrors (e.g. `View`, `Text`)
    pub fn view_name(&self) -> &str {
        &self.view_name
    }

    /// Handle of the owned layout-engine node
    pub fn engine_node(&self) -> EngineNodeId {
        self.engine_node
    }

    pub fn parent(&self) -> Option<NodeTag> {
        self.parent
    }

    pub fn children(&self) -> &[NodeTag] {
        &self.children
    }

    /// Last box reported by a diff pass; `None` until the first report
    pub fn previous_layout(&self) -> Option<LayoutBox> {
        self.previous_layout
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    pub fn is_new_view(&self) -> bool {
        self.is_new_view
    }

    pub fn background_color(&self) -> Option<&str> {
        self.background_color.as_deref()
    }
}
