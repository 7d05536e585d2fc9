//! Scene files
//!
//! A scene describes a shadow tree and a sequence of mutations in TOML:
//!
//! ```toml
//! root = 1
//!
//! [[nodes]]
//! tag = 1
//! children = [2]
//! style = { width = 100, height = 100 }
//!
//! [[nodes]]
//! tag = 2
//! view = "Image"
//! style = { width = 50, height = "50%" }
//!
//! [[steps]]
//! action = "set"
//! tag = 2
//! style = { width = 80 }
//! ```
//!
//! Nodes that no other node lists as a child (except `root`) start detached
//! and can be attached by an `insert` step. Style keys are camelCase property
//! names; values are numbers or strings such as `"auto"`, `"25%"` or `"row"`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::error::ShadowError;
use crate::layout::{ConstraintEngine, LayoutConfig, LayoutEngine};
use crate::shadow::{LayoutChange, NodeTag, ShadowTree};
use crate::style::{StyleError, StyleProperty, StyleValue};
use crate::surface::{ElementTable, RenderSurface, SurfaceError};

/// Errors that can occur when loading or running a scene
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse scene TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid style on node {tag}: {source}")]
    Style {
        tag: NodeTag,
        #[source]
        source: StyleError,
    },

    #[error("Unsupported value for '{property}' on node {tag}: {value}")]
    UnsupportedValue {
        tag: NodeTag,
        property: String,
        value: String,
    },

    #[error(transparent)]
    Shadow(#[from] ShadowError),

    #[error("Rendering surface rejected changes: {0}")]
    Surface(#[from] SurfaceError),
}

/// Style assignments in application order
pub type StyleList = Vec<(StyleProperty, StyleValue)>;

/// A node declared by a scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub tag: NodeTag,
    pub view: String,
    pub background: Option<String>,
    pub style: StyleList,
    pub children: Vec<NodeTag>,
}

/// A mutation applied between layout passes
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Set { tag: NodeTag, style: StyleList },
    /// Attach `child`; appends when `index` is not given
    Insert {
        parent: NodeTag,
        child: NodeTag,
        index: Option<usize>,
    },
    Remove { parent: NodeTag, child: NodeTag },
    Purge { tag: NodeTag },
}

impl Step {
    pub fn apply<E: LayoutEngine>(&self, tree: &mut ShadowTree<E>) -> Result<(), ShadowError> {
        match self {
            Step::Set { tag, style } => {
                for (property, value) in style {
                    tree.set_style(*tag, *property, *value)?;
                }
            }
            Step::Insert {
                parent,
                child,
                index,
            } => {
                let index = match index {
                    Some(index) => *index,
                    None => tree.children(*parent)?.len(),
                };
                tree.insert_child(*parent, *child, index)?;
            }
            Step::Remove { parent, child } => tree.remove_child(*parent, *child)?,
            Step::Purge { tag } => {
                tree.purge(*tag)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Set { tag, style } => {
                write!(f, "set {}", tag)?;
                for (property, value) in style {
                    write!(f, " {}={}", property, value)?;
                }
                Ok(())
            }
            Step::Insert {
                parent,
                child,
                index: Some(index),
            } => write!(f, "insert {} into {} at {}", child, parent, index),
            Step::Insert { parent, child, .. } => write!(f, "insert {} into {}", child, parent),
            Step::Remove { parent, child } => write!(f, "remove {} from {}", child, parent),
            Step::Purge { tag } => write!(f, "purge {}", tag),
        }
    }
}

/// A parsed scene
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub name: Option<String>,
    pub root: NodeTag,
    pub nodes: Vec<SceneNode>,
    pub steps: Vec<Step>,
}

/// Change records of one layout pass
#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    /// The step that preceded the pass; `None` for the initial pass
    pub step: Option<Step>,
    pub changes: Vec<LayoutChange>,
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.step {
            Some(step) => writeln!(f, "# {}", step)?,
            None => writeln!(f, "# initial")?,
        }
        if self.changes.is_empty() {
            writeln!(f, "  (no changes)")?;
        }
        for change in &self.changes {
            writeln!(f, "  {}", change)?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct TomlScene {
    metadata: Option<TomlMetadata>,
    root: u32,
    #[serde(default)]
    nodes: Vec<TomlNode>,
    #[serde(default)]
    steps: Vec<TomlStep>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
}

type TomlStyle = BTreeMap<String, toml::Value>;

#[derive(Deserialize)]
struct TomlNode {
    tag: u32,
    #[serde(default = "default_view")]
    view: String,
    background: Option<String>,
    #[serde(default)]
    style: TomlStyle,
    #[serde(default)]
    children: Vec<u32>,
}

fn default_view() -> String {
    "View".to_string()
}

#[derive(Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
enum TomlStep {
    Set { tag: u32, style: TomlStyle },
    Insert {
        parent: u32,
        child: u32,
        index: Option<usize>,
    },
    Remove { parent: u32, child: u32 },
    Purge { tag: u32 },
}

/// Convert a TOML style table, keeping the table's (sorted) key order
fn convert_style(tag: NodeTag, style: TomlStyle) -> Result<StyleList, SceneError> {
    style
        .into_iter()
        .map(|(name, raw)| {
            let property: StyleProperty = name
                .parse()
                .map_err(|source| SceneError::Style { tag, source })?;
            let text = match &raw {
                toml::Value::String(s) => s.clone(),
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                other => {
                    return Err(SceneError::UnsupportedValue {
                        tag,
                        property: name,
                        value: other.to_string(),
                    })
                }
            };
            let value = property
                .parse_value(&text)
                .map_err(|source| SceneError::Style { tag, source })?;
            Ok((property, value))
        })
        .collect()
}

impl Scene {
    /// Load a scene from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a scene from a TOML string
    pub fn from_str(content: &str) -> Result<Self, SceneError> {
        let parsed: TomlScene = toml::from_str(content)?;

        let nodes = parsed
            .nodes
            .into_iter()
            .map(|node| {
                let tag = NodeTag(node.tag);
                Ok(SceneNode {
                    tag,
                    view: node.view,
                    background: node.background,
                    style: convert_style(tag, node.style)?,
                    children: node.children.into_iter().map(NodeTag).collect(),
                })
            })
            .collect::<Result<Vec<_>, SceneError>>()?;

        let steps = parsed
            .steps
            .into_iter()
            .map(|step| {
                Ok(match step {
                    TomlStep::Set { tag, style } => Step::Set {
                        tag: NodeTag(tag),
                        style: convert_style(NodeTag(tag), style)?,
                    },
                    TomlStep::Insert {
                        parent,
                        child,
                        index,
                    } => Step::Insert {
                        parent: NodeTag(parent),
                        child: NodeTag(child),
                        index,
                    },
                    TomlStep::Remove { parent, child } => Step::Remove {
                        parent: NodeTag(parent),
                        child: NodeTag(child),
                    },
                    TomlStep::Purge { tag } => Step::Purge { tag: NodeTag(tag) },
                })
            })
            .collect::<Result<Vec<_>, SceneError>>()?;

        Ok(Scene {
            name: parsed.metadata.and_then(|m| m.name),
            root: NodeTag(parsed.root),
            nodes,
            steps,
        })
    }

    /// Create every declared node in a fresh tree and attach the children
    ///
    /// Nodes are created first so children may be declared after their parents.
    pub fn build<E: LayoutEngine>(&self, engine: E) -> Result<ShadowTree<E>, ShadowError> {
        let mut tree = ShadowTree::new(engine);
        for node in &self.nodes {
            tree.create_node(node.tag, node.view.clone())?;
            if let Some(color) = &node.background {
                tree.set_background_color(node.tag, Some(color.clone()))?;
            }
            for (property, value) in &node.style {
                tree.set_style(node.tag, *property, *value)?;
            }
        }
        for node in &self.nodes {
            for (index, child) in node.children.iter().enumerate() {
                tree.insert_child(node.tag, *child, index)?;
            }
        }
        // Surfaces the error for a missing root
        tree.root_of(self.root)?;
        debug!(nodes = tree.len(), root = %self.root, "built scene");
        Ok(tree)
    }

    /// Lay out the scene with the constraint engine, then apply each step
    /// followed by another pass
    ///
    /// Every pass is also applied to an [`ElementTable`], so records that a
    /// surface would reject fail the run.
    pub fn run(&self, config: &LayoutConfig) -> Result<Vec<PassReport>, SceneError> {
        self.run_on(config, &mut ElementTable::new())
    }

    /// Like [`run`](Scene::run), applying every pass to `surface`
    ///
    /// Elements of a detached subtree stay on the surface with their last
    /// box until a `purge` step destroys the nodes; only then are they
    /// removed. A failed step leaves the surface as it was.
    pub fn run_on(&self, config: &LayoutConfig, surface: &mut ElementTable) -> Result<Vec<PassReport>, SceneError> {
        let mut tree = self.build(ConstraintEngine::new())?;

        let changes = tree.layout_pass(self.root, config)?;
        surface.apply(&changes)?;
        let mut reports = vec![PassReport {
            step: None,
            changes,
        }];

        for step in &self.steps {
            let purged = match step {
                Step::Purge { tag } => tree.subtree(*tag).map_err(ShadowError::from)?,
                _ => Vec::new(),
            };
            step.apply(&mut tree)?;
            for tag in purged {
                surface.remove(tag);
            }

            let changes = tree.layout_pass(self.root, config)?;
            info!(step = %step, changes = changes.len(), "applied step");
            surface.apply(&changes)?;
            reports.push(PassReport {
                step: Some(step.clone()),
                changes,
            });
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TreeError;
    use crate::layout::ManualEngine;
    use crate::style::{Dimension, FlexDirection};

    const SCENE: &str = r##"
root = 1

[metadata]
name = "row"

[[nodes]]
tag = 1
background = "#ffffff"
children = [2]
style = { width = 100, height = 40, flexDirection = "row" }

[[nodes]]
tag = 2
view = "Image"
style = { width = "25%", margin = 2.5 }

[[nodes]]
tag = 3

[[steps]]
action = "insert"
parent = 1
child = 3
index = 0

[[steps]]
action = "set"
tag = 3
style = { flexGrow = 1 }

[[steps]]
action = "remove"
parent = 1
child = 3

[[steps]]
action = "purge"
tag = 3
"##;

    #[test]
    fn test_parse_scene() {
        let scene = Scene::from_str(SCENE).unwrap();
        assert_eq!(scene.name.as_deref(), Some("row"));
        assert_eq!(scene.root, NodeTag(1));
        assert_eq!(scene.nodes.len(), 3);
        assert_eq!(
            scene.nodes[0].style,
            vec![
                (StyleProperty::FlexDirection, StyleValue::FlexDirection(FlexDirection::Row)),
                (StyleProperty::Height, StyleValue::Dimension(Dimension::Points(40.0))),
                (StyleProperty::Width, StyleValue::Dimension(Dimension::Points(100.0))),
            ]
        );
        assert_eq!(scene.nodes[1].view, "Image");
        assert_eq!(scene.nodes[2].view, "View");
        assert_eq!(
            scene.steps[0],
            Step::Insert {
                parent: NodeTag(1),
                child: NodeTag(3),
                index: Some(0)
            }
        );
        assert_eq!(scene.steps[1].to_string(), "set 3 flexGrow=1");
    }

    #[test]
    fn test_unknown_property_names_the_node() {
        let err = Scene::from_str("root = 1\n[[nodes]]\ntag = 1\nstyle = { colour = 1 }").unwrap_err();
        assert!(matches!(
            err,
            SceneError::Style {
                tag: NodeTag(1),
                source: StyleError::UnknownProperty(_)
            }
        ));
    }

    #[test]
    fn test_boolean_value_is_unsupported() {
        let err = Scene::from_str("root = 1\n[[nodes]]\ntag = 1\nstyle = { width = true }").unwrap_err();
        assert!(matches!(err, SceneError::UnsupportedValue { .. }));
    }

    #[test]
    fn test_build_attaches_children() {
        let scene = Scene::from_str(SCENE).unwrap();
        let tree = scene.build(ManualEngine::new()).unwrap();

        assert_eq!(tree.children(NodeTag(1)).unwrap(), &[NodeTag(2)]);
        assert_eq!(tree.parent(NodeTag(3)).unwrap(), None);
        assert_eq!(tree.background_color(NodeTag(1)).unwrap(), Some("#ffffff"));
    }

    #[test]
    fn test_missing_root_fails_build() {
        let scene = Scene::from_str("root = 9\n[[nodes]]\ntag = 1").unwrap();
        assert!(scene.build(ManualEngine::new()).is_err());
    }

    #[test]
    fn test_run_reports_one_pass_per_step() {
        let scene = Scene::from_str(SCENE).unwrap();
        let reports = scene.run(&LayoutConfig::default()).unwrap();

        assert_eq!(reports.len(), 5);
        assert_eq!(reports[0].changes.len(), 2);
        assert!(reports[0].step.is_none());
        assert_eq!(reports[4].step, Some(Step::Purge { tag: NodeTag(3) }));
    }

    #[test]
    fn test_detached_elements_stay_until_purged() {
        let scene = Scene::from_str(SCENE).unwrap();
        let mut surface = ElementTable::new();
        scene.run_on(&LayoutConfig::default(), &mut surface).unwrap();
        assert_eq!(surface.len(), 2);
        assert!(surface.get(NodeTag(3)).is_none());

        let without_purge = Scene {
            steps: scene.steps[..3].to_vec(),
            ..scene.clone()
        };
        let mut surface = ElementTable::new();
        without_purge.run_on(&LayoutConfig::default(), &mut surface).unwrap();
        assert!(surface.get(NodeTag(3)).is_some());
    }

    #[test]
    fn test_failed_purge_keeps_elements() {
        let scene = Scene::from_str(
            "root = 1\n[[nodes]]\ntag = 1\nchildren = [2]\n[[nodes]]\ntag = 2\n\n[[steps]]\naction = \"purge\"\ntag = 2",
        )
        .unwrap();
        let mut surface = ElementTable::new();
        let err = scene.run_on(&LayoutConfig::default(), &mut surface).unwrap_err();

        assert!(matches!(
            err,
            SceneError::Shadow(ShadowError::Tree(TreeError::PurgeAttached { .. }))
        ));
        assert!(surface.get(NodeTag(1)).is_some());
        assert!(surface.get(NodeTag(2)).is_some());
    }
}
