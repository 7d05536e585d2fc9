//! Rendering surfaces
//!
//! A surface receives the change records of one diff pass, children before
//! parents, and keeps its own elements in step with them.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use tracing::trace;

use crate::layout::LayoutBox;
use crate::shadow::{ChangeKind, LayoutChange, NodeTag};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("element {0} already exists")]
    AlreadyExists(NodeTag),

    #[error("no element {0} to update")]
    MissingElement(NodeTag),
}

/// Applies layout change records to a presentation tree
pub trait RenderSurface {
    /// Apply the records of one diff pass, in order
    fn apply(&mut self, changes: &[LayoutChange]) -> Result<(), SurfaceError>;
}

/// An element as placed by the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub layout: LayoutBox,
    /// Number of updates applied since the element was added
    pub updates: usize,
}

/// In-memory surface keeping one element per tag
#[derive(Debug, Default)]
pub struct ElementTable {
    elements: BTreeMap<NodeTag, Element>,
}

impl ElementTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tag: NodeTag) -> Option<&Element> {
        self.elements.get(&tag)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Drop the element for a purged node
    pub fn remove(&mut self, tag: NodeTag) -> Option<Element> {
        self.elements.remove(&tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeTag, &Element)> {
        self.elements.iter().map(|(tag, element)| (*tag, element))
    }

    fn check(&self, change: &LayoutChange) -> Result<(), SurfaceError> {
        let exists = self.elements.contains_key(&change.tag);
        match change.kind {
            ChangeKind::Add if exists => Err(SurfaceError::AlreadyExists(change.tag)),
            ChangeKind::Update if !exists => Err(SurfaceError::MissingElement(change.tag)),
            _ => Ok(()),
        }
    }
}

impl RenderSurface for ElementTable {
    /// Rejects the whole batch if any record does not fit the table
    fn apply(&mut self, changes: &[LayoutChange]) -> Result<(), SurfaceError> {
        for change in changes {
            self.check(change)?;
        }
        for change in changes {
            trace!(tag = %change.tag, kind = %change.kind, "applying change");
            match change.kind {
                ChangeKind::Add => {
                    self.elements.insert(
                        change.tag,
                        Element {
                            layout: change.layout,
                            updates: 0,
                        },
                    );
                }
                ChangeKind::Update => {
                    if let Some(element) = self.elements.get_mut(&change.tag) {
                        element.layout = change.layout;
                        element.updates += 1;
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for ElementTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (tag, element) in &self.elements {
            writeln!(f, "{} {}", tag, element.layout)?;
        }
        Ok(())
    }
}
