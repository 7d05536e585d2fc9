//! Layout-relevant style properties
//!
//! [`Style`] holds the typed value of every property a layout engine reads.
//! [`StyleProperty`] enumerates those properties and maps each of them onto a
//! field of [`Style`], so reads and writes are resolved at compile time rather
//! than by name.

pub mod property;
pub mod value;

pub use property::StyleProperty;
pub use value::{
    Align, Dimension, Display, FlexDirection, FlexWrap, Justify, Overflow, PositionType,
    StyleValue,
};

use thiserror::Error;

/// Errors raised when a style value does not fit its property
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    #[error("unknown style property '{0}'")]
    UnknownProperty(String),

    #[error("invalid value '{value}' for '{property}': expected {expected}")]
    InvalidValue {
        property: StyleProperty,
        value: String,
        expected: String,
    },

    #[error("unknown keyword '{keyword}' (expected one of: {expected})")]
    UnknownKeyword { keyword: String, expected: String },

    #[error("invalid dimension '{0}'")]
    InvalidDimension(String),
}

/// One side of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Per-edge values with axis and all-edge shorthands
///
/// Resolution order is specific edge, then the axis shorthand
/// (`vertical` for top/bottom, `horizontal` for left/right), then `all`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub top: Dimension,
    pub right: Dimension,
    pub bottom: Dimension,
    pub left: Dimension,
    pub vertical: Dimension,
    pub horizontal: Dimension,
    pub all: Dimension,
}

impl Edges {
    /// Resolve the effective value for one edge
    pub fn resolve(&self, edge: Edge) -> Dimension {
        let (specific, axis) = match edge {
            Edge::Top => (self.top, self.vertical),
            Edge::Bottom => (self.bottom, self.vertical),
            Edge::Left => (self.left, self.horizontal),
            Edge::Right => (self.right, self.horizontal),
        };
        [specific, axis, self.all]
            .into_iter()
            .find(|value| *value != Dimension::Undefined)
            .unwrap_or_default()
    }
}

/// The typed style of a single layout node
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub position: PositionType,
    pub top: Dimension,
    pub right: Dimension,
    pub bottom: Dimension,
    pub left: Dimension,

    pub width: Dimension,
    pub height: Dimension,
    pub min_width: Dimension,
    pub max_width: Dimension,
    pub min_height: Dimension,
    pub max_height: Dimension,

    pub margin: Edges,
    pub padding: Edges,
    pub border: Edges,

    pub flex: Option<f64>,
    pub flex_grow: Option<f64>,
    pub flex_shrink: Option<f64>,
    pub flex_basis: Dimension,
    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub justify_content: Justify,
    pub align_items: Align,
    pub align_self: Align,
    pub align_content: Align,

    pub aspect_ratio: Option<f64>,
    pub overflow: Overflow,
    pub display: Display,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            position: PositionType::default(),
            top: Dimension::Undefined,
            right: Dimension::Undefined,
            bottom: Dimension::Undefined,
            left: Dimension::Undefined,
            width: Dimension::Undefined,
            height: Dimension::Undefined,
            min_width: Dimension::Undefined,
            max_width: Dimension::Undefined,
            min_height: Dimension::Undefined,
            max_height: Dimension::Undefined,
            margin: Edges::default(),
            padding: Edges::default(),
            border: Edges::default(),
            flex: None,
            flex_grow: None,
            flex_shrink: None,
            flex_basis: Dimension::Undefined,
            flex_direction: FlexDirection::default(),
            flex_wrap: FlexWrap::default(),
            justify_content: Justify::default(),
            align_items: Align::Stretch,
            align_self: Align::Auto,
            align_content: Align::FlexStart,
            aspect_ratio: None,
            overflow: Overflow::default(),
            display: Display::default(),
        }
    }
}

impl Style {
    /// Grow factor after applying the `flex` shorthand
    pub fn effective_flex_grow(&self) -> f64 {
        match (self.flex_grow, self.flex) {
            (Some(grow), _) => grow.max(0.0),
            (None, Some(flex)) if flex > 0.0 => flex,
            _ => 0.0,
        }
    }

    /// Basis after applying the `flex` shorthand (`flex: n` implies a zero basis)
    pub fn effective_flex_basis(&self) -> Dimension {
        match (self.flex_basis, self.flex) {
            (basis, _) if basis != Dimension::Undefined => basis,
            (_, Some(flex)) if flex > 0.0 => Dimension::Points(0.0),
            _ => Dimension::Auto,
        }
    }

    /// Cross-axis alignment of this node inside a container with `parent` style
    pub fn effective_align(&self, parent: &Style) -> Align {
        match self.align_self {
            Align::Auto => parent.align_items,
            other => other,
        }
    }

    pub fn is_absolute(&self) -> bool {
        self.position == PositionType::Absolute
    }

    pub fn is_displayed(&self) -> bool {
        self.display != Display::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_resolution_order() {
        let edges = Edges {
            top: Dimension::Points(1.0),
            vertical: Dimension::Points(2.0),
            all: Dimension::Points(3.0),
            ..Edges::default()
        };
        assert_eq!(edges.resolve(Edge::Top), Dimension::Points(1.0));
        assert_eq!(edges.resolve(Edge::Bottom), Dimension::Points(2.0));
        assert_eq!(edges.resolve(Edge::Left), Dimension::Points(3.0));
        assert_eq!(Edges::default().resolve(Edge::Right), Dimension::Undefined);
    }

    #[test]
    fn test_flex_shorthand() {
        let style = Style {
            flex: Some(2.0),
            ..Style::default()
        };
        assert_eq!(style.effective_flex_grow(), 2.0);
        assert_eq!(style.effective_flex_basis(), Dimension::Points(0.0));

        let explicit = Style {
            flex: Some(2.0),
            flex_grow: Some(1.0),
            flex_basis: Dimension::Points(10.0),
            ..Style::default()
        };
        assert_eq!(explicit.effective_flex_grow(), 1.0);
        assert_eq!(explicit.effective_flex_basis(), Dimension::Points(10.0));
    }

    #[test]
    fn test_align_self_falls_back_to_parent() {
        let parent = Style {
            align_items: Align::Center,
            ..Style::default()
        };
        let child = Style::default();
        assert_eq!(child.effective_align(&parent), Align::Center);

        let overriding = Style {
            align_self: Align::FlexEnd,
            ..Style::default()
        };
        assert_eq!(overriding.effective_align(&parent), Align::FlexEnd);
    }
}
