//! Core types shared by layout engines

use std::fmt;

/// A handle to a node owned by a [`LayoutEngine`](super::LayoutEngine)
///
/// Contains both a slot index and a generation counter so that handles to
/// released nodes are detected after the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineNodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl EngineNodeId {
    /// Returns the raw slot index (for diagnostics only)
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for EngineNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EngineNodeId({}@gen{})", self.index, self.generation)
    }
}

/// A computed layout box, positioned relative to the parent's border box
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutBox {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutBox {
    pub const ZERO: LayoutBox = LayoutBox {
        top: 0.0,
        left: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Component-wise equality in which NaN matches NaN
    pub fn same_as(&self, other: &LayoutBox) -> bool {
        fn same(a: f64, b: f64) -> bool {
            a == b || (a.is_nan() && b.is_nan())
        }
        same(self.top, other.top)
            && same(self.left, other.left)
            && same(self.width, other.width)
            && same(self.height, other.height)
    }
}

impl fmt::Display for LayoutBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{top: {}, left: {}, width: {}, height: {}}}",
            self.top, self.left, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_box_edges() {
        let layout = LayoutBox::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(layout.right(), 50.0);
        assert_eq!(layout.bottom(), 50.0);
    }

    #[test]
    fn test_same_as_matches_nan_components() {
        let layout = LayoutBox::new(f64::NAN, 0.0, 10.0, 10.0);
        assert!(layout.same_as(&layout));
        assert_ne!(layout, layout);
        assert!(!layout.same_as(&LayoutBox::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_layout_box_display() {
        let layout = LayoutBox::new(0.0, 0.0, 50.0, 50.5);
        assert_eq!(
            layout.to_string(),
            "{top: 0, left: 0, width: 50, height: 50.5}"
        );
    }
}
