//! Constraint-based flexbox engine
//!
//! [`ConstraintEngine`] translates the styles of a node tree into Cassowary
//! constraints and reads the boxes back out of the solution. It covers a
//! single-line flexbox subset:
//!
//! - explicit and percentage sizes, min/max clamps, aspect ratio
//! - margin, padding and border (edge shorthands included)
//! - flex direction (reverse directions included), flex grow, flex basis
//! - justify content and align items/self
//! - absolute positioning and relative offsets
//! - `display: none`
//!
//! Strengths encode precedence: structural relations are REQUIRED, explicit
//! styles STRONG, containment and distribution MEDIUM, and "as small as
//! possible" defaults WEAK.

use kasuari::{Expression, Strength};
use tracing::{debug, trace};

use crate::style::{Align, Dimension, Edge, Edges, Justify, Style, StyleProperty, StyleValue};

use super::config::LayoutConfig;
use super::error::EngineError;
use super::solver::{ConstraintSolver, LayoutProperty, Relation, Solution};
use super::store::NodeStore;
use super::types::{EngineNodeId, LayoutBox};
use super::LayoutEngine;

/// A layout engine backed by the kasuari constraint solver
#[derive(Debug, Default)]
pub struct ConstraintEngine {
    store: NodeStore,
}

impl ConstraintEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live engine nodes
    pub fn node_count(&self) -> usize {
        self.store.len()
    }

    /// Typed style of a node
    pub fn node_style(&self, node: EngineNodeId) -> Result<&Style, EngineError> {
        Ok(&self.store.get(node)?.style)
    }
}

impl LayoutEngine for ConstraintEngine {
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

    fn calculate_layout(
        &mut self,
        root: EngineNodeId,
        config: &LayoutConfig,
    ) -> Result<(), EngineError> {
        let mut builder = ConstraintBuilder::new(&self.store);
        builder.constrain_root(root, config)?;
        debug!(
            root = ?root,
            constraints = builder.solver.constraint_count(),
            "solving layout constraints"
        );
        let solution = builder.solver.solve();

        let boxes = extract_boxes(&self.store, &solution, root, config)?;
        for (node, layout) in boxes {
            trace!(node = ?node, %layout, "computed box");
            self.store.get_mut(node)?.layout = layout;
        }
        Ok(())
    }

    fn computed_box(&self, node: EngineNodeId) -> Result<LayoutBox, EngineError> {
        Ok(self.store.get(node)?.layout)
    }

    fn release_subtree(&mut self, node: EngineNodeId) -> Result<(), EngineError> {
        let released = self.store.release_subtree(node)?;
        trace!(node = ?node, released, "released layout subtree");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    const BOTH: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    fn other(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    fn start_edge(self) -> Edge {
        match self {
            Self::Horizontal => Edge::Left,
            Self::Vertical => Edge::Top,
        }
    }

    fn end_edge(self) -> Edge {
        match self {
            Self::Horizontal => Edge::Right,
            Self::Vertical => Edge::Bottom,
        }
    }

    fn size(self, style: &Style) -> Dimension {
        match self {
            Self::Horizontal => style.width,
            Self::Vertical => style.height,
        }
    }

    fn min_size(self, style: &Style) -> Dimension {
        match self {
            Self::Horizontal => style.min_width,
            Self::Vertical => style.min_height,
        }
    }

    fn max_size(self, style: &Style) -> Dimension {
        match self {
            Self::Horizontal => style.max_width,
            Self::Vertical => style.max_height,
        }
    }

    /// Offsets from the start and end edges (`left`/`right` or `top`/`bottom`)
    fn offsets(self, style: &Style) -> (Dimension, Dimension) {
        match self {
            Self::Horizontal => (style.left, style.right),
            Self::Vertical => (style.top, style.bottom),
        }
    }
}

/// A rectangle expressed in solver terms
#[derive(Debug, Clone)]
struct Area {
    x: Expression,
    y: Expression,
    width: Expression,
    height: Expression,
}

impl Area {
    fn start(&self, axis: Axis) -> Expression {
        match axis {
            Axis::Horizontal => self.x.clone(),
            Axis::Vertical => self.y.clone(),
        }
    }

    fn size(&self, axis: Axis) -> Expression {
        match axis {
            Axis::Horizontal => self.width.clone(),
            Axis::Vertical => self.height.clone(),
        }
    }

    fn end(&self, axis: Axis) -> Expression {
        self.start(axis) + self.size(axis)
    }
}

fn constant(value: f64) -> Expression {
    Expression::from_constant(value)
}

/// Resolve a dimension against a reference length; `auto`/undefined yield `None`
fn resolve(dimension: Dimension, reference: &Expression) -> Option<Expression> {
    match dimension {
        Dimension::Points(points) => Some(constant(points)),
        Dimension::Percent(percent) => Some(reference.clone() * (percent / 100.0)),
        Dimension::Auto | Dimension::Undefined => None,
    }
}

/// Like [`resolve`], treating unset lengths as zero
fn length(dimension: Dimension, reference: &Expression) -> Expression {
    resolve(dimension, reference).unwrap_or_else(|| constant(0.0))
}

fn resolve_value(dimension: Dimension, reference: f64) -> Option<f64> {
    match dimension {
        Dimension::Points(points) => Some(points),
        Dimension::Percent(percent) => Some(reference * percent / 100.0),
        Dimension::Auto | Dimension::Undefined => None,
    }
}

/// Builds the constraint system for one layout pass
struct ConstraintBuilder<'a> {
    store: &'a NodeStore,
    solver: ConstraintSolver,
}

impl<'a> ConstraintBuilder<'a> {
    fn new(store: &'a NodeStore) -> Self {
        Self {
            store,
            solver: ConstraintSolver::new(),
        }
    }

    fn area(&mut self, node: EngineNodeId) -> Area {
        Area {
            x: self.solver.var(node, LayoutProperty::X),
            y: self.solver.var(node, LayoutProperty::Y),
            width: self.solver.var(node, LayoutProperty::Width),
            height: self.solver.var(node, LayoutProperty::Height),
        }
    }

    fn equal(
        &mut self,
        lhs: Expression,
        rhs: Expression,
        strength: Strength,
        describe: impl FnOnce() -> String,
    ) -> Result<(), EngineError> {
        Ok(self.solver.equal(lhs, rhs, strength, describe)?)
    }

    fn at_least(
        &mut self,
        lhs: Expression,
        rhs: Expression,
        strength: Strength,
        describe: impl FnOnce() -> String,
    ) -> Result<(), EngineError> {
        Ok(self
            .solver
            .constrain(lhs, Relation::GreaterOrEqual, rhs, strength, describe)?)
    }

    fn at_most(
        &mut self,
        lhs: Expression,
        rhs: Expression,
        strength: Strength,
        describe: impl FnOnce() -> String,
    ) -> Result<(), EngineError> {
        Ok(self
            .solver
            .constrain(lhs, Relation::LessOrEqual, rhs, strength, describe)?)
    }

    /// Prefer `value` to be zero; the doubled weight makes free space lose
    /// against auto-sized containers shrinking to their content
    fn prefer_zero(&mut self, value: Expression, describe: impl FnOnce() -> String) -> Result<(), EngineError> {
        self.at_least(value.clone(), constant(0.0), Strength::REQUIRED, || {
            format!("{} >= 0", describe())
        })?;
        self.equal(value * 2.0, constant(0.0), Strength::WEAK, || {
            "free space preference".to_string()
        })
    }

    fn constrain_root(&mut self, root: EngineNodeId, config: &LayoutConfig) -> Result<(), EngineError> {
        let style = &self.store.get(root)?.style;
        let area = self.area(root);
        let available = Area {
            x: constant(0.0),
            y: constant(0.0),
            width: constant(config.available_width),
            height: constant(config.available_height),
        };

        self.equal(area.x.clone(), constant(0.0), Strength::REQUIRED, || {
            format!("{:?}.x = 0", root)
        })?;
        self.equal(area.y.clone(), constant(0.0), Strength::REQUIRED, || {
            format!("{:?}.y = 0", root)
        })?;
        if !style.is_displayed() {
            return Ok(());
        }

        self.constrain_sizes(root, style, &available)?;
        for axis in Axis::BOTH {
            let size = resolve(axis.size(style), &available.size(axis))
                .unwrap_or_else(|| available.size(axis));
            self.equal(area.size(axis), size, Strength::STRONG, || {
                format!("{:?} root {:?} size", root, axis)
            })?;
        }
        self.constrain_children(root, &available.width)
    }

    /// Non-negative sizes, min/max clamps and aspect ratio
    fn constrain_sizes(
        &mut self,
        node: EngineNodeId,
        style: &Style,
        containing: &Area,
    ) -> Result<(), EngineError> {
        let area = self.area(node);
        for axis in Axis::BOTH {
            let reference = containing.size(axis);
            self.at_least(area.size(axis), constant(0.0), Strength::REQUIRED, || {
                format!("{:?} {:?} size >= 0", node, axis)
            })?;
            if let Some(min) = resolve(axis.min_size(style), &reference) {
                self.at_least(area.size(axis), min, Strength::REQUIRED, || {
                    format!("{:?} {:?} size >= {}", node, axis, axis.min_size(style))
                })?;
            }
            if let Some(max) = resolve(axis.max_size(style), &reference) {
                self.at_most(area.size(axis), max, Strength::REQUIRED, || {
                    format!("{:?} {:?} size <= {}", node, axis, axis.max_size(style))
                })?;
            }
        }

        if let Some(ratio) = style.aspect_ratio.filter(|ratio| *ratio > 0.0) {
            self.equal(area.width, area.height * ratio, Strength::MEDIUM, || {
                format!("{:?} aspect ratio {}", node, ratio)
            })?;
        }
        Ok(())
    }

    /// Lay out the children of `node`; `reference_width` resolves percentage
    /// padding and borders
    fn constrain_children(
        &mut self,
        node: EngineNodeId,
        reference_width: &Expression,
    ) -> Result<(), EngineError> {
        let entry = self.store.get(node)?;
        let style = &entry.style;
        let area = self.area(node);

        let edge = |edges: &Edges, side: Edge| length(edges.resolve(side), reference_width);
        let (border_left, border_right) = (edge(&style.border, Edge::Left), edge(&style.border, Edge::Right));
        let (border_top, border_bottom) = (edge(&style.border, Edge::Top), edge(&style.border, Edge::Bottom));
        let padding_box = Area {
            x: area.x.clone() + border_left.clone(),
            y: area.y.clone() + border_top.clone(),
            width: area.width.clone() - border_left - border_right,
            height: area.height.clone() - border_top - border_bottom,
        };
        let (padding_left, padding_right) = (edge(&style.padding, Edge::Left), edge(&style.padding, Edge::Right));
        let (padding_top, padding_bottom) = (edge(&style.padding, Edge::Top), edge(&style.padding, Edge::Bottom));
        let content = Area {
            x: padding_box.x.clone() + padding_left.clone(),
            y: padding_box.y.clone() + padding_top.clone(),
            width: padding_box.width.clone() - padding_left - padding_right,
            height: padding_box.height.clone() - padding_top - padding_bottom,
        };

        let mut flow = Vec::new();
        for &child in &entry.children {
            let child_style = &self.store.get(child)?.style;
            if !child_style.is_displayed() {
                continue;
            }
            if child_style.is_absolute() {
                self.constrain_absolute(child, child_style, &padding_box, &content)?;
            } else {
                flow.push(child);
            }
        }
        if style.flex_direction.is_reverse() {
            flow.reverse();
        }
        self.constrain_flow(node, style, &content, &flow)?;

        for &child in &entry.children {
            if self.store.get(child)?.style.is_displayed() {
                self.constrain_children(child, &content.width)?;
            }
        }
        Ok(())
    }

    fn constrain_absolute(
        &mut self,
        child: EngineNodeId,
        style: &Style,
        padding_box: &Area,
        content: &Area,
    ) -> Result<(), EngineError> {
        self.constrain_sizes(child, style, padding_box)?;
        let area = self.area(child);

        for axis in Axis::BOTH {
            let reference = padding_box.size(axis);
            let (start_offset, end_offset) = axis.offsets(style);
            let start = resolve(start_offset, &reference);
            let end = resolve(end_offset, &reference);
            let size = resolve(axis.size(style), &reference);
            let margin_start = length(style.margin.resolve(axis.start_edge()), &padding_box.width);
            let margin_end = length(style.margin.resolve(axis.end_edge()), &padding_box.width);

            match (&start, &end) {
                (None, None) => {
                    self.equal(
                        area.start(axis),
                        content.start(axis) + margin_start.clone(),
                        Strength::STRONG,
                        || format!("{:?} absolute {:?} static position", child, axis),
                    )?;
                }
                _ => {
                    if let Some(start) = &start {
                        self.equal(
                            area.start(axis),
                            padding_box.start(axis) + start.clone() + margin_start.clone(),
                            Strength::STRONG,
                            || format!("{:?} absolute {:?} start offset", child, axis),
                        )?;
                    }
                    if let Some(end) = &end {
                        if start.is_none() || size.is_none() {
                            self.equal(
                                area.end(axis) + margin_end.clone(),
                                padding_box.end(axis) - end.clone(),
                                Strength::STRONG,
                                || format!("{:?} absolute {:?} end offset", child, axis),
                            )?;
                        }
                    }
                }
            }

            match size {
                Some(size) => self.equal(area.size(axis), size, Strength::STRONG, || {
                    format!("{:?} {:?} size", child, axis)
                })?,
                None if start.is_some() && end.is_some() => {}
                None => self.equal(area.size(axis), constant(0.0), Strength::WEAK, || {
                    format!("{:?} {:?} auto size", child, axis)
                })?,
            }
        }
        Ok(())
    }

    /// Place in-flow children along the main axis and align them on the cross axis
    fn constrain_flow(
        &mut self,
        container: EngineNodeId,
        style: &Style,
        content: &Area,
        flow: &[EngineNodeId],
    ) -> Result<(), EngineError> {
        if flow.is_empty() {
            return Ok(());
        }

        let main = if style.flex_direction.is_row() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };
        let cross = main.other();
        let justify = match (style.justify_content, style.flex_direction.is_reverse()) {
            (Justify::FlexStart, true) => Justify::FlexEnd,
            (Justify::FlexEnd, true) => Justify::FlexStart,
            (justify, _) => justify,
        };

        let mut growing = false;
        for &child in flow {
            growing |= self.store.get(child)?.style.effective_flex_grow() > 0.0;
        }
        let spaced = !growing
            && match justify {
                Justify::SpaceBetween => flow.len() > 1,
                Justify::SpaceAround | Justify::SpaceEvenly => true,
                _ => false,
            };

        let unit = self.solver.var(container, LayoutProperty::GrowUnit);
        if growing {
            self.prefer_zero(unit.clone(), || format!("{:?} grow unit", container))?;
        }
        let leading = self.solver.var(container, LayoutProperty::Leading);
        self.prefer_zero(leading.clone(), || format!("{:?} leading space", container))?;
        let gap = if spaced {
            let gap = self.solver.var(container, LayoutProperty::Gap);
            self.prefer_zero(gap.clone(), || format!("{:?} gap", container))?;
            gap
        } else {
            constant(0.0)
        };

        let main_reference = content.size(main);
        let cross_reference = content.size(cross);
        let mut cursor = content.start(main) + leading.clone();
        for (index, &child) in flow.iter().enumerate() {
            let child_style = &self.store.get(child)?.style;
            let area = self.area(child);
            self.constrain_sizes(child, child_style, content)?;

            let margin = |side: Edge| length(child_style.margin.resolve(side), &content.width);
            let (main_start, main_end) = (margin(main.start_edge()), margin(main.end_edge()));
            let (cross_start, cross_end) = (margin(cross.start_edge()), margin(cross.end_edge()));

            if index > 0 {
                cursor = cursor + gap.clone();
            }
            self.equal(
                area.start(main),
                cursor + main_start,
                Strength::REQUIRED,
                || format!("{:?} main position", child),
            )?;

            // Main size: explicit, else basis plus a share of the free space
            match resolve(main.size(child_style), &main_reference) {
                Some(size) => self.equal(area.size(main), size, Strength::STRONG, || {
                    format!("{:?} main size", child)
                })?,
                None => {
                    let basis = resolve(child_style.effective_flex_basis(), &main_reference);
                    let grow = child_style.effective_flex_grow();
                    if grow > 0.0 {
                        let target = basis.unwrap_or_else(|| constant(0.0)) + unit.clone() * grow;
                        self.equal(area.size(main), target, Strength::STRONG, || {
                            format!("{:?} flex grow {}", child, grow)
                        })?;
                    } else if let Some(basis) = basis {
                        self.equal(area.size(main), basis, Strength::STRONG, || {
                            format!("{:?} flex basis", child)
                        })?;
                    } else {
                        self.equal(area.size(main), constant(0.0), Strength::WEAK, || {
                            format!("{:?} auto main size", child)
                        })?;
                    }
                }
            }

            let align = child_style.effective_align(style);
            match resolve(cross.size(child_style), &cross_reference) {
                Some(size) => self.equal(area.size(cross), size, Strength::STRONG, || {
                    format!("{:?} cross size", child)
                })?,
                None if align == Align::Stretch => self.equal(
                    area.size(cross),
                    cross_reference.clone() - cross_start.clone() - cross_end.clone(),
                    Strength::STRONG,
                    || format!("{:?} stretch", child),
                )?,
                None => self.equal(area.size(cross), constant(0.0), Strength::WEAK, || {
                    format!("{:?} auto cross size", child)
                })?,
            }

            match align {
                Align::FlexEnd => self.equal(
                    area.end(cross) + cross_end.clone(),
                    content.end(cross),
                    Strength::REQUIRED,
                    || format!("{:?} align end", child),
                )?,
                Align::Center => self.equal(
                    area.start(cross) * 2.0 + area.size(cross) + cross_end.clone() - cross_start.clone(),
                    content.start(cross) * 2.0 + cross_reference.clone(),
                    Strength::REQUIRED,
                    || format!("{:?} align center", child),
                )?,
                _ => self.equal(
                    area.start(cross),
                    content.start(cross) + cross_start.clone(),
                    Strength::REQUIRED,
                    || format!("{:?} align start", child),
                )?,
            }
            self.at_least(
                cross_reference.clone(),
                area.size(cross) + cross_start + cross_end,
                Strength::MEDIUM,
                || format!("{:?} cross containment", child),
            )?;

            cursor = area.end(main) + main_end;
        }

        let trailing = content.end(main) - cursor;
        self.at_least(trailing.clone(), constant(0.0), Strength::MEDIUM, || {
            format!("{:?} main containment", container)
        })?;

        let describe = || format!("{:?} justify {}", container, justify);
        // Growing children take all free space, so justification has no effect
        if growing {
            self.equal(leading, constant(0.0), Strength::STRONG, describe)?;
            return self.equal(trailing, constant(0.0), Strength::MEDIUM, describe);
        }
        match justify {
            Justify::FlexEnd => self.equal(trailing, constant(0.0), Strength::MEDIUM, describe),
            Justify::Center => self.equal(leading, trailing, Strength::MEDIUM, describe),
            Justify::SpaceBetween if spaced => {
                self.equal(leading, constant(0.0), Strength::MEDIUM, describe)?;
                self.equal(trailing, constant(0.0), Strength::MEDIUM, describe)
            }
            Justify::SpaceAround => {
                self.equal(trailing, leading.clone(), Strength::MEDIUM, describe)?;
                self.equal(gap, leading * 2.0, Strength::MEDIUM, describe)
            }
            Justify::SpaceEvenly => {
                self.equal(trailing, leading.clone(), Strength::MEDIUM, describe)?;
                self.equal(gap, leading, Strength::MEDIUM, describe)
            }
            _ => Ok(()),
        }
    }
}

/// Convert the absolute solution into parent-relative, pixel-rounded boxes
///
/// Percentage offsets of relatively positioned children resolve against the
/// parent's content box, like their sizes.
fn extract_boxes(
    store: &NodeStore,
    solution: &Solution,
    root: EngineNodeId,
    config: &LayoutConfig,
) -> Result<Vec<(EngineNodeId, LayoutBox)>, EngineError> {
    struct Visit {
        node: EngineNodeId,
        /// Parent origin and content size
        parent: Option<(f64, f64, f64, f64)>,
        /// Width that this node's edges resolve against
        reference_width: f64,
        hidden: bool,
    }

    let mut boxes = Vec::new();
    let mut stack = vec![Visit {
        node: root,
        parent: None,
        reference_width: config.available_width,
        hidden: false,
    }];
    while let Some(visit) = stack.pop() {
        let entry = store.get(visit.node)?;
        let hidden = visit.hidden || !entry.style.is_displayed();
        if hidden {
            boxes.push((visit.node, LayoutBox::ZERO));
            stack.extend(entry.children.iter().map(|&child| Visit {
                node: child,
                parent: None,
                reference_width: 0.0,
                hidden: true,
            }));
            continue;
        }

        let x = solution.get(visit.node, LayoutProperty::X);
        let y = solution.get(visit.node, LayoutProperty::Y);
        let width = solution.get(visit.node, LayoutProperty::Width);
        let height = solution.get(visit.node, LayoutProperty::Height);

        let left = config.round(x);
        let top = config.round(y);
        let mut layout = LayoutBox {
            top,
            left,
            width: config.round(x + width) - left,
            height: config.round(y + height) - top,
        };
        let style = &entry.style;
        if let Some((parent_x, parent_y, content_width, content_height)) = visit.parent {
            layout.left -= config.round(parent_x);
            layout.top -= config.round(parent_y);

            if !style.is_absolute() {
                let horizontal = resolve_value(style.left, content_width)
                    .or_else(|| resolve_value(style.right, content_width).map(|right| -right));
                let vertical = resolve_value(style.top, content_height)
                    .or_else(|| resolve_value(style.bottom, content_height).map(|bottom| -bottom));
                layout.left += config.round(horizontal.unwrap_or(0.0));
                layout.top += config.round(vertical.unwrap_or(0.0));
            }
        } else {
            layout.left = 0.0;
            layout.top = 0.0;
        }
        boxes.push((visit.node, layout));

        let inset = |side: Edge| {
            [&style.border, &style.padding]
                .iter()
                .filter_map(|edges| resolve_value(edges.resolve(side), visit.reference_width))
                .sum::<f64>()
        };
        let content_width = width - inset(Edge::Left) - inset(Edge::Right);
        let content_height = height - inset(Edge::Top) - inset(Edge::Bottom);
        stack.extend(entry.children.iter().map(|&child| Visit {
            node: child,
            parent: Some((x, y, content_width, content_height)),
            reference_width: content_width,
            hidden: false,
        }));
    }
    Ok(boxes)
}
