//! The fixed set of style properties and their field mapping

use std::fmt;
use std::str::FromStr;

use super::value::{
    Align, Dimension, Display, FlexDirection, FlexWrap, Justify, Overflow, PositionType,
    StyleValue,
};
use super::{Style, StyleError};

/// A layout-relevant style property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleProperty {
    Top,
    Right,
    Bottom,
    Left,
    Width,
    Height,
    MinWidth,
    MaxWidth,
    MinHeight,
    MaxHeight,
    BorderTopWidth,
    BorderRightWidth,
    BorderBottomWidth,
    BorderLeftWidth,
    BorderWidth,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    MarginVertical,
    MarginHorizontal,
    Margin,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    PaddingVertical,
    PaddingHorizontal,
    Padding,
    Flex,
    FlexGrow,
    FlexShrink,
    FlexBasis,
    FlexDirection,
    FlexWrap,
    JustifyContent,
    AlignItems,
    AlignSelf,
    AlignContent,
    Position,
    AspectRatio,
    Overflow,
    Display,
}

/// What kind of value a property accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Dimension,
    Number,
    FlexDirection,
    FlexWrap,
    Justify,
    Align,
    Position,
    Overflow,
    Display,
}

impl StyleProperty {
    /// Every property, in declaration order
    pub const ALL: [StyleProperty; 43] = [
        Self::Top,
        Self::Right,
        Self::Bottom,
        Self::Left,
        Self::Width,
        Self::Height,
        Self::MinWidth,
        Self::MaxWidth,
        Self::MinHeight,
        Self::MaxHeight,
        Self::BorderTopWidth,
        Self::BorderRightWidth,
        Self::BorderBottomWidth,
        Self::BorderLeftWidth,
        Self::BorderWidth,
        Self::MarginTop,
        Self::MarginRight,
        Self::MarginBottom,
        Self::MarginLeft,
        Self::MarginVertical,
        Self::MarginHorizontal,
        Self::Margin,
        Self::PaddingTop,
        Self::PaddingRight,
        Self::PaddingBottom,
        Self::PaddingLeft,
        Self::PaddingVertical,
        Self::PaddingHorizontal,
        Self::Padding,
        Self::Flex,
        Self::FlexGrow,
        Self::FlexShrink,
        Self::FlexBasis,
        Self::FlexDirection,
        Self::FlexWrap,
        Self::JustifyContent,
        Self::AlignItems,
        Self::AlignSelf,
        Self::AlignContent,
        Self::Position,
        Self::AspectRatio,
        Self::Overflow,
        Self::Display,
    ];

    /// The camelCase name used in scene files and diagnostics
    pub fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Width => "width",
            Self::Height => "height",
            Self::MinWidth => "minWidth",
            Self::MaxWidth => "maxWidth",
            Self::MinHeight => "minHeight",
            Self::MaxHeight => "maxHeight",
            Self::BorderTopWidth => "borderTopWidth",
            Self::BorderRightWidth => "borderRightWidth",
            Self::BorderBottomWidth => "borderBottomWidth",
            Self::BorderLeftWidth => "borderLeftWidth",
            Self::BorderWidth => "borderWidth",
            Self::MarginTop => "marginTop",
            Self::MarginRight => "marginRight",
            Self::MarginBottom => "marginBottom",
            Self::MarginLeft => "marginLeft",
            Self::MarginVertical => "marginVertical",
            Self::MarginHorizontal => "marginHorizontal",
            Self::Margin => "margin",
            Self::PaddingTop => "paddingTop",
            Self::PaddingRight => "paddingRight",
            Self::PaddingBottom => "paddingBottom",
            Self::PaddingLeft => "paddingLeft",
            Self::PaddingVertical => "paddingVertical",
            Self::PaddingHorizontal => "paddingHorizontal",
            Self::Padding => "padding",
            Self::Flex => "flex",
            Self::FlexGrow => "flexGrow",
            Self::FlexShrink => "flexShrink",
            Self::FlexBasis => "flexBasis",
            Self::FlexDirection => "flexDirection",
            Self::FlexWrap => "flexWrap",
            Self::JustifyContent => "justifyContent",
            Self::AlignItems => "alignItems",
            Self::AlignSelf => "alignSelf",
            Self::AlignContent => "alignContent",
            Self::Position => "position",
            Self::AspectRatio => "aspectRatio",
            Self::Overflow => "overflow",
            Self::Display => "display",
        }
    }

    fn kind(self) -> ValueKind {
        match self {
            Self::Flex | Self::FlexGrow | Self::FlexShrink | Self::AspectRatio => ValueKind::Number,
            Self::FlexDirection => ValueKind::FlexDirection,
            Self::FlexWrap => ValueKind::FlexWrap,
            Self::JustifyContent => ValueKind::Justify,
            Self::AlignItems | Self::AlignSelf | Self::AlignContent => ValueKind::Align,
            Self::Position => ValueKind::Position,
            Self::Overflow => ValueKind::Overflow,
            Self::Display => ValueKind::Display,
            _ => ValueKind::Dimension,
        }
    }

    /// Human-readable description of the accepted values
    pub fn expected(self) -> String {
        match self.kind() {
            ValueKind::Dimension => "points, a percentage or auto".to_string(),
            ValueKind::Number => "a number".to_string(),
            ValueKind::FlexDirection => FlexDirection::KEYWORDS.join(", "),
            ValueKind::FlexWrap => FlexWrap::KEYWORDS.join(", "),
            ValueKind::Justify => Justify::KEYWORDS.join(", "),
            ValueKind::Align => Align::KEYWORDS.join(", "),
            ValueKind::Position => PositionType::KEYWORDS.join(", "),
            ValueKind::Overflow => Overflow::KEYWORDS.join(", "),
            ValueKind::Display => Display::KEYWORDS.join(", "),
        }
    }

    /// Read this property's current value from `style`
    pub fn read(self, style: &Style) -> StyleValue {
        let number = |value: Option<f64>| value.map_or(StyleValue::Undefined, StyleValue::Number);
        match self {
            Self::Top => style.top.into(),
            Self::Right => style.right.into(),
            Self::Bottom => style.bottom.into(),
            Self::Left => style.left.into(),
            Self::Width => style.width.into(),
            Self::Height => style.height.into(),
            Self::MinWidth => style.min_width.into(),
            Self::MaxWidth => style.max_width.into(),
            Self::MinHeight => style.min_height.into(),
            Self::MaxHeight => style.max_height.into(),
            Self::BorderTopWidth => style.border.top.into(),
            Self::BorderRightWidth => style.border.right.into(),
            Self::BorderBottomWidth => style.border.bottom.into(),
            Self::BorderLeftWidth => style.border.left.into(),
            Self::BorderWidth => style.border.all.into(),
            Self::MarginTop => style.margin.top.into(),
            Self::MarginRight => style.margin.right.into(),
            Self::MarginBottom => style.margin.bottom.into(),
            Self::MarginLeft => style.margin.left.into(),
            Self::MarginVertical => style.margin.vertical.into(),
            Self::MarginHorizontal => style.margin.horizontal.into(),
            Self::Margin => style.margin.all.into(),
            Self::PaddingTop => style.padding.top.into(),
            Self::PaddingRight => style.padding.right.into(),
            Self::PaddingBottom => style.padding.bottom.into(),
            Self::PaddingLeft => style.padding.left.into(),
            Self::PaddingVertical => style.padding.vertical.into(),
            Self::PaddingHorizontal => style.padding.horizontal.into(),
            Self::Padding => style.padding.all.into(),
            Self::Flex => number(style.flex),
            Self::FlexGrow => number(style.flex_grow),
            Self::FlexShrink => number(style.flex_shrink),
            Self::FlexBasis => style.flex_basis.into(),
            Self::FlexDirection => style.flex_direction.into(),
            Self::FlexWrap => style.flex_wrap.into(),
            Self::JustifyContent => style.justify_content.into(),
            Self::AlignItems => style.align_items.into(),
            Self::AlignSelf => style.align_self.into(),
            Self::AlignContent => style.align_content.into(),
            Self::Position => style.position.into(),
            Self::AspectRatio => number(style.aspect_ratio),
            Self::Overflow => style.overflow.into(),
            Self::Display => style.display.into(),
        }
    }

    /// Write `value` into the field of `style` backing this property
    ///
    /// [`StyleValue::Undefined`] resets the field to its default. A plain
    /// number is accepted wherever a dimension is expected and means points.
    pub fn write(self, style: &mut Style, value: StyleValue) -> Result<(), StyleError> {
        match self {
            Self::Top => style.top = self.dimension(value)?,
            Self::Right => style.right = self.dimension(value)?,
            Self::Bottom => style.bottom = self.dimension(value)?,
            Self::Left => style.left = self.dimension(value)?,
            Self::Width => style.width = self.dimension(value)?,
            Self::Height => style.height = self.dimension(value)?,
            Self::MinWidth => style.min_width = self.dimension(value)?,
            Self::MaxWidth => style.max_width = self.dimension(value)?,
            Self::MinHeight => style.min_height = self.dimension(value)?,
            Self::MaxHeight => style.max_height = self.dimension(value)?,
            Self::BorderTopWidth => style.border.top = self.dimension(value)?,
            Self::BorderRightWidth => style.border.right = self.dimension(value)?,
            Self::BorderBottomWidth => style.border.bottom = self.dimension(value)?,
            Self::BorderLeftWidth => style.border.left = self.dimension(value)?,
            Self::BorderWidth => style.border.all = self.dimension(value)?,
            Self::MarginTop => style.margin.top = self.dimension(value)?,
            Self::MarginRight => style.margin.right = self.dimension(value)?,
            Self::MarginBottom => style.margin.bottom = self.dimension(value)?,
            Self::MarginLeft => style.margin.left = self.dimension(value)?,
            Self::MarginVertical => style.margin.vertical = self.dimension(value)?,
            Self::MarginHorizontal => style.margin.horizontal = self.dimension(value)?,
            Self::Margin => style.margin.all = self.dimension(value)?,
            Self::PaddingTop => style.padding.top = self.dimension(value)?,
            Self::PaddingRight => style.padding.right = self.dimension(value)?,
            Self::PaddingBottom => style.padding.bottom = self.dimension(value)?,
            Self::PaddingLeft => style.padding.left = self.dimension(value)?,
            Self::PaddingVertical => style.padding.vertical = self.dimension(value)?,
            Self::PaddingHorizontal => style.padding.horizontal = self.dimension(value)?,
            Self::Padding => style.padding.all = self.dimension(value)?,
            Self::Flex => style.flex = self.number(value)?,
            Self::FlexGrow => style.flex_grow = self.number(value)?,
            Self::FlexShrink => style.flex_shrink = self.number(value)?,
            Self::FlexBasis => style.flex_basis = self.dimension(value)?,
            Self::FlexDirection => {
                style.flex_direction = match value {
                    StyleValue::Undefined => FlexDirection::default(),
                    StyleValue::FlexDirection(direction) => direction,
                    other => return Err(self.mismatch(other)),
                }
            }
            Self::FlexWrap => {
                style.flex_wrap = match value {
                    StyleValue::Undefined => FlexWrap::default(),
                    StyleValue::FlexWrap(wrap) => wrap,
                    other => return Err(self.mismatch(other)),
                }
            }
            Self::JustifyContent => {
                style.justify_content = match value {
                    StyleValue::Undefined => Justify::default(),
                    StyleValue::Justify(justify) => justify,
                    other => return Err(self.mismatch(other)),
                }
            }
            Self::AlignItems => style.align_items = self.align(value, Align::Stretch)?,
            Self::AlignSelf => style.align_self = self.align(value, Align::Auto)?,
            Self::AlignContent => style.align_content = self.align(value, Align::FlexStart)?,
            Self::Position => {
                style.position = match value {
                    StyleValue::Undefined => PositionType::default(),
                    StyleValue::Position(position) => position,
                    other => return Err(self.mismatch(other)),
                }
            }
            Self::AspectRatio => style.aspect_ratio = self.number(value)?,
            Self::Overflow => {
                style.overflow = match value {
                    StyleValue::Undefined => Overflow::default(),
                    StyleValue::Overflow(overflow) => overflow,
                    other => return Err(self.mismatch(other)),
                }
            }
            Self::Display => {
                style.display = match value {
                    StyleValue::Undefined => Display::default(),
                    StyleValue::Display(display) => display,
                    other => return Err(self.mismatch(other)),
                }
            }
        }
        Ok(())
    }

    /// Parse a textual value (as found in scene files) for this property
    pub fn parse_value(self, raw: &str) -> Result<StyleValue, StyleError> {
        if raw.trim() == "undefined" {
            return Ok(StyleValue::Undefined);
        }
        let value = match self.kind() {
            ValueKind::Dimension => StyleValue::Dimension(raw.parse()?),
            ValueKind::Number => {
                let number: f64 = raw.trim().parse().map_err(|_| StyleError::InvalidValue {
                    property: self,
                    value: raw.to_string(),
                    expected: self.expected(),
                })?;
                StyleValue::Number(number)
            }
            ValueKind::FlexDirection => StyleValue::FlexDirection(raw.parse()?),
            ValueKind::FlexWrap => StyleValue::FlexWrap(raw.parse()?),
            ValueKind::Justify => StyleValue::Justify(raw.parse()?),
            ValueKind::Align => StyleValue::Align(raw.parse()?),
            ValueKind::Position => StyleValue::Position(raw.parse()?),
            ValueKind::Overflow => StyleValue::Overflow(raw.parse()?),
            ValueKind::Display => StyleValue::Display(raw.parse()?),
        };
        Ok(value)
    }

    /// Lengths and numbers must be finite
    fn dimension(self, value: StyleValue) -> Result<Dimension, StyleError> {
        match value {
            StyleValue::Undefined => Ok(Dimension::Undefined),
            StyleValue::Dimension(Dimension::Points(n) | Dimension::Percent(n)) if !n.is_finite() => {
                Err(self.mismatch(value))
            }
            StyleValue::Dimension(dimension) => Ok(dimension),
            StyleValue::Number(points) if points.is_finite() => Ok(Dimension::Points(points)),
            other => Err(self.mismatch(other)),
        }
    }

    fn number(self, value: StyleValue) -> Result<Option<f64>, StyleError> {
        match value {
            StyleValue::Undefined => Ok(None),
            StyleValue::Number(number) if number.is_finite() => Ok(Some(number)),
            other => Err(self.mismatch(other)),
        }
    }

    fn align(self, value: StyleValue, default: Align) -> Result<Align, StyleError> {
        match value {
            StyleValue::Undefined => Ok(default),
            StyleValue::Align(align) => Ok(align),
            other => Err(self.mismatch(other)),
        }
    }

    fn mismatch(self, value: StyleValue) -> StyleError {
        StyleError::InvalidValue {
            property: self,
            value: value.to_string(),
            expected: self.expected(),
        }
    }
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StyleProperty {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|property| property.name() == s)
            .ok_or_else(|| StyleError::UnknownProperty(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        let mut style = Style::default();
        assert!(StyleProperty::Width
            .write(&mut style, StyleValue::Number(f64::NAN))
            .is_err());
        assert!(StyleProperty::Left
            .write(&mut style, StyleValue::Dimension(Dimension::Percent(f64::INFINITY)))
            .is_err());
        assert!(StyleProperty::FlexGrow
            .write(&mut style, StyleValue::Number(f64::NAN))
            .is_err());
        let parsed = StyleProperty::Width.parse_value("NaN").unwrap();
        assert!(StyleProperty::Width.write(&mut style, parsed).is_err());
        assert_eq!(style, Style::default());
    }

    #[test]
    fn test_names_round_trip_through_from_str() {
        for property in StyleProperty::ALL {
            assert_eq!(property.name().parse::<StyleProperty>().unwrap(), property);
        }
    }

    #[test]
    fn test_unknown_property_name() {
        let err = "colour".parse::<StyleProperty>().unwrap_err();
        assert_eq!(err, StyleError::UnknownProperty("colour".to_string()));
    }

    #[test]
    fn test_write_then_read_width() {
        let mut style = Style::default();
        StyleProperty::Width
            .write(&mut style, StyleValue::Number(120.0))
            .unwrap();
        assert_eq!(style.width, Dimension::Points(120.0));
        assert_eq!(
            StyleProperty::Width.read(&style),
            StyleValue::Dimension(Dimension::Points(120.0))
        );
    }

    #[test]
    fn test_shorthand_writes_all_field() {
        let mut style = Style::default();
        StyleProperty::Margin
            .write(&mut style, Dimension::Points(8.0).into())
            .unwrap();
        StyleProperty::MarginHorizontal
            .write(&mut style, Dimension::Points(4.0).into())
            .unwrap();
        assert_eq!(style.margin.all, Dimension::Points(8.0));
        assert_eq!(style.margin.horizontal, Dimension::Points(4.0));
        assert_eq!(
            StyleProperty::Margin.read(&style),
            StyleValue::Dimension(Dimension::Points(8.0))
        );
    }

    #[test]
    fn test_undefined_resets_keyword() {
        let mut style = Style::default();
        StyleProperty::FlexDirection
            .write(&mut style, FlexDirection::Row.into())
            .unwrap();
        StyleProperty::FlexDirection
            .write(&mut style, StyleValue::Undefined)
            .unwrap();
        assert_eq!(style.flex_direction, FlexDirection::Column);
    }

    #[test]
    fn test_mismatched_value_is_rejected() {
        let mut style = Style::default();
        let err = StyleProperty::FlexDirection
            .write(&mut style, StyleValue::Number(3.0))
            .unwrap_err();
        assert!(matches!(
            err,
            StyleError::InvalidValue {
                property: StyleProperty::FlexDirection,
                ..
            }
        ));
        assert_eq!(style.flex_direction, FlexDirection::Column);
    }

    #[test]
    fn test_unset_number_reads_undefined() {
        let style = Style::default();
        assert_eq!(StyleProperty::FlexGrow.read(&style), StyleValue::Undefined);
    }

    #[test]
    fn test_parse_value_by_kind() {
        assert_eq!(
            StyleProperty::Width.parse_value("50%").unwrap(),
            StyleValue::Dimension(Dimension::Percent(50.0))
        );
        assert_eq!(
            StyleProperty::FlexGrow.parse_value("2").unwrap(),
            StyleValue::Number(2.0)
        );
        assert_eq!(
            StyleProperty::AlignSelf.parse_value("center").unwrap(),
            StyleValue::Align(Align::Center)
        );
        assert_eq!(
            StyleProperty::Display.parse_value("undefined").unwrap(),
            StyleValue::Undefined
        );
        assert!(StyleProperty::AspectRatio.parse_value("wide").is_err());
    }
}
