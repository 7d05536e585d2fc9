//! Typed style values
//!
//! Every value a [`StyleProperty`](super::StyleProperty) can hold is one of the
//! variants of [`StyleValue`]. Keyword values use the same spelling as CSS
//! (`flex-start`, `row-reverse`, ...), which is also what scene files use.

use std::fmt;
use std::str::FromStr;

use super::StyleError;

/// A length that is either absolute, relative to the parent, or left to the engine
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    /// Not set; the engine falls back to shorthands or its own default
    #[default]
    Undefined,
    /// Explicitly left to the engine
    Auto,
    /// Absolute length in points
    Points(f64),
    /// Percentage of the parent's corresponding size
    Percent(f64),
}

impl Dimension {
    /// True for [`Points`](Self::Points) and [`Percent`](Self::Percent)
    pub fn is_definite(self) -> bool {
        matches!(self, Self::Points(_) | Self::Percent(_))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Auto => f.write_str("auto"),
            Self::Points(v) => write!(f, "{}", v),
            Self::Percent(v) => write!(f, "{}%", v),
        }
    }
}

impl FromStr for Dimension {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            "auto" => return Ok(Self::Auto),
            "undefined" => return Ok(Self::Undefined),
            _ => {}
        }

        let invalid = || StyleError::InvalidDimension(s.to_string());
        if let Some(percent) = trimmed.strip_suffix('%') {
            let value: f64 = percent.trim().parse().map_err(|_| invalid())?;
            return Ok(Self::Percent(value));
        }
        let points = trimmed.strip_suffix("pt").unwrap_or(trimmed);
        points.trim().parse().map(Self::Points).map_err(|_| invalid())
    }
}

/// Declares a keyword enum with CSS spelling for parsing and display
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $keyword:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Accepted keywords, in declaration order
            pub const KEYWORDS: &'static [&'static str] = &[$($keyword),+];

            /// The CSS keyword for this value
            pub fn keyword(self) -> &'static str {
                match self {
                    $( Self::$variant => $keyword ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.keyword())
            }
        }

        impl FromStr for $name {
            type Err = StyleError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $( $keyword => Ok(Self::$variant), )+
                    other => Err(StyleError::UnknownKeyword {
                        keyword: other.to_string(),
                        expected: Self::KEYWORDS.join(", "),
                    }),
                }
            }
        }
    };
}

keyword_enum! {
    /// Main axis of a container
    FlexDirection {
        Column => "column",
        ColumnReverse => "column-reverse",
        Row => "row",
        RowReverse => "row-reverse",
    }
}

impl FlexDirection {
    pub fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    pub fn is_reverse(self) -> bool {
        matches!(self, Self::ColumnReverse | Self::RowReverse)
    }
}

impl Default for FlexDirection {
    fn default() -> Self {
        Self::Column
    }
}

keyword_enum! {
    /// Whether children may wrap onto additional lines
    FlexWrap {
        NoWrap => "nowrap",
        Wrap => "wrap",
        WrapReverse => "wrap-reverse",
    }
}

impl Default for FlexWrap {
    fn default() -> Self {
        Self::NoWrap
    }
}

keyword_enum! {
    /// Distribution of children along the main axis
    Justify {
        FlexStart => "flex-start",
        Center => "center",
        FlexEnd => "flex-end",
        SpaceBetween => "space-between",
        SpaceAround => "space-around",
        SpaceEvenly => "space-evenly",
    }
}

impl Default for Justify {
    fn default() -> Self {
        Self::FlexStart
    }
}

keyword_enum! {
    /// Alignment along the cross axis
    Align {
        Auto => "auto",
        FlexStart => "flex-start",
        Center => "center",
        FlexEnd => "flex-end",
        Stretch => "stretch",
        Baseline => "baseline",
        SpaceBetween => "space-between",
        SpaceAround => "space-around",
    }
}

keyword_enum! {
    /// Whether a node takes part in its parent's flow
    PositionType {
        Relative => "relative",
        Absolute => "absolute",
    }
}

impl Default for PositionType {
    fn default() -> Self {
        Self::Relative
    }
}

keyword_enum! {
    Overflow {
        Visible => "visible",
        Hidden => "hidden",
        Scroll => "scroll",
    }
}

impl Default for Overflow {
    fn default() -> Self {
        Self::Visible
    }
}

keyword_enum! {
    Display {
        Flex => "flex",
        None => "none",
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::Flex
    }
}

/// A value read from or written to a style property
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleValue {
    /// Resets the property to its default on write; returned for unset numbers
    Undefined,
    Dimension(Dimension),
    Number(f64),
    FlexDirection(FlexDirection),
    FlexWrap(FlexWrap),
    Justify(Justify),
    Align(Align),
    Position(PositionType),
    Overflow(Overflow),
    Display(Display),
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Dimension(v) => write!(f, "{}", v),
            Self::Number(v) => write!(f, "{}", v),
            Self::FlexDirection(v) => write!(f, "{}", v),
            Self::FlexWrap(v) => write!(f, "{}", v),
            Self::Justify(v) => write!(f, "{}", v),
            Self::Align(v) => write!(f, "{}", v),
            Self::Position(v) => write!(f, "{}", v),
            Self::Overflow(v) => write!(f, "{}", v),
            Self::Display(v) => write!(f, "{}", v),
        }
    }
}

impl From<Dimension> for StyleValue {
    fn from(value: Dimension) -> Self {
        Self::Dimension(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<FlexDirection> for StyleValue {
    fn from(value: FlexDirection) -> Self {
        Self::FlexDirection(value)
    }
}

impl From<FlexWrap> for StyleValue {
    fn from(value: FlexWrap) -> Self {
        Self::FlexWrap(value)
    }
}

impl From<Justify> for StyleValue {
    fn from(value: Justify) -> Self {
        Self::Justify(value)
    }
}

impl From<Align> for StyleValue {
    fn from(value: Align) -> Self {
        Self::Align(value)
    }
}

impl From<PositionType> for StyleValue {
    fn from(value: PositionType) -> Self {
        Self::Position(value)
    }
}

impl From<Overflow> for StyleValue {
    fn from(value: Overflow) -> Self {
        Self::Overflow(value)
    }
}

impl From<Display> for StyleValue {
    fn from(value: Display) -> Self {
        Self::Display(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimension() {
        assert_eq!("auto".parse::<Dimension>().unwrap(), Dimension::Auto);
        assert_eq!("50%".parse::<Dimension>().unwrap(), Dimension::Percent(50.0));
        assert_eq!("12".parse::<Dimension>().unwrap(), Dimension::Points(12.0));
        assert_eq!("12pt".parse::<Dimension>().unwrap(), Dimension::Points(12.0));
        assert!("wide".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_dimension_display() {
        assert_eq!(Dimension::Percent(25.0).to_string(), "25%");
        assert_eq!(Dimension::Points(10.5).to_string(), "10.5");
    }

    #[test]
    fn test_keyword_parse_and_display() {
        assert_eq!(
            "row-reverse".parse::<FlexDirection>().unwrap(),
            FlexDirection::RowReverse
        );
        assert_eq!(Justify::SpaceBetween.to_string(), "space-between");
    }

    #[test]
    fn test_unknown_keyword_lists_expected() {
        let err = "diagonal".parse::<FlexDirection>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("diagonal"));
        assert!(message.contains("row-reverse"));
    }
}
