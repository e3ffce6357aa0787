//! # Style Primitives
//!
//! Colors, padding and positions shared by every layer kind.
//!
//! All types validate on construction, so a [`Preset`](crate::preset::Preset)
//! that exists is always renderable: a color out of range or a negative
//! padding is rejected before composition starts.
//!
//! ```
//! use cardpress::style::Color;
//!
//! assert_eq!(Color::new(255, 0, 0).unwrap().hex(), "#ff0000");
//! assert!(Color::new(300, 0, 0).is_err());
//! ```

use image::Rgb;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::CardError;

// ============================================================================
// COLOR
// ============================================================================

/// An RGB color with components in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i64; 3]", into = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };

    /// Build a color, failing if any component is outside 0..=255.
    pub fn new(r: i64, g: i64, b: i64) -> Result<Self, CardError> {
        let component = |v: i64| u8::try_from(v).ok();
        match (component(r), component(g), component(b)) {
            (Some(r), Some(g), Some(b)) => Ok(Self { r, g, b }),
            _ => Err(CardError::InvalidColor { r, g, b }),
        }
    }

    /// Infallible constructor for values that are already bytes.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb` form.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb([self.r, self.g, self.b])
    }
}

impl TryFrom<[i64; 3]> for Color {
    type Error = CardError;

    fn try_from([r, g, b]: [i64; 3]) -> Result<Self, Self::Error> {
        Color::new(r, g, b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

// ============================================================================
// SPACING
// ============================================================================

/// Four-sided padding in pixels. Every side is non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSpacing")]
pub struct Spacing {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl Spacing {
    pub fn new(top: i32, bottom: i32, left: i32, right: i32) -> Result<Self, CardError> {
        if top < 0 || bottom < 0 || left < 0 || right < 0 {
            return Err(CardError::InvalidSpacing(format!(
                "values must be non-negative (top {}, bottom {}, left {}, right {})",
                top, bottom, left, right
            )));
        }
        Ok(Self {
            top,
            bottom,
            left,
            right,
        })
    }

    /// Same padding on all four sides.
    pub fn uniform(value: i32) -> Result<Self, CardError> {
        Self::new(value, value, value, value)
    }
}

/// JSON form of [`Spacing`]: a single number (uniform) or a four-sided object.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSpacing {
    Uniform(i32),
    Sides {
        #[serde(default)]
        top: i32,
        #[serde(default)]
        bottom: i32,
        #[serde(default)]
        left: i32,
        #[serde(default)]
        right: i32,
    },
}

impl TryFrom<RawSpacing> for Spacing {
    type Error = CardError;

    fn try_from(raw: RawSpacing) -> Result<Self, Self::Error> {
        match raw {
            RawSpacing::Uniform(v) => Spacing::uniform(v),
            RawSpacing::Sides {
                top,
                bottom,
                left,
                right,
            } => Spacing::new(top, bottom, left, right),
        }
    }
}

// ============================================================================
// POSITION
// ============================================================================

/// Vertical placement of a layer.
///
/// `Auto` is resolved by the composer to the current cursor plus the layer's
/// own `auto_y_padding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YPos {
    At(i32),
    #[default]
    Auto,
}

impl YPos {
    /// Resolve against the running cursor.
    pub fn resolve(self, cursor: i32, auto_y_padding: i32) -> i32 {
        match self {
            YPos::At(y) => y,
            YPos::Auto => cursor.saturating_add(auto_y_padding),
        }
    }
}

impl Serialize for YPos {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            YPos::At(y) => serializer.serialize_i32(*y),
            YPos::Auto => serializer.serialize_str("auto"),
        }
    }
}

impl<'de> Deserialize<'de> for YPos {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawY {
            At(i32),
            Keyword(String),
        }

        match RawY::deserialize(deserializer)? {
            RawY::At(y) => Ok(YPos::At(y)),
            RawY::Keyword(word) if word == "auto" => Ok(YPos::Auto),
            RawY::Keyword(word) => Err(serde::de::Error::custom(format!(
                "expected an integer or \"auto\" for y, got \"{}\"",
                word
            ))),
        }
    }
}

/// Layer anchor: explicit x plus an explicit or deferred y.
///
/// Serialized as `[x, y]` or `[x, "auto"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "(i32, YPos)", into = "(i32, YPos)")]
pub struct Position {
    pub x: i32,
    pub y: YPos,
}

impl Position {
    pub const fn at(x: i32, y: i32) -> Self {
        Self { x, y: YPos::At(y) }
    }

    pub const fn auto(x: i32) -> Self {
        Self { x, y: YPos::Auto }
    }
}

impl From<(i32, YPos)> for Position {
    fn from((x, y): (i32, YPos)) -> Self {
        Self { x, y }
    }
}

impl From<Position> for (i32, YPos) {
    fn from(p: Position) -> Self {
        (p.x, p.y)
    }
}

/// Text box background mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BgType {
    #[default]
    None,
    Solid,
}
