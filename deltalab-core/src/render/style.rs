//! Colors, text/line/fill styles and numeric display rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),

    #[error("color must have 3, 6 or 8 hex digits: {0:?}")]
    BadLength(String),

    #[error("invalid hex digit in color {0:?}")]
    BadDigit(String),
}

/// A CSS-style hex color (`#rgb`, `#rrggbb` or `#rrggbbaa`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    pub fn parse(s: &str) -> Result<Self, ColorError> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(s.to_string()))?;
        if !matches!(digits.len(), 3 | 6 | 8) {
            return Err(ColorError::BadLength(s.to_string()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::BadDigit(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_static(s: &'static str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::parse(&s)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

/// Colors shared by the delta studies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltaPalette {
    pub positive: Color,
    pub negative: Color,
    pub neutral: Color,
    pub label: Color,
}

impl Default for DeltaPalette {
    fn default() -> Self {
        Self {
            positive: Color::from_static("#55cc55"),
            negative: Color::from_static("#dd5555"),
            neutral: Color::from_static("#888888"),
            label: Color::from_static("#aaaaaa"),
        }
    }
}

impl DeltaPalette {
    /// Three-way sign color: positive, negative, or neutral for exactly zero.
    pub fn for_value(&self, value: f64) -> &Color {
        if value > 0.0 {
            &self.positive
        } else if value < 0.0 {
            &self.negative
        } else {
            &self.neutral
        }
    }
}

/// Default POC box color (gold).
pub fn default_poc_color() -> Color {
    Color::from_static("#FFD700")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlignment {
    CenterMiddle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: u32,
    pub font_weight: FontWeight,
    pub fill: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillStyle {
    pub color: Color,
    /// Fraction in `[0, 1]`.
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    pub color: Color,
    pub line_width: u32,
}

/// Round to the nearest integer the way the chart host does: halves go up
/// (towards positive infinity). NaN and infinities display as 0.
pub fn round_for_display(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    (value + 0.5).floor() as i64
}

/// Integer label text. Never prints `-0`.
pub fn display_integer(value: f64) -> String {
    round_for_display(value).to_string()
}
