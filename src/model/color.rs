//! ARGB colour value with CSS rendering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 32-bit colour. Serialized as `#RRGGBB`, `#AARRGGBB` or `transparent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::argb(0, 255, 255, 255);

    /// Opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Colour with alpha.
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Check if the colour is fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// CSS representation.
    pub fn to_css(&self) -> String {
        match self.a {
            0 => "transparent".to_string(),
            255 => format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b),
            a => format!(
                "rgba({},{},{},{:.2})",
                self.r,
                self.g,
                self.b,
                a as f32 / 255.0
            ),
        }
    }

    /// Same colour with alpha scaled by `opacity` (0..=1).
    pub fn with_opacity(&self, opacity: f32) -> Self {
        let a = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..*self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 0 {
            write!(f, "transparent")
        } else if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("transparent") {
            return Ok(Color::TRANSPARENT);
        }

        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("Invalid colour '{}': expected #RRGGBB", s))?;
        let value =
            u32::from_str_radix(hex, 16).map_err(|_| format!("Invalid colour '{}'", s))?;

        match hex.len() {
            6 => Ok(Color::rgb(
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            )),
            8 => Ok(Color::argb(
                (value >> 24) as u8,
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            )),
            _ => Err(format!("Invalid colour '{}': expected 6 or 8 digits", s)),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}
