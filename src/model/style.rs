//! Border, fill and font specifications shared by all document objects.

use super::Color;
use serde::{Deserialize, Serialize};

/// Dash style of a border line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
    DashDotDot,
    Double,
}

impl LineStyle {
    /// CSS `border-style` keyword.
    pub fn css(&self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dot => "dotted",
            LineStyle::Double => "double",
            LineStyle::Dash | LineStyle::DashDot | LineStyle::DashDotDot => "dashed",
        }
    }

    /// Dash pattern in multiples of the line width, `None` for solid lines.
    pub fn dash_pattern(&self) -> Option<&'static [f32]> {
        match self {
            LineStyle::Solid | LineStyle::Double => None,
            LineStyle::Dash => Some(&[3.0, 1.0]),
            LineStyle::Dot => Some(&[1.0, 1.0]),
            LineStyle::DashDot => Some(&[3.0, 1.0, 1.0, 1.0]),
            LineStyle::DashDotDot => Some(&[3.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
        }
    }
}

/// One side of a border.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderLine {
    /// Line width in pixels
    pub width: f32,
    pub color: Color,
    pub style: LineStyle,
}

impl Default for BorderLine {
    fn default() -> Self {
        Self {
            width: 1.0,
            color: Color::BLACK,
            style: LineStyle::Solid,
        }
    }
}

/// Which sides of a border are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderSides {
    pub left: bool,
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
}

impl BorderSides {
    pub const NONE: BorderSides = BorderSides {
        left: false,
        top: false,
        right: false,
        bottom: false,
    };

    pub const ALL: BorderSides = BorderSides {
        left: true,
        top: true,
        right: true,
        bottom: true,
    };

    /// Check if no side is drawn.
    pub fn is_none(&self) -> bool {
        !(self.left || self.top || self.right || self.bottom)
    }
}

/// Border of a document object, including its optional drop shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Border {
    /// Visible sides
    pub lines: BorderSides,
    pub left: BorderLine,
    pub top: BorderLine,
    pub right: BorderLine,
    pub bottom: BorderLine,
    /// Draw a drop shadow below and right of the object
    pub shadow: bool,
    pub shadow_width: f32,
    pub shadow_color: Color,
}

impl Border {
    /// Border with no visible sides.
    pub fn none() -> Self {
        Self::default()
    }

    /// Border with all four sides using the same line.
    pub fn all(width: f32, color: Color) -> Self {
        let line = BorderLine {
            width,
            color,
            style: LineStyle::Solid,
        };
        Self {
            lines: BorderSides::ALL,
            left: line,
            top: line,
            right: line,
            bottom: line,
            ..Self::default()
        }
    }

    /// Set every line to the same width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.left.width = width;
        self.top.width = width;
        self.right.width = width;
        self.bottom.width = width;
        self
    }

    /// Enable the drop shadow.
    pub fn with_shadow(mut self, width: f32, color: Color) -> Self {
        self.shadow = true;
        self.shadow_width = width;
        self.shadow_color = color;
        self
    }

    /// Check if any side is drawn.
    pub fn is_visible(&self) -> bool {
        !self.lines.is_none()
    }
}

impl Default for Border {
    fn default() -> Self {
        Self {
            lines: BorderSides::NONE,
            left: BorderLine::default(),
            top: BorderLine::default(),
            right: BorderLine::default(),
            bottom: BorderLine::default(),
            shadow: false,
            shadow_width: 4.0,
            shadow_color: Color::BLACK,
        }
    }
}

/// Background fill of an object.
///
/// Only solid fills are expressible as CSS; every other fill is rendered to
/// a raster and used as the element background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fill {
    /// Single colour
    Solid { color: Color },

    /// Two-colour linear gradient, angle in degrees (0 = left to right)
    LinearGradient {
        start: Color,
        end: Color,
        #[serde(default)]
        angle: f32,
    },

    /// Raster image stretched over the object
    Texture {
        #[serde(with = "super::bytes")]
        image: Vec<u8>,
    },
}

impl Fill {
    /// Solid fill with the given colour.
    pub fn solid(color: Color) -> Self {
        Fill::Solid { color }
    }

    /// Check if the fill can be expressed as a CSS colour.
    pub fn is_solid(&self) -> bool {
        matches!(self, Fill::Solid { .. })
    }

    /// The colour of a solid fill.
    pub fn solid_color(&self) -> Option<Color> {
        match self {
            Fill::Solid { color } => Some(*color),
            _ => None,
        }
    }
}

impl Default for Fill {
    fn default() -> Self {
        Fill::Solid {
            color: Color::TRANSPARENT,
        }
    }
}

/// Font specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    pub family: String,
    /// Size in points
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikeout: bool,
}

impl Font {
    /// Create a regular font.
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            ..Self::default()
        }
    }

    /// Size in device pixels.
    pub fn size_px(&self) -> f32 {
        self.size * super::PX_PER_PT
    }
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "Arial".to_string(),
            size: 10.0,
            bold: false,
            italic: false,
            underline: false,
            strikeout: false,
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorzAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl HorzAlign {
    /// CSS `text-align` keyword.
    pub fn css(&self) -> &'static str {
        match self {
            HorzAlign::Left => "left",
            HorzAlign::Center => "center",
            HorzAlign::Right => "right",
            HorzAlign::Justify => "justify",
        }
    }
}

/// Vertical text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VertAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_all() {
        let border = Border::all(2.0, Color::rgb(255, 0, 0));
        assert!(border.is_visible());
        assert_eq!(border.right.width, 2.0);
        assert!(!Border::none().is_visible());
    }

    #[test]
    fn test_fill_serde() {
        let fill: Fill = serde_json::from_str(r##"{"type":"solid","color":"#FF0000"}"##).unwrap();
        assert_eq!(fill.solid_color(), Some(Color::rgb(255, 0, 0)));

        let gradient: Fill = serde_json::from_str(
            r##"{"type":"linear_gradient","start":"#000000","end":"#FFFFFF"}"##,
        )
        .unwrap();
        assert!(!gradient.is_solid());
    }

    #[test]
    fn test_font_size_px() {
        let font = Font::new("Tahoma", 9.0);
        assert!((font.size_px() - 12.0).abs() < 1e-4);
    }
}
