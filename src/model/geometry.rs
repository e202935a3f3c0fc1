//! Units, rectangles and paddings.

use serde::{Deserialize, Serialize};

/// Device pixels per millimetre (96 dpi).
pub const PX_PER_MM: f32 = 3.78;

/// Device pixels per typographic point.
pub const PX_PER_PT: f32 = 96.0 / 72.0;

/// An axis-aligned rectangle in device-independent pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Width (may be negative for mirrored lines)
    pub width: f32,
    /// Height (may be negative for mirrored lines)
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Rectangle with non-negative extents covering the same area.
    pub fn normalized(&self) -> Self {
        let (left, width) = if self.width < 0.0 {
            (self.left + self.width, -self.width)
        } else {
            (self.left, self.width)
        };
        let (top, height) = if self.height < 0.0 {
            (self.top + self.height, -self.height)
        } else {
            (self.top, self.height)
        };
        Self::new(left, top, width, height)
    }

    /// Shrink the rectangle by a padding.
    pub fn inset(&self, padding: &Padding) -> Self {
        Self::new(
            self.left + padding.left,
            self.top + padding.top,
            self.width - padding.horizontal(),
            self.height - padding.vertical(),
        )
    }
}

/// Inner padding of an object, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Padding {
    /// Same padding on every side.
    pub fn uniform(value: f32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }

    /// Sum of left and right padding.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of top and bottom padding.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}
