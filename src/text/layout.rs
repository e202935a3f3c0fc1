//! Shaped text: paragraphs of lines of words of runs.

use crate::draw::{decode_image, raster_size};
use crate::error::{Error, Result};
use crate::export::css;
use crate::model::{Color, Font, HorzAlign, Rect};
use image::ImageOutputFormat;
use std::io::Cursor;

/// Vertical placement of a run relative to the baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Baseline {
    #[default]
    Normal,
    Subscript,
    Superscript,
}

/// Visual style of a run.
///
/// Equality compares every field; adjacent runs with equal descriptors share
/// one style scope in the output.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDescriptor {
    pub font_family: String,
    /// Font size in output pixels
    pub font_size: f32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikeout: bool,
    pub color: Color,
    pub background: Option<Color>,
    pub baseline: Baseline,
}

impl StyleDescriptor {
    /// Style of a font at the given scale.
    pub fn from_font(font: &Font, color: Color, scale: f32) -> Self {
        Self {
            font_family: font.family.clone(),
            font_size: font.size_px() * scale,
            bold: font.bold,
            italic: font.italic,
            underline: font.underline,
            strikeout: font.strikeout,
            color,
            background: None,
            baseline: Baseline::Normal,
        }
    }

    /// Inline CSS for the run wrapper.
    pub fn to_css(&self) -> String {
        let mut out = format!(
            "font-family:{};font-size:{}",
            css::font_family(&self.font_family),
            css::px(self.font_size)
        );
        if self.bold {
            out.push_str("font-weight:bold;");
        }
        if self.italic {
            out.push_str("font-style:italic;");
        }
        match (self.underline, self.strikeout) {
            (true, true) => out.push_str("text-decoration:underline line-through;"),
            (true, false) => out.push_str("text-decoration:underline;"),
            (false, true) => out.push_str("text-decoration:line-through;"),
            (false, false) => {}
        }
        out.push_str(&format!("color:{};", self.color.to_css()));
        if let Some(background) = self.background {
            out.push_str(&format!("background-color:{};", background.to_css()));
        }
        match self.baseline {
            Baseline::Normal => {}
            Baseline::Subscript => out.push_str("vertical-align:sub;"),
            Baseline::Superscript => out.push_str("vertical-align:super;"),
        }
        out
    }
}

/// A bitmap placed inline with text.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    /// Encoded source bytes
    pub data: Vec<u8>,
    /// Display width in output pixels
    pub width: f32,
    /// Display height in output pixels
    pub height: f32,
}

impl InlineImage {
    /// Decode the source and re-encode it as PNG at its display size.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let (w, h) = raster_size(self.width, self.height)?;
        let decoded = decode_image(&self.data)?;
        let resized = if decoded.width() == w && decoded.height() == h {
            decoded
        } else {
            decoded.resize_exact(w, h, image::imageops::FilterType::CatmullRom)
        };

        let mut out = Cursor::new(Vec::new());
        resized
            .write_to(&mut out, ImageOutputFormat::Png)
            .map_err(|e| Error::Image(format!("PNG encoding failed: {}", e)))?;
        Ok(out.into_inner())
    }
}

/// Content of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunKind {
    /// Literal text
    Text(String),
    /// Inline bitmap
    Image(InlineImage),
}

/// A horizontally placed piece of a word with a single style.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub style: StyleDescriptor,
    /// Absolute left position in output pixels
    pub left: f32,
    /// Advance width in output pixels
    pub width: f32,
    pub kind: RunKind,
}

impl Run {
    /// Text run.
    pub fn text(style: StyleDescriptor, text: impl Into<String>, left: f32, width: f32) -> Self {
        Self {
            style,
            left,
            width,
            kind: RunKind::Text(text.into()),
        }
    }

    /// Image run sized by the image.
    pub fn image(style: StyleDescriptor, image: InlineImage, left: f32) -> Self {
        Self {
            style,
            left,
            width: image.width,
            kind: RunKind::Image(image),
        }
    }
}

/// Kind of a word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WordKind {
    #[default]
    Normal,
    Space,
    /// Tab stop; its runs' widths reach the next stop
    Tab,
}

/// A word: one or more runs without a break opportunity between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Word {
    pub kind: WordKind,
    pub runs: Vec<Run>,
}

impl Word {
    pub fn new(kind: WordKind) -> Self {
        Self {
            kind,
            runs: Vec::new(),
        }
    }

    /// Total advance width.
    pub fn width(&self) -> f32 {
        self.runs.iter().map(|r| r.width).sum()
    }
}

/// One visual line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    /// Absolute top in output pixels
    pub top: f32,
    pub height: f32,
    /// Extra space below the line
    pub line_spacing: f32,
    pub horz_align: HorzAlign,
    pub words: Vec<Word>,
}

impl Line {
    /// Bottom edge, spacing excluded.
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Total advance width of the words.
    pub fn width(&self) -> f32 {
        self.words.iter().map(Word::width).sum()
    }
}

/// A paragraph: lines stacked top to bottom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub lines: Vec<Line>,
}

/// Result of shaping one object's text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLayout {
    pub paragraphs: Vec<Paragraph>,
    /// Area the text was laid out into, in output pixels
    pub display_rect: Rect,
    /// Indent of the first line of every paragraph
    pub first_line_indent: f32,
}

impl TextLayout {
    /// All lines in order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.paragraphs.iter().flat_map(|p| p.lines.iter())
    }

    /// First line, if any.
    pub fn first_line(&self) -> Option<&Line> {
        self.lines().next()
    }

    /// Height from the top of the first line to the bottom of the last.
    pub fn height(&self) -> f32 {
        let mut lines = self.lines();
        let Some(first) = lines.next() else {
            return 0.0;
        };
        let last = lines.last().unwrap_or(first);
        last.bottom() + last.line_spacing - first.top
    }

    /// Check if nothing was laid out.
    pub fn is_empty(&self) -> bool {
        self.lines().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> StyleDescriptor {
        StyleDescriptor::from_font(&Font::new("Arial", 12.0), Color::BLACK, 1.0)
    }

    #[test]
    fn test_style_equality_is_by_value() {
        let a = style();
        let mut b = style();
        assert_eq!(a, b);
        b.bold = true;
        assert_ne!(a, b);
    }

    #[test]
    fn test_style_css() {
        let mut s = style();
        s.bold = true;
        s.underline = true;
        s.baseline = Baseline::Superscript;
        assert_eq!(
            s.to_css(),
            "font-family:Arial;font-size:16px;font-weight:bold;text-decoration:underline;color:#000000;vertical-align:super;"
        );
    }

    #[test]
    fn test_layout_height() {
        let layout = TextLayout {
            paragraphs: vec![Paragraph {
                lines: vec![
                    Line {
                        top: 10.0,
                        height: 15.0,
                        ..Line::default()
                    },
                    Line {
                        top: 25.0,
                        height: 15.0,
                        ..Line::default()
                    },
                ],
            }],
            ..TextLayout::default()
        };
        assert_eq!(layout.height(), 30.0);
        assert_eq!(TextLayout::default().height(), 0.0);
    }

    #[test]
    fn test_inline_image_bad_data() {
        let image = InlineImage {
            data: vec![1, 2, 3],
            width: 4.0,
            height: 4.0,
        };
        assert!(matches!(image.to_png(), Err(Error::Image(_))));
    }
}
