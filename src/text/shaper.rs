//! Text shaping collaborator and the built-in metric shaper.

use super::markup::{self, Segment};
use super::{InlineImage, Line, Paragraph, Run, StyleDescriptor, TextLayout, Word, WordKind};
use crate::error::Result;
use crate::model::{Color, Font, HorzAlign, Rect, TextObject, TextRenderMode};

/// Everything a shaper needs to lay out one object's text.
#[derive(Debug, Clone)]
pub struct ShapeRequest<'a> {
    pub text: &'a str,
    pub font: &'a Font,
    pub color: Color,
    /// Text area in unscaled pixels
    pub rect: Rect,
    pub horz_align: HorzAlign,
    pub word_wrap: bool,
    /// Parse inline tags
    pub rich: bool,
    /// Explicit line height in unscaled pixels (0 = from font)
    pub line_height: f32,
    pub first_line_indent: f32,
    /// Output pixels per unscaled pixel
    pub scale: f32,
}

impl<'a> ShapeRequest<'a> {
    /// Request for a text object laid out inside `rect`.
    pub fn for_text(text: &'a TextObject, rect: Rect, scale: f32) -> Self {
        Self {
            text: &text.text,
            font: &text.font,
            color: text.text_color,
            rect,
            horz_align: text.horz_align,
            word_wrap: text.word_wrap,
            rich: text.render_mode != TextRenderMode::Plain,
            line_height: text.line_height,
            first_line_indent: text.first_line_indent,
            scale,
        }
    }
}

/// Lays out text into paragraphs, lines, words and runs.
///
/// Implementations must be usable from several export sessions at once.
pub trait TextShaper: Send + Sync {
    /// Shape the request into a layout in output pixels.
    fn shape(&self, request: &ShapeRequest<'_>) -> Result<TextLayout>;
}

/// Shaper using fixed per-font metrics instead of real glyph outlines.
///
/// Advances are a constant fraction of the font size, which keeps layouts
/// deterministic and independent of installed fonts.
#[derive(Debug, Clone)]
pub struct MetricShaper {
    /// Average glyph advance as a fraction of the font size
    pub char_width: f32,
    /// Extra advance ratio for bold text
    pub bold_factor: f32,
    /// Line height as a fraction of the font size
    pub line_factor: f32,
    /// Distance between tab stops in unscaled pixels
    pub tab_width: f32,
}

impl Default for MetricShaper {
    fn default() -> Self {
        Self {
            char_width: 0.5,
            bold_factor: 1.1,
            line_factor: 1.15,
            tab_width: 58.0,
        }
    }
}

impl MetricShaper {
    /// Create a shaper with default metrics.
    pub fn new() -> Self {
        Self::default()
    }

    fn advance(&self, style: &StyleDescriptor, text: &str) -> f32 {
        let per_char = style.font_size * self.char_width * if style.bold { self.bold_factor } else { 1.0 };
        text.chars().count() as f32 * per_char
    }

    fn natural_line_height(&self, style: &StyleDescriptor) -> f32 {
        style.font_size * self.line_factor
    }

    /// Split segments into paragraphs of words.
    fn words(&self, segments: Vec<Segment>) -> Vec<Vec<Pending>> {
        let mut paragraphs = vec![Vec::new()];

        for segment in segments {
            match segment {
                Segment::Break => paragraphs.push(Vec::new()),
                Segment::Image(style, image) => {
                    if let Some(current) = paragraphs.last_mut() {
                        current.push(Pending::image(style, image));
                    }
                }
                Segment::Text(style, text) => {
                    let mut lines = text.split('\n').peekable();
                    while let Some(piece) = lines.next() {
                        if let Some(current) = paragraphs.last_mut() {
                            split_words(current, &style, piece.trim_end_matches('\r'));
                        }
                        if lines.peek().is_some() {
                            paragraphs.push(Vec::new());
                        }
                    }
                }
            }
        }

        paragraphs
    }
}

/// A word before placement: runs with widths still unknown.
#[derive(Debug)]
struct Pending {
    kind: WordKind,
    pieces: Vec<(StyleDescriptor, PendingContent)>,
}

#[derive(Debug)]
enum PendingContent {
    Text(String),
    Image(InlineImage),
}

impl Pending {
    fn image(style: StyleDescriptor, image: InlineImage) -> Self {
        Self {
            kind: WordKind::Normal,
            pieces: vec![(style, PendingContent::Image(image))],
        }
    }
}

fn char_kind(ch: char) -> WordKind {
    match ch {
        '\t' => WordKind::Tab,
        c if c.is_whitespace() => WordKind::Space,
        _ => WordKind::Normal,
    }
}

/// Append the words of `text` to `words`, continuing the last word when a
/// style change falls inside it.
fn split_words(words: &mut Vec<Pending>, style: &StyleDescriptor, text: &str) {
    for ch in text.chars() {
        let kind = char_kind(ch);
        let continues = kind != WordKind::Tab
            && words.last().is_some_and(|w| {
                w.kind == kind && !matches!(w.pieces.last(), Some((_, PendingContent::Image(_))))
            });

        if !continues {
            words.push(Pending {
                kind,
                pieces: Vec::new(),
            });
        }
        let Some(word) = words.last_mut() else { continue };
        match word.pieces.last_mut() {
            Some((s, PendingContent::Text(t))) if s == style => t.push(ch),
            _ => word
                .pieces
                .push((style.clone(), PendingContent::Text(ch.to_string()))),
        }
    }
}

impl TextShaper for MetricShaper {
    fn shape(&self, request: &ShapeRequest<'_>) -> Result<TextLayout> {
        let scale = request.scale;
        let base = StyleDescriptor::from_font(request.font, request.color, scale);
        let segments = if request.rich {
            markup::parse(request.text, &base, scale)
        } else {
            vec![Segment::Text(base.clone(), request.text.to_string())]
        };

        let display = Rect::new(
            request.rect.left * scale,
            request.rect.top * scale,
            request.rect.width * scale,
            request.rect.height * scale,
        );
        let indent = request.first_line_indent * scale;
        let tab = (self.tab_width * scale).max(1.0);
        let explicit_height = request.line_height * scale;

        let mut layout = TextLayout {
            paragraphs: Vec::new(),
            display_rect: display,
            first_line_indent: indent,
        };
        let mut top = display.top;

        for words in self.words(segments) {
            let mut paragraph = Paragraph::default();
            let mut line = Line {
                top,
                horz_align: request.horz_align,
                ..Line::default()
            };
            let mut x = indent;
            let mut line_height = self.natural_line_height(&base);

            for pending in words {
                let is_first_word = line.words.is_empty();
                let mut word = Word::new(pending.kind);
                let mut cursor = x;

                for (style, content) in pending.pieces {
                    let run = match content {
                        PendingContent::Text(text) => {
                            let width = if pending.kind == WordKind::Tab {
                                let next_stop = ((cursor / tab).floor() + 1.0) * tab;
                                next_stop - cursor
                            } else {
                                self.advance(&style, &text)
                            };
                            Run::text(style, text, display.left + cursor, width)
                        }
                        PendingContent::Image(image) => Run::image(style, image, display.left + cursor),
                    };
                    cursor += run.width;
                    word.runs.push(run);
                }

                let width = cursor - x;
                if request.word_wrap && !is_first_word && x + width > display.width {
                    if word.kind == WordKind::Space {
                        continue;
                    }
                    finish_line(&mut line, line_height, explicit_height, display.width);
                    top = line.bottom() + line.line_spacing;
                    paragraph.lines.push(std::mem::take(&mut line));
                    line = Line {
                        top,
                        horz_align: request.horz_align,
                        ..Line::default()
                    };
                    line_height = self.natural_line_height(&base);
                    // re-place the word at the start of the new line
                    let shift = -x;
                    for run in &mut word.runs {
                        run.left += shift;
                    }
                    x = 0.0;
                }

                for run in &word.runs {
                    let h = match &run.kind {
                        super::RunKind::Text(_) => self.natural_line_height(&run.style),
                        super::RunKind::Image(img) => img.height,
                    };
                    line_height = line_height.max(h);
                }
                x += word.width();
                line.words.push(word);
            }

            finish_line(&mut line, line_height, explicit_height, display.width);
            top = line.bottom() + line.line_spacing;
            paragraph.lines.push(line);
            layout.paragraphs.push(paragraph);
        }

        Ok(layout)
    }
}

/// Set the line height and apply horizontal alignment.
fn finish_line(line: &mut Line, natural: f32, explicit: f32, available: f32) {
    if explicit > 0.0 {
        line.height = natural.min(explicit);
        line.line_spacing = (explicit - natural).max(0.0);
    } else {
        line.height = natural;
    }

    let slack = available - line.width();
    let shift = match line.horz_align {
        HorzAlign::Center => slack / 2.0,
        HorzAlign::Right => slack,
        HorzAlign::Left | HorzAlign::Justify => 0.0,
    };
    if shift > 0.0 {
        for run in line.words.iter_mut().flat_map(|w| w.runs.iter_mut()) {
            run.left += shift;
        }
    }
}
