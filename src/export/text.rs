//! Text layers.
//!
//! Two paths produce the inner markup of a text layer. Plain text is
//! escaped into a single block whose vertical position is corrected by a
//! measurement of the text. Rich paragraph text is shaped into lines and
//! runs first, and every line becomes a block of merged style spans.

use super::context::{ExportEnv, PageContext};
use super::css;
use super::positioner::{layer_back, LayerSource};
use super::result::ExportStats;
use crate::draw::Drawable;
use crate::error::Result;
use crate::model::{Border, HorzAlign, Padding, TextObject, TextRenderMode, VertAlign};
use crate::text::{RunKind, ShapeRequest, StyleDescriptor, TextLayout, WordKind};
use base64::Engine;

/// Bottom-aligned offsets below this many pixels fall back to the
/// uncorrected position.
pub const BOTTOM_SNAP_THRESHOLD: f32 = 31.0;

/// Escape run text into `out`.
///
/// Tabs inside a tab word become a spacer sized to `tab_stop` pixels;
/// other tabs become a plain tab entity.
fn escape_run_text(out: &mut String, text: &str, tab_stop: Option<f32>) {
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' => match tab_stop {
                Some(size) => out.push_str(&format!(
                    "<span style=\"tab-size: {}px;\">&Tab;</span>",
                    size.round()
                )),
                None => out.push_str("&Tab;"),
            },
            _ => out.push(ch),
        }
    }
}

fn open_style(out: &mut String, style: &StyleDescriptor) {
    out.push_str("<span style=\"");
    out.push_str(&style.to_css());
    out.push_str("\">");
}

fn close_style(out: &mut String) {
    out.push_str("</span>");
}

/// Markup of a shaped layout: one block per line, with runs of equal style
/// merged into one span.
///
/// `layers` sizes tab stops by the width of the line so far; otherwise by
/// the run's position. Inline images that cannot be encoded are logged,
/// counted and left out.
pub fn rich_html(layout: &TextLayout, layers: bool, stats: &mut ExportStats) -> String {
    let mut out = String::new();
    let bottom = layout.display_rect.bottom();

    for paragraph in &layout.paragraphs {
        for (i, line) in paragraph.lines.iter().enumerate() {
            let first = i == 0;

            out.push_str("<span style=\"display:block;");
            if first {
                out.push_str(&format!("text-indent:{}px;", layout.first_line_indent.floor()));
            }
            if line.top + line.height > bottom {
                out.push_str(&format!("height:{}px;", css::num((bottom - line.top).max(0.0))));
            } else if line.line_spacing > 0.0 {
                out.push_str(&format!("margin-bottom:{}px;", css::num(line.line_spacing)));
            }
            if !first {
                out.push_str("overflow:hidden;");
            }
            out.push_str(&format!("line-height:{}px;", css::num(line.height)));
            if line.horz_align == HorzAlign::Justify {
                out.push_str("text-align-last:justify;");
            } else {
                out.push_str("white-space:pre;");
            }
            out.push_str("\">");

            let mut current: Option<&StyleDescriptor> = None;
            let mut prev_width = 0.0;
            for word in &line.words {
                for run in &word.runs {
                    if current != Some(&run.style) {
                        if current.is_some() {
                            close_style(&mut out);
                        }
                        open_style(&mut out, &run.style);
                        current = Some(&run.style);
                    }

                    match &run.kind {
                        RunKind::Text(text) => {
                            let tab_stop = (word.kind == WordKind::Tab).then(|| {
                                if layers {
                                    prev_width + run.width
                                } else {
                                    run.left + run.width
                                }
                            });
                            escape_run_text(&mut out, text, tab_stop);
                        }
                        RunKind::Image(image) => match image.to_png() {
                            Ok(png) => out.push_str(&format!(
                                "<img src=\"data:image/png;base64,{}\" width=\"{}\" height=\"{}\"/>",
                                base64::engine::general_purpose::STANDARD.encode(png),
                                css::num(image.width),
                                css::num(image.height)
                            )),
                            Err(e) => {
                                log::warn!("Dropping inline image: {}", e);
                                stats.add_failed_picture();
                            }
                        },
                    }
                    prev_width += run.width;
                }
            }

            if current.is_some() {
                close_style(&mut out);
            } else {
                out.push_str("<br/>");
            }
            out.push_str("</span>");
        }
    }

    out
}

/// Convert plain text to markup.
///
/// Markup-significant characters are escaped, line breaks become `<br/>`
/// and runs of spaces keep their width. Text in HTML-tags mode is passed
/// through with only its line breaks converted.
pub fn html_string(text: &str, mode: TextRenderMode) -> String {
    let mut out = String::with_capacity(text.len());
    let passthrough = mode == TextRenderMode::HtmlTags;
    let mut prev_space = false;

    for ch in text.chars() {
        let space = ch == ' ';
        match ch {
            '\r' => {}
            '\n' => out.push_str("<br/>"),
            ' ' if prev_space => out.push_str("&nbsp;"),
            _ if passthrough => out.push(ch),
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' => out.push_str("&Tab;"),
            _ => out.push(ch),
        }
        prev_space = space;
    }
    out
}

/// Measured extents of plain text, unscaled.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMeasure {
    /// Height of the first line
    pub first_line: f32,
    /// Height of the whole text
    pub total: f32,
}

impl TextMeasure {
    pub fn of(layout: &TextLayout) -> Option<Self> {
        let first = layout.first_line()?;
        Some(Self {
            first_line: first.height,
            total: layout.height(),
        })
    }
}

/// Top offset of plain text inside a box of `height`.
///
/// Text taller than its box is centered over it. Bottom-aligned text is
/// raised by a quarter of the font's pixel size, unless that leaves it
/// closer than [`BOTTOM_SNAP_THRESHOLD`] to the top.
pub fn vertical_offset(
    align: VertAlign,
    height: f32,
    padding: &Padding,
    font_size_pt: f32,
    measure: TextMeasure,
) -> f32 {
    if align == VertAlign::Top {
        return 0.0;
    }
    if measure.first_line > height {
        return -(measure.first_line - height) / 2.0;
    }

    let text_height = if measure.total == 0.0 {
        measure.first_line
    } else {
        measure.total
    };

    match align {
        VertAlign::Top => 0.0,
        VertAlign::Center => {
            let top = (height - text_height - padding.bottom + padding.top) / 2.0;
            if top < 0.0 && height <= text_height {
                (text_height - height - padding.bottom + padding.top) / 2.0
            } else {
                top
            }
        }
        VertAlign::Bottom => {
            let correction = (font_size_pt * 96.0 / 72.0).round() / 4.0;
            let top = (height - text_height - padding.bottom - correction).max(0.0);
            if top < BOTTOM_SNAP_THRESHOLD {
                height - text_height - padding.bottom
            } else {
                top
            }
        }
    }
}

/// Geometry of the inner text block of a layer.
#[derive(Debug, Clone, Copy)]
pub struct SpanBox<'a> {
    pub padding: &'a Padding,
    pub border: &'a Border,
    /// Wrapping disabled for a text object
    pub nowrap: bool,
    /// Top offset, unscaled; includes the top padding
    pub top: f32,
    /// Content width, unscaled
    pub width: f32,
    pub paragraph_offset: f32,
}

/// Wrap `content` into the inner block of a text layer.
pub fn span_text(env: &mut ExportEnv<'_>, zoom: f32, span: SpanBox<'_>, content: &str) -> String {
    let p = span.padding;
    let mut style = format!("display:block;border:0;width:{}", css::px(span.width * zoom));
    if span.paragraph_offset != 0.0 {
        style.push_str(&format!("text-indent:{}", css::px(span.paragraph_offset * zoom)));
    }
    if p.left != 0.0 {
        style.push_str(&format!("padding-left:{}", css::px(p.left * zoom)));
    }
    if p.right != 0.0 {
        style.push_str(&format!("padding-right:{}", css::px(p.right * zoom)));
    }
    if p.top != 0.0 {
        style.push_str(&format!("padding-top:{}", css::px(p.top * zoom)));
    }
    if span.top != 0.0 {
        style.push_str(&format!("margin-top:{}", css::px((span.top - p.top) * zoom)));
    }
    if span.nowrap {
        style.push_str("overflow: hidden; text-wrap: nowrap;");
    }

    let borders = css::BorderExtents::of(span.border, zoom);
    if borders.any() {
        style.push_str(&format!(
            "position:absolute;left:{}top:{}",
            css::px(-borders.left / 2.0),
            css::px(-borders.top / 2.0)
        ));
    }

    format!("<div {}>{}</div>", env.styles.class_attr(&style), content)
}

/// Emit a text layer for `text` placed at `source.rect`.
pub fn layer_text(
    env: &mut ExportEnv<'_>,
    ctx: &mut PageContext,
    source: &LayerSource<'_>,
    text: &TextObject,
    drawable: Option<&dyn Drawable>,
) -> Result<()> {
    let rect = source.rect;
    let zoom = ctx.zoom;

    let (content, top) = match text.render_mode {
        TextRenderMode::HtmlParagraph => {
            let request = ShapeRequest::for_text(text, rect.inset(&text.padding), zoom);
            let layout = env.shaper.shape(&request)?;
            let text_height = layout.height() / zoom;
            let top = match text.vert_align {
                VertAlign::Top => 0.0,
                VertAlign::Center => (rect.height - text_height) / 2.0,
                VertAlign::Bottom => rect.height - text_height,
            };
            (rich_html(&layout, env.options.layers, env.stats), top + text.padding.top)
        }
        _ => {
            let mut top = 0.0;
            if text.vert_align != VertAlign::Top {
                let request = ShapeRequest::for_text(text, rect.inset(&text.padding), 1.0);
                let layout = env.shaper.shape(&request)?;
                if let Some(measure) = TextMeasure::of(&layout) {
                    top = vertical_offset(text.vert_align, rect.height, &text.padding, text.font.size, measure);
                }
            }
            (html_string(&text.text, text.render_mode), top)
        }
    };

    let span = span_text(
        env,
        zoom,
        SpanBox {
            padding: &text.padding,
            border: source.border,
            nowrap: !text.word_wrap,
            top,
            width: rect.width - text.padding.horizontal(),
            paragraph_offset: text.paragraph_offset,
        },
        &content,
    );

    let source = LayerSource {
        text: Some(text),
        ..*source
    };
    layer_back(env, ctx, &source, drawable, Some(&span), false);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::context::fixture::Fixture;
    use crate::export::ExportOptions;
    use crate::model::{Color, Font, Rect};
    use crate::text::{InlineImage, Line, Paragraph, Run, Word};
    use image::{DynamicImage, ImageOutputFormat, RgbaImage};
    use std::io::Cursor;

    fn style(bold: bool) -> StyleDescriptor {
        let mut font = Font::new("Arial", 12.0);
        font.bold = bold;
        StyleDescriptor::from_font(&font, Color::BLACK, 1.0)
    }

    fn layout(words: Vec<Word>) -> TextLayout {
        TextLayout {
            paragraphs: vec![Paragraph {
                lines: vec![Line {
                    top: 0.0,
                    height: 18.0,
                    line_spacing: 0.0,
                    horz_align: HorzAlign::Left,
                    words,
                }],
            }],
            display_rect: Rect::new(0.0, 0.0, 200.0, 100.0),
            first_line_indent: 0.0,
        }
    }

    fn word(kind: WordKind, runs: Vec<Run>) -> Word {
        Word { kind, runs }
    }

    #[test]
    fn test_escape() {
        let mut out = String::new();
        escape_run_text(&mut out, "A&B<C>\"D\"\t", None);
        assert_eq!(out, "A&amp;B&lt;C&gt;&quot;D&quot;&Tab;");
        assert!(!out.contains('\t'));
    }

    #[test]
    fn test_equal_styles_merge() {
        let l = layout(vec![
            word(WordKind::Normal, vec![Run::text(style(false), "Hel", 0.0, 20.0)]),
            word(WordKind::Normal, vec![Run::text(style(false), "lo", 20.0, 14.0)]),
        ]);
        let html = rich_html(&l, true, &mut ExportStats::new());

        assert_eq!(html.matches("<span style=\"font-family").count(), 1);
        assert!(html.contains("\">Hello</span></span>"));
    }

    #[test]
    fn test_style_change_reopens() {
        let l = layout(vec![word(
            WordKind::Normal,
            vec![
                Run::text(style(false), "a", 0.0, 6.0),
                Run::text(style(true), "b", 6.0, 7.0),
            ],
        )]);
        let html = rich_html(&l, true, &mut ExportStats::new());
        assert!(html.contains("a</span><span style=\"font-family:Arial;font-size:16px;font-weight:bold;"));
    }

    #[test]
    fn test_line_block_style() {
        let mut l = layout(vec![]);
        l.first_line_indent = 12.7;
        let html = rich_html(&l, true, &mut ExportStats::new());
        assert_eq!(
            html,
            "<span style=\"display:block;text-indent:12px;line-height:18px;white-space:pre;\"><br/></span>"
        );
    }

    #[test]
    fn test_overflowing_line_is_clipped() {
        let mut l = layout(vec![word(WordKind::Normal, vec![Run::text(style(false), "x", 0.0, 6.0)])]);
        l.paragraphs[0].lines[0].top = 90.0;
        let html = rich_html(&l, true, &mut ExportStats::new());
        assert!(html.contains("height:10px;"));

        l.paragraphs[0].lines[0].top = 120.0;
        let html = rich_html(&l, true, &mut ExportStats::new());
        assert!(html.contains("height:0px;"));
    }

    #[test]
    fn test_tab_stop_modes() {
        let l = layout(vec![
            word(WordKind::Normal, vec![Run::text(style(false), "ab", 10.0, 12.0)]),
            word(WordKind::Tab, vec![Run::text(style(false), "\t", 22.0, 26.0)]),
        ]);
        let layered = rich_html(&l, true, &mut ExportStats::new());
        assert!(layered.contains("<span style=\"tab-size: 38px;\">&Tab;</span>"));

        let absolute = rich_html(&l, false, &mut ExportStats::new());
        assert!(absolute.contains("<span style=\"tab-size: 48px;\">&Tab;</span>"));
    }

    #[test]
    fn test_html_string() {
        assert_eq!(html_string("a  b\r\nc<d>", TextRenderMode::Plain), "a &nbsp;b<br/>c&lt;d&gt;");
        assert_eq!(html_string("<b>x</b>\n", TextRenderMode::HtmlTags), "<b>x</b><br/>");
    }

    #[test]
    fn test_bottom_alignment() {
        let padding = Padding {
            left: 0.0,
            top: 0.0,
            right: 0.0,
            bottom: 5.0,
        };
        let measure = TextMeasure {
            first_line: 20.0,
            total: 40.0,
        };
        // 10pt is 13px, a quarter of which is 3.25
        assert_eq!(vertical_offset(VertAlign::Bottom, 100.0, &padding, 10.0, measure), 51.75);
        assert_eq!(vertical_offset(VertAlign::Bottom, 70.0, &padding, 10.0, measure), 25.0);
    }

    #[test]
    fn test_center_and_overflow() {
        let padding = Padding::uniform(0.0);
        let measure = TextMeasure {
            first_line: 20.0,
            total: 40.0,
        };
        assert_eq!(vertical_offset(VertAlign::Center, 100.0, &padding, 10.0, measure), 30.0);
        assert_eq!(vertical_offset(VertAlign::Top, 100.0, &padding, 10.0, measure), 0.0);

        let tall = TextMeasure {
            first_line: 30.0,
            total: 30.0,
        };
        assert_eq!(vertical_offset(VertAlign::Center, 20.0, &padding, 10.0, tall), -5.0);
    }

    #[test]
    fn test_layer_text_plain() {
        let mut fx = Fixture::new(ExportOptions::default());
        let mut ctx = fx.page();
        let base = crate::model::ObjectBase::new("T", 0.0, 0.0, 100.0, 20.0);
        let text = TextObject::new("Fish & Chips");
        let source = LayerSource::base(&base);

        let mut env = fx.env();
        layer_text(&mut env, &mut ctx, &source, &text, None).unwrap();

        assert!(ctx.html.contains(">Fish &amp; Chips</div></div>\n"));
        assert_eq!(fx.styles.len(), 2);
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, image::Rgba([0, 128, 0, 255])))
            .write_to(&mut out, ImageOutputFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn image_run(data: Vec<u8>, width: f32, height: f32) -> Run {
        Run::image(style(false), InlineImage { data, width, height }, 0.0)
    }

    #[test]
    fn test_inline_image_embedded() {
        let l = layout(vec![word(WordKind::Normal, vec![image_run(png(4, 4), 8.0, 6.0)])]);
        let mut stats = ExportStats::new();
        let html = rich_html(&l, true, &mut stats);

        assert!(html.contains("<img src=\"data:image/png;base64,"));
        assert!(html.contains("\" width=\"8\" height=\"6\"/>"));
        assert_eq!(stats.failed_pictures, 0);
    }

    #[test]
    fn test_inline_image_undecodable() {
        let l = layout(vec![word(
            WordKind::Normal,
            vec![
                Run::text(style(false), "before", 0.0, 30.0),
                image_run(vec![1, 2, 3], 8.0, 8.0),
            ],
        )]);
        let mut stats = ExportStats::new();
        let html = rich_html(&l, true, &mut stats);

        assert!(!html.contains("<img"));
        assert!(html.contains("before"));
        assert_eq!(stats.failed_pictures, 1);
    }

    #[test]
    fn test_inline_image_oversized_display() {
        let l = layout(vec![word(WordKind::Normal, vec![image_run(png(2, 2), 1e10, 1e10)])]);
        let mut stats = ExportStats::new();
        let html = rich_html(&l, true, &mut stats);

        assert!(!html.contains("<img"));
        assert_eq!(stats.failed_pictures, 1);
    }

    #[test]
    fn test_hostile_font_family_stays_in_attribute() {
        let mut hostile = style(false);
        hostile.font_family = "x\" onmouseover=\"alert(1)".to_string();
        let l = layout(vec![word(WordKind::Normal, vec![Run::text(hostile, "hi", 0.0, 10.0)])]);
        let html = rich_html(&l, true, &mut ExportStats::new());

        assert!(!html.contains("\" onmouseover"));
        assert!(html.contains("<span style=\"font-family:x onmouseover=alert(1);"));
    }
}
