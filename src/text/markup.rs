//! Parser for the small inline tag set accepted in rich text.
//!
//! Recognized tags: `b`, `i`, `u`, `s`, `sub`, `sup`, `br`, `img` and `font`
//! (with `color`, `face` and `size` attributes). Anything else is kept as
//! literal text.

use super::{Baseline, InlineImage, StyleDescriptor};
use crate::model::Color;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use regex::Regex;
use std::sync::OnceLock;

/// A piece of parsed rich text.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Text in a style
    Text(StyleDescriptor, String),
    /// Inline image in the surrounding style
    Image(StyleDescriptor, InlineImage),
    /// Forced line break
    Break,
}

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r"(?i)<(/?)(b|i|u|s|sub|sup|br|img|font)\b([^>]*?)/?>")
            .expect("tag pattern is a valid regex")
    })
}

fn attr_regex() -> &'static Regex {
    static ATTR: OnceLock<Regex> = OnceLock::new();
    ATTR.get_or_init(|| {
        Regex::new(r#"(?i)([a-z-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("attribute pattern is a valid regex")
    })
}

fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    attr_regex().captures_iter(attrs).find_map(|c| {
        let key = c.get(1)?.as_str();
        if key.eq_ignore_ascii_case(name) {
            c.get(2).or_else(|| c.get(3)).map(|m| m.as_str())
        } else {
            None
        }
    })
}

/// Split rich text into styled segments, starting from `base`.
///
/// `scale` converts pixel sizes given in tag attributes to output pixels.
pub fn parse(text: &str, base: &StyleDescriptor, scale: f32) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut stack: Vec<(String, StyleDescriptor)> = Vec::new();
    let mut last = 0;

    let current = |stack: &[(String, StyleDescriptor)]| {
        stack.last().map(|(_, s)| s.clone()).unwrap_or_else(|| base.clone())
    };

    for caps in tag_regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&mut segments, &current(&stack), &text[last..whole.start()]);
        last = whole.end();

        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let name = caps.get(2).map(|m| m.as_str().to_ascii_lowercase()).unwrap_or_default();
        let attrs = caps.get(3).map(|m| m.as_str()).unwrap_or("");

        if closing {
            if let Some(pos) = stack.iter().rposition(|(tag, _)| *tag == name) {
                stack.truncate(pos);
            }
            continue;
        }

        let mut style = current(&stack);
        match name.as_str() {
            "br" => {
                segments.push(Segment::Break);
                continue;
            }
            "img" => {
                if let Some(image) = parse_image(attrs, scale) {
                    segments.push(Segment::Image(style, image));
                }
                continue;
            }
            "b" => style.bold = true,
            "i" => style.italic = true,
            "u" => style.underline = true,
            "s" => style.strikeout = true,
            "sub" => style.baseline = Baseline::Subscript,
            "sup" => style.baseline = Baseline::Superscript,
            "font" => {
                if let Some(color) = attribute(attrs, "color").and_then(|c| c.parse::<Color>().ok()) {
                    style.color = color;
                }
                if let Some(face) = attribute(attrs, "face") {
                    style.font_family = crate::export::css::font_family(face);
                }
                if let Some(size) = attribute(attrs, "size").and_then(|s| s.trim_end_matches("pt").parse::<f32>().ok()) {
                    style.font_size = size * crate::model::PX_PER_PT * scale;
                }
            }
            _ => {}
        }
        stack.push((name, style));
    }

    push_text(&mut segments, &current(&stack), &text[last..]);
    segments
}

fn push_text(segments: &mut Vec<Segment>, style: &StyleDescriptor, raw: &str) {
    if raw.is_empty() {
        return;
    }
    let decoded = html_escape::decode_html_entities(raw).replace('\u{a0}', " ");
    // merge with the previous segment when the style did not change
    if let Some(Segment::Text(prev_style, prev_text)) = segments.last_mut() {
        if prev_style == style {
            prev_text.push_str(&decoded);
            return;
        }
    }
    segments.push(Segment::Text(style.clone(), decoded));
}

fn parse_image(attrs: &str, scale: f32) -> Option<InlineImage> {
    let src = attribute(attrs, "src")?;
    let (_, payload) = src.split_once("base64,")?;
    let data = match BASE64.decode(payload.trim()) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("Skipping inline image with invalid base64 data: {}", e);
            return None;
        }
    };

    let natural = crate::draw::decode_image(&data)
        .map(|img| (img.width() as f32, img.height() as f32))
        .unwrap_or((0.0, 0.0));
    let width = attribute(attrs, "width")
        .and_then(|w| w.parse::<f32>().ok())
        .unwrap_or(natural.0);
    let height = attribute(attrs, "height")
        .and_then(|h| h.parse::<f32>().ok())
        .unwrap_or(natural.1);

    Some(InlineImage {
        data,
        width: width * scale,
        height: height * scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Font;

    fn base() -> StyleDescriptor {
        StyleDescriptor::from_font(&Font::new("Arial", 9.0), Color::BLACK, 1.0)
    }

    #[test]
    fn test_plain_text() {
        let segments = parse("Hello &amp; bye", &base(), 1.0);
        assert_eq!(segments, vec![Segment::Text(base(), "Hello & bye".to_string())]);
    }

    #[test]
    fn test_nested_tags() {
        let segments = parse("a<b>b<i>c</i></b>d", &base(), 1.0);
        assert_eq!(segments.len(), 4);
        match &segments[2] {
            Segment::Text(style, text) => {
                assert_eq!(text, "c");
                assert!(style.bold && style.italic);
            }
            other => panic!("Unexpected segment {:?}", other),
        }
        match &segments[3] {
            Segment::Text(style, _) => assert_eq!(style, &base()),
            other => panic!("Unexpected segment {:?}", other),
        }
    }

    #[test]
    fn test_font_and_break() {
        let segments = parse("<font color=\"#FF0000\">red</font><br/>next", &base(), 1.0);
        assert_eq!(segments.len(), 3);
        match &segments[0] {
            Segment::Text(style, _) => assert_eq!(style.color, Color::rgb(255, 0, 0)),
            other => panic!("Unexpected segment {:?}", other),
        }
        assert_eq!(segments[1], Segment::Break);
    }

    #[test]
    fn test_unknown_tag_is_text() {
        let segments = parse("<span>x</span>", &base(), 1.0);
        assert_eq!(segments, vec![Segment::Text(base(), "<span>x</span>".to_string())]);
    }

    #[test]
    fn test_image_with_bad_payload() {
        let segments = parse("<img src=\"data:image/png;base64,AAAA\" width=\"8\" height=\"6\">", &base(), 2.0);
        match &segments[0] {
            Segment::Image(_, image) => {
                assert_eq!(image.width, 16.0);
                assert_eq!(image.height, 12.0);
            }
            other => panic!("Unexpected segment {:?}", other),
        }
    }

    #[test]
    fn test_font_face_is_sanitized() {
        let segments = parse("<font face='x\" onmouseover=\"alert(1);'>y</font>", &base(), 1.0);
        match &segments[0] {
            Segment::Text(style, text) => {
                assert_eq!(text, "y");
                assert_eq!(style.font_family, "x onmouseover=alert(1)");
            }
            other => panic!("Unexpected segment {:?}", other),
        }
    }
}
