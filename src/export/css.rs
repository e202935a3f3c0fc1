//! CSS value formatting and object style rules.

use crate::model::{Border, BorderLine, Fill, Font, HorzAlign, TextObject};

/// Format a number with at most two decimals and no trailing zeros.
pub fn num(value: f32) -> String {
    let rounded = (value as f64 * 100.0).round() / 100.0;
    let mut s = format!("{:.2}", rounded);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Pixel value followed by a declaration terminator, e.g. `12.5px;`.
pub fn px(value: f32) -> String {
    format!("{}px;", num(value))
}

/// Rendered widths of the four border sides in output pixels.
///
/// Hidden sides count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BorderExtents {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BorderExtents {
    pub fn of(border: &Border, zoom: f32) -> Self {
        let side = |visible: bool, line: &BorderLine| if visible { line.width * zoom } else { 0.0 };
        Self {
            left: side(border.lines.left, &border.left),
            top: side(border.lines.top, &border.top),
            right: side(border.lines.right, &border.right),
            bottom: side(border.lines.bottom, &border.bottom),
        }
    }

    /// Check if any side has a width.
    pub fn any(&self) -> bool {
        self.left > 0.0 || self.top > 0.0 || self.right > 0.0 || self.bottom > 0.0
    }
}

fn border_side(name: &str, visible: bool, line: &BorderLine, zoom: f32) -> String {
    if !visible {
        return format!("border-{}:none;", name);
    }
    format!(
        "border-{}-width:{}border-{}-style:{};border-{}-color:{};",
        name,
        px(line.width * zoom),
        name,
        line.style.css(),
        name,
        line.color.to_css()
    )
}

/// Border declarations of an object.
pub fn border(border: &Border, zoom: f32) -> String {
    if !border.is_visible() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str(&border_side("left", border.lines.left, &border.left, zoom));
    out.push_str(&border_side("top", border.lines.top, &border.top, zoom));
    out.push_str(&border_side("right", border.lines.right, &border.right, zoom));
    out.push_str(&border_side("bottom", border.lines.bottom, &border.bottom, zoom));
    out
}

/// Background declaration of a solid fill. Other fills are rasterized.
pub fn fill(fill: &Fill) -> String {
    match fill.solid_color() {
        Some(color) if !color.is_transparent() => format!("background-color:{};", color.to_css()),
        _ => String::new(),
    }
}

/// Font declarations at the given zoom.
pub fn font(font: &Font, zoom: f32) -> String {
    let mut out = format!("font-family:{};font-size:{}", font_family(&font.family), px(font.size_px() * zoom));
    if font.bold {
        out.push_str("font-weight:bold;");
    }
    if font.italic {
        out.push_str("font-style:italic;");
    }
    match (font.underline, font.strikeout) {
        (true, true) => out.push_str("text-decoration:underline line-through;"),
        (true, false) => out.push_str("text-decoration:underline;"),
        (false, true) => out.push_str("text-decoration:line-through;"),
        (false, false) => {}
    }
    out
}

/// Text declarations of a text object.
pub fn text(text: &TextObject, zoom: f32) -> String {
    let mut out = font(&text.font, zoom);
    out.push_str(&format!("color:{};", text.text_color.to_css()));
    if text.horz_align != HorzAlign::Left {
        out.push_str(&format!("text-align:{};", text.horz_align.css()));
    }
    if text.word_wrap {
        out.push_str("word-wrap:break-word;");
    }
    if text.line_height > 0.0 {
        out.push_str(&format!("line-height:{}", px(text.line_height * zoom)));
    }
    out.push_str("overflow:hidden;");
    out
}

/// Complete style body of a positioned box: border, fill and optional text.
pub fn object_style(b: &Border, f: &Fill, text_object: Option<&TextObject>, zoom: f32) -> String {
    let mut out = String::new();
    out.push_str(&border(b, zoom));
    out.push_str(&fill(f));
    if let Some(t) = text_object {
        out.push_str(&text(t, zoom));
    }
    out
}

/// Percent-encode a value for use in a query-style payload.
///
/// Spaces become `+`; unreserved characters are kept.
pub fn url_encode(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}

/// Font family name safe to place in a declaration.
///
/// Characters that could end the declaration, the rule or the enclosing
/// attribute are dropped.
pub fn font_family(family: &str) -> String {
    family
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | ';' | '<' | '>' | '&' | '{' | '}' | '\\') && !c.is_control())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;

    #[test]
    fn test_num() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(10.5), "10.5");
        assert_eq!(num(1.0 / 3.0), "0.33");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(-2.25), "-2.25");
        assert_eq!(px(3.0), "3px;");
    }

    #[test]
    fn test_border_extents() {
        let mut b = Border::all(2.0, Color::BLACK);
        b.lines.right = false;
        let e = BorderExtents::of(&b, 1.5);
        assert_eq!(e.left, 3.0);
        assert_eq!(e.right, 0.0);
        assert!(e.any());
        assert!(!BorderExtents::of(&Border::none(), 1.0).any());
    }

    #[test]
    fn test_border_css() {
        let css = border(&Border::all(1.0, Color::rgb(255, 0, 0)), 1.0);
        assert!(css.starts_with("border-left-width:1px;border-left-style:solid;border-left-color:#FF0000;"));
        assert_eq!(border(&Border::none(), 1.0), "");
    }

    #[test]
    fn test_fill_css() {
        assert_eq!(fill(&Fill::solid(Color::WHITE)), "background-color:#FFFFFF;");
        assert_eq!(fill(&Fill::default()), "");
    }

    #[test]
    fn test_url_encode() {
        assert_eq!(url_encode("a b,c"), "a+b%2Cc");
        assert_eq!(url_encode("ä"), "%C3%A4");
        assert_eq!(url_encode("Page 3"), "Page+3");
    }

    #[test]
    fn test_font_family_strips_breakouts() {
        assert_eq!(font_family("Times New Roman"), "Times New Roman");
        assert_eq!(font_family("x\" onmouseover=\"alert(1)"), "x onmouseover=alert(1)");
        assert_eq!(font_family("a;color:red}</style>"), "acolor:red/style");
    }

    #[test]
    fn test_font_css_uses_safe_family() {
        let css = font(&Font::new("Evil\";x:y", 10.0), 1.0);
        assert!(css.starts_with("font-family:Evilx:y;font-size:"));
    }
}
