//! Absolute positioning of layers.
//!
//! Every object becomes one absolutely positioned `div`. Border strokes in
//! HTML are drawn inside the element box, so the box is shifted and shrunk
//! by half the border width on each side; the rendered border then
//! straddles the nominal edge exactly as it does on the printed page.

use super::context::{ExportEnv, PageContext};
use super::css::{self, BorderExtents};
use super::picture::RasterPicture;
use crate::draw::{Drawable, FillPatch, PaintOptions};
use crate::model::{
    Border, Color, Fill, Hyperlink, HyperlinkKind, ObjectBase, ObjectKind, Rect, ReportObject,
    TableCell, TextObject,
};
use html_escape::encode_double_quoted_attribute;

pub(crate) const NBSP: &str = "&nbsp;";

/// What the positioner needs to know about the object behind a layer.
#[derive(Debug, Clone, Copy)]
pub struct LayerSource<'a> {
    /// Click-event identifier
    pub name: &'a str,
    /// Page-absolute, unscaled bounds
    pub rect: Rect,
    pub border: &'a Border,
    pub fill: &'a Fill,
    pub hyperlink: Option<&'a Hyperlink>,
    pub has_click_listeners: bool,
    /// Text settings, when the layer carries text
    pub text: Option<&'a TextObject>,
}

impl<'a> LayerSource<'a> {
    /// Source for an object's shared properties.
    pub fn base(base: &'a ObjectBase) -> Self {
        Self {
            name: &base.name,
            rect: base.rect(),
            border: &base.border,
            fill: &base.fill,
            hyperlink: base.active_hyperlink(),
            has_click_listeners: base.has_click_listeners,
            text: None,
        }
    }

    /// Source for a document object.
    pub fn object(obj: &'a ReportObject) -> Self {
        let text = match &obj.kind {
            ObjectKind::Text(text) => Some(text),
            _ => None,
        };
        Self {
            text,
            ..Self::base(&obj.base)
        }
    }

    /// Source for a table cell placed at `rect`.
    pub fn cell(cell: &'a TableCell, rect: Rect) -> Self {
        Self {
            name: &cell.name,
            rect,
            border: &cell.border,
            fill: &cell.fill,
            hyperlink: cell.hyperlink.as_ref().filter(|h| h.is_set()),
            has_click_listeners: cell.has_click_listeners,
            text: Some(&cell.text),
        }
    }

    /// Move the source to other bounds.
    pub fn at(self, rect: Rect) -> Self {
        Self { rect, ..self }
    }
}

/// A solid strip of a drop shadow.
#[derive(Debug, Clone, PartialEq)]
struct ShadowStrip {
    rect: Rect,
    fill: Fill,
    border: Border,
}

impl ShadowStrip {
    /// The bottom and right strips of a border shadow around `rect`.
    fn pair(rect: Rect, border: &Border) -> [ShadowStrip; 2] {
        let sw = border.shadow_width;
        let fill = Fill::solid(border.shadow_color);
        [
            ShadowStrip {
                rect: Rect::new(
                    rect.left + sw + border.left.width,
                    rect.top + rect.height + border.bottom.width,
                    rect.width + border.right.width,
                    sw + border.bottom.width,
                ),
                fill: fill.clone(),
                border: Border::none(),
            },
            ShadowStrip {
                rect: Rect::new(
                    rect.left + rect.width + border.right.width,
                    rect.top + sw + border.top.width,
                    sw + border.right.width,
                    rect.height,
                ),
                fill,
                border: Border::none(),
            },
        ]
    }
}

/// Output box of a layer: `(left, top, width, height)` in output pixels.
pub fn layer_box(ctx: &PageContext, rect: Rect, border: &Border) -> (f32, f32, f32, f32) {
    let z = ctx.zoom;
    let b = BorderExtents::of(border, z);
    (
        (ctx.left_margin + rect.left) * z - b.left / 2.0,
        (ctx.top_margin + rect.top) * z - b.top / 2.0,
        rect.width * z - b.right / 2.0 - b.left / 2.0,
        rect.height * z - b.bottom / 2.0 - b.top / 2.0,
    )
}

fn onclick(report_id: &str, action: &str, payload: &str) -> String {
    format!(
        "{}.{}('{}')",
        report_id,
        action,
        encode_double_quoted_attribute(payload)
    )
}

/// Click action dispatched for the source, if any.
fn click_action(source: &LayerSource<'_>) -> Option<&'static str> {
    if source.text.is_some_and(|t| t.editable) {
        Some("text_edit")
    } else if source.has_click_listeners {
        Some("click")
    } else {
        None
    }
}

/// Opening anchor tag of the source's hyperlink, if it produces one.
pub fn href(env: &ExportEnv<'_>, source: &LayerSource<'_>) -> Option<String> {
    let link = source.hyperlink?;
    let report_id = env.options.report_id.as_deref();

    let style = match source.text {
        Some(text) => format!(
            " style=\"color:{}{}\"",
            text.text_color.to_css(),
            if text.font.underline { "" } else { ";text-decoration:none" }
        ),
        None => String::new(),
    };
    let value = &link.value;

    let detail = |action: &str| {
        let payload = format!(
            "{},{},{}",
            css::url_encode(source.name),
            css::url_encode(&link.report_parameter),
            css::url_encode(value)
        );
        report_id.map(|id| format!("<a{} onclick=\"{}\">", style, onclick(id, action, &payload)))
    };

    match link.kind {
        HyperlinkKind::Url => Some(format!(
            "<a{} href=\"{}\"{}>",
            style,
            encode_double_quoted_attribute(value),
            if link.open_in_new_tab { " target=\"_blank\"" } else { "" }
        )),
        HyperlinkKind::DetailReport => detail("detailed_report"),
        HyperlinkKind::DetailPage => detail("detailed_page"),
        HyperlinkKind::Bookmark if env.options.continuous => {
            Some(format!("<a{} href=\"#{}\">", style, css::url_encode(value)))
        }
        HyperlinkKind::PageNumber if env.options.continuous => {
            Some(format!("<a{} href=\"#PageN{}\">", style, css::url_encode(value)))
        }
        HyperlinkKind::Bookmark => report_id.map(|id| {
            format!("<a{} onclick=\"{}\">", style, onclick(id, "bookmark", &css::url_encode(value)))
        }),
        HyperlinkKind::PageNumber => report_id.map(|id| {
            format!("<a{} onclick=\"{}\">", style, onclick(id, "goto", &css::url_encode(value)))
        }),
    }
}

/// Emit one positioned layer.
///
/// `rect` is unscaled and page-absolute. `class` is a complete
/// `class="..."` attribute or empty; `extra` is appended to the inline
/// style. A missing `content` renders as a non-breaking space.
#[allow(clippy::too_many_arguments)]
pub fn layer(
    env: &ExportEnv<'_>,
    ctx: &mut PageContext,
    source: &LayerSource<'_>,
    rect: Rect,
    content: Option<&str>,
    class: &str,
    extra: &str,
    border_none: bool,
) {
    let action = env
        .options
        .report_id
        .as_deref()
        .and_then(|id| click_action(source).map(|action| (id, action)));
    let anchor = href(env, source);
    let (left, top, width, height) = layer_box(ctx, rect, source.border);

    let out = &mut ctx.html;
    if let Some(a) = &anchor {
        out.push_str(a);
    }
    out.push_str("<div");
    if !class.is_empty() {
        out.push(' ');
        out.push_str(class);
    }
    out.push_str(" style=\"position:absolute;");
    if action.is_some() || anchor.is_some() {
        out.push_str("cursor:pointer;");
    }
    out.push_str("left:");
    out.push_str(&css::px(left));
    out.push_str("top:");
    out.push_str(&css::px(top));
    out.push_str("width:");
    out.push_str(&css::px(width));
    out.push_str("height:");
    out.push_str(&css::px(height));
    if border_none {
        out.push_str("border:none;");
    }
    out.push_str(extra);
    out.push('"');

    if let Some((id, action)) = action {
        let payload = format!(
            "{},{},{},{}",
            source.name,
            ctx.index,
            source.rect.left.round(),
            source.rect.top.round()
        );
        out.push_str(" onclick=\"");
        out.push_str(&onclick(id, action, &payload));
        out.push('"');
    }

    out.push('>');
    out.push_str(content.unwrap_or(NBSP));
    out.push_str("</div>\n");
    if anchor.is_some() {
        out.push_str("</a>");
    }
}

/// Emit the background layer of an object: its shadow, then either a
/// styled box for solid fills or a rasterized picture for other fills.
///
/// `drawable` paints the object when the fill needs rasterization; without
/// one, only the fill is rasterized.
pub fn layer_back(
    env: &mut ExportEnv<'_>,
    ctx: &mut PageContext,
    source: &LayerSource<'_>,
    drawable: Option<&dyn Drawable>,
    content: Option<&str>,
    border_none: bool,
) {
    if source.border.shadow {
        for strip in ShadowStrip::pair(source.rect, source.border) {
            let strip_source = LayerSource {
                rect: strip.rect,
                border: &strip.border,
                fill: &strip.fill,
                hyperlink: None,
                has_click_listeners: false,
                text: None,
                ..*source
            };
            layer_back(env, ctx, &strip_source, None, None, false);
        }
    }

    if source.fill.is_solid() {
        let style = css::object_style(source.border, source.fill, source.text, ctx.zoom);
        let class = env.styles.class_attr(&style);
        layer(env, ctx, source, source.rect, content, &class, "", border_none);
    } else {
        let patch;
        let drawable: &dyn Drawable = match drawable {
            Some(d) => d,
            None => {
                patch = FillPatch::new(source.rect, source.fill);
                &patch
            }
        };
        layer_picture(env, ctx, source, drawable, content, PaintOptions::default());
    }
}

/// Rasterize an object, logging and counting a failure instead of
/// returning it.
pub(crate) fn rasterize_contained(
    env: &mut ExportEnv<'_>,
    source: &LayerSource<'_>,
    drawable: &dyn Drawable,
    paint: PaintOptions,
) -> Option<RasterPicture> {
    if !env.options.export_pictures {
        return None;
    }
    match env.pictures.rasterize(drawable, paint, env.stats) {
        Ok(picture) => Some(picture),
        Err(e) => {
            log::warn!("Failed to rasterize '{}': {}", source.name, e);
            env.stats.add_failed_picture();
            None
        }
    }
}

fn background_url(token: &str) -> String {
    format!(
        "background: url('{}') no-repeat !important;-webkit-print-color-adjust:exact;",
        token
    )
}

/// Emit a layer whose background is the rasterized object.
///
/// A failed rasterization leaves an empty placeholder box styled like the
/// object.
pub fn layer_picture(
    env: &mut ExportEnv<'_>,
    ctx: &mut PageContext,
    source: &LayerSource<'_>,
    drawable: &dyn Drawable,
    content: Option<&str>,
    paint: PaintOptions,
) {
    if !env.options.export_pictures {
        return;
    }

    let mut style = css::object_style(source.border, &Fill::solid(Color::TRANSPARENT), source.text, ctx.zoom);
    let rect = match rasterize_contained(env, source, drawable, paint) {
        Some(picture) => {
            style.push_str(&background_url(&picture.token));
            let r = source.rect;
            let x = if picture.width > 0.0 { r.left } else { r.left + picture.width };
            let y = if picture.height > 0.0 { r.top } else { r.top + picture.height };
            Rect::new(x, y, picture.width.abs(), picture.height.abs())
        }
        None => source.rect.normalized(),
    };

    let class = env.styles.class_attr(&style);
    layer(env, ctx, source, rect, content, &class, "", false);
}

/// Emit a shape layer: the rasterized shape as an inline background.
pub fn layer_shape(
    env: &mut ExportEnv<'_>,
    ctx: &mut PageContext,
    source: &LayerSource<'_>,
    drawable: &dyn Drawable,
) {
    let extra = rasterize_contained(env, source, drawable, PaintOptions::default())
        .map(|picture| background_url(&picture.token))
        .unwrap_or_default();
    let rect = source.rect.normalized();
    layer(env, ctx, source, rect, None, "", &extra, false);
}
