//! Page assembly: page container, background, watermarks and style flush.

use super::context::{ExportEnv, PageContext};
use super::css;
use super::dispatch::export_band;
use super::positioner::{layer, layer_picture, rasterize_contained, LayerSource};
use super::sink::FinishedPage;
use super::text::html_string;
use crate::draw::{FillPatch, PaintOptions, WatermarkImage};
use crate::error::Result;
use crate::model::{Border, Color, Fill, Page, Rect, TextRenderMode, PX_PER_MM};

/// Unscaled page box and content origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub left_margin: f32,
    pub top_margin: f32,
}

/// Page box in pixels.
///
/// With margins enabled the margins stay as empty space around the
/// content; otherwise they are cut from the page box.
pub fn page_geometry(page: &Page, enable_margins: bool) -> PageGeometry {
    let m = &page.margins;
    if enable_margins {
        PageGeometry {
            width: page.width_px(),
            height: page.height_px(),
            left_margin: m.left * PX_PER_MM,
            top_margin: m.top * PX_PER_MM,
        }
    } else {
        PageGeometry {
            width: page.width_px() - (m.left + m.right) * PX_PER_MM,
            height: page.height_px() - (m.top + m.bottom) * PX_PER_MM,
            left_margin: 0.0,
            top_margin: 0.0,
        }
    }
}

/// Export one page: container, bands, watermarks and new styles.
pub fn export_page(env: &mut ExportEnv<'_>, ctx: &mut PageContext, page: &Page) -> Result<FinishedPage> {
    begin_page(env, ctx, page);
    for band in &page.bands {
        export_band(env, ctx, band)?;
    }
    Ok(end_page(env, ctx, page))
}

/// Open the page container and emit the below-content watermarks.
pub fn begin_page(env: &mut ExportEnv<'_>, ctx: &mut PageContext, page: &Page) {
    let options = env.options;
    env.styles.begin_page(ctx.number, options.continuous);
    ctx.html.clear();
    ctx.css.clear();

    let geometry = page_geometry(page, options.enable_margins);
    ctx.left_margin = geometry.left_margin;
    ctx.top_margin = geometry.top_margin;
    ctx.width = geometry.width;
    ctx.height = geometry.height;

    let page_break = options.continuous && options.page_breaks;
    if page_break && ctx.index > 0 {
        ctx.html.push_str("<div style=\"break-after:page\"></div>");
    }
    ctx.html.push_str(&format!("<a name=\"PageN{}\"></a>", ctx.number));

    let zoom = ctx.zoom;
    ctx.html.push_str("<div");
    if page_break {
        ctx.html.push_str(&format!(" class=\"frpage{}\"", ctx.index));
    }
    ctx.html.push_str(" style=\"position:relative;width:");
    ctx.html.push_str(&css::px(geometry.width * zoom + 3.0));
    ctx.html.push_str("height:");
    ctx.html.push_str(&css::px(geometry.height * zoom));

    match page.fill.solid_color() {
        Some(color) => ctx.html.push_str(&format!("background-color:{};", color.to_css())),
        None => {
            let rect = Rect::new(0.0, 0.0, geometry.width, geometry.height);
            let border = Border::none();
            let source = LayerSource {
                name: &page.name,
                rect,
                border: &border,
                fill: &page.fill,
                hyperlink: None,
                has_click_listeners: false,
                text: None,
            };
            let patch = FillPatch::new(rect, &page.fill);
            if let Some(picture) = rasterize_contained(env, &source, &patch, PaintOptions::default()) {
                ctx.html.push_str(&format!(
                    "background: url('{}') no-repeat !important;-webkit-print-color-adjust:exact;",
                    picture.token
                ));
            }
        }
    }
    ctx.html.push_str("\">");

    let watermark = &page.watermark;
    if watermark.has_image() && !watermark.show_image_on_top {
        watermark_image(env, ctx, page);
    }
    if watermark.has_text() && !watermark.show_text_on_top {
        watermark_text(env, ctx, page);
    }
}

/// Emit the above-content watermarks, flush new styles and close the page.
pub fn end_page(env: &mut ExportEnv<'_>, ctx: &mut PageContext, page: &Page) -> FinishedPage {
    let watermark = &page.watermark;
    if watermark.has_image() && watermark.show_image_on_top {
        watermark_image(env, ctx, page);
    }
    if watermark.has_text() && watermark.show_text_on_top {
        watermark_text(env, ctx, page);
    }

    env.stats.add_styles(env.styles.len() - env.styles.watermark());
    let mut styles = env.styles.emit_new_styles();
    if !ctx.css.is_empty() {
        styles.push_str("<style type=\"text/css\">\n");
        styles.push_str(&ctx.css);
        styles.push_str("\n</style>\n");
    }
    ctx.html.push_str("</div>");
    env.stats.add_page();
    log::debug!("Finished page {} ({} bytes)", ctx.number, ctx.html.len());

    FinishedPage {
        number: ctx.number,
        index: ctx.index,
        styles,
        html: std::mem::take(&mut ctx.html),
        width: ctx.width * ctx.zoom,
        height: ctx.height * ctx.zoom,
        surface_top: ctx.h_pos,
    }
}

/// Content area of the page, relative to the content origin.
fn content_rect(page: &Page) -> Rect {
    let m = &page.margins;
    Rect::new(
        0.0,
        0.0,
        page.width_px() - (m.left + m.right) * PX_PER_MM,
        page.height_px() - (m.top + m.bottom) * PX_PER_MM,
    )
}

fn watermark_image(env: &mut ExportEnv<'_>, ctx: &mut PageContext, page: &Page) {
    let rect = content_rect(page);
    let border = Border::none();
    let fill = Fill::solid(Color::TRANSPARENT);
    let source = LayerSource {
        name: "Watermark",
        rect,
        border: &border,
        fill: &fill,
        hyperlink: None,
        has_click_listeners: false,
        text: None,
    };
    let image = WatermarkImage::new(rect, &page.watermark);
    layer_picture(env, ctx, &source, &image, None, PaintOptions::default());
}

/// Watermark text as a rotated, centred text layer over the content area.
fn watermark_text(env: &mut ExportEnv<'_>, ctx: &mut PageContext, page: &Page) {
    let watermark = &page.watermark;
    let rect = content_rect(page);
    let border = Border::none();
    let fill = Fill::solid(Color::TRANSPARENT);
    let source = LayerSource {
        name: "Watermark",
        rect,
        border: &border,
        fill: &fill,
        hyperlink: None,
        has_click_listeners: false,
        text: None,
    };

    let mut style = css::font(&watermark.font, ctx.zoom);
    style.push_str(&format!("color:{};white-space:nowrap;", watermark.text_color.to_css()));
    let class = env.styles.class_attr(&style);
    let extra = format!(
        "display:flex;align-items:center;justify-content:center;transform:rotate({}deg);",
        css::num(watermark.text_rotation.degrees())
    );
    let content = html_string(&watermark.text, TextRenderMode::Plain);
    layer(env, ctx, &source, rect, Some(&content), &class, &extra, false);
}
