//! Routing of document objects to their layering strategy.

use super::context::{ExportEnv, PageContext};
use super::hooks::{CustomDrawArgs, DrawTarget, HookAction};
use super::positioner::{layer_back, layer_picture, layer_shape, LayerSource};
use super::table::layer_table;
use super::text::{layer_text, span_text, SpanBox};
use crate::draw::PaintOptions;
use crate::error::Result;
use crate::model::{Band, ObjectKind, Rect, ReportObject, TableObject};
use html_escape::encode_double_quoted_attribute;

/// Export a band: its background, then every exported object in paint
/// order. Container children follow their container.
pub fn export_band(env: &mut ExportEnv<'_>, ctx: &mut PageContext, band: &Band) -> Result<()> {
    layer_back(env, ctx, &LayerSource::base(&band.base), None, None, false);
    for obj in &band.objects {
        export_tree(env, ctx, obj)?;
    }
    Ok(())
}

fn export_tree(env: &mut ExportEnv<'_>, ctx: &mut PageContext, obj: &ReportObject) -> Result<()> {
    if !obj.base.is_exported() {
        return Ok(());
    }

    let args = CustomDrawArgs {
        target: DrawTarget::Object(obj),
        left: obj.base.left,
        top: ctx.h_pos + obj.base.top,
        width: obj.base.width,
        height: obj.base.height,
        zoom: ctx.zoom,
        layers: env.options.layers,
        page_number: ctx.number,
    };
    match env.hooks.custom_draw(&args) {
        HookAction::Replace { html, css } => {
            env.stats.add_custom_drawn();
            ctx.css.push_str(&css);
            ctx.html.push_str(&html);
        }
        HookAction::Skip => env.stats.add_custom_drawn(),
        HookAction::Continue => export_object(env, ctx, obj)?,
    }

    if let ObjectKind::Container(container) = &obj.kind {
        for child in &container.objects {
            export_tree(env, ctx, child)?;
        }
    }
    Ok(())
}

/// Export one object with the first strategy that matches its kind.
pub fn export_object(env: &mut ExportEnv<'_>, ctx: &mut PageContext, obj: &ReportObject) -> Result<()> {
    env.stats.add_object();
    log::debug!("Exporting '{}' on page {}", obj.base.name, ctx.number);

    if let Some(bookmark) = obj.base.bookmark.as_deref().filter(|b| !b.is_empty()) {
        ctx.html.push_str(&format!(
            "<a name=\"{}\"></a>",
            encode_double_quoted_attribute(bookmark)
        ));
    }

    let source = LayerSource::object(obj);
    match &obj.kind {
        ObjectKind::CellularText(cellular) => {
            let table = cellular.to_table(obj.base.width, obj.base.height);
            export_table(env, ctx, obj, &table)?;
        }
        ObjectKind::Table(table) => export_table(env, ctx, obj, table)?,
        ObjectKind::Text(text) if text.is_memo() => layer_text(env, ctx, &source, text, Some(obj))?,
        ObjectKind::Html(html) => {
            let span = span_text(
                env,
                ctx.zoom,
                SpanBox {
                    padding: &html.padding,
                    border: &obj.base.border,
                    nowrap: false,
                    top: html.padding.top,
                    width: obj.base.width - html.padding.horizontal(),
                    paragraph_offset: 0.0,
                },
                &html.html,
            );
            layer_back(env, ctx, &source, Some(obj), Some(&span), false);
        }
        ObjectKind::Container(_) => layer_back(env, ctx, &source, Some(obj), None, false),
        ObjectKind::Line(_) => layer_picture(env, ctx, &source, obj, None, PaintOptions::default()),
        ObjectKind::Shape(_) => layer_shape(env, ctx, &source, obj),
        ObjectKind::Custom(custom) if env.extensions.contains(&custom.type_name) => {
            let content = match env.extensions.get(&custom.type_name) {
                Some(exporter) => exporter.content(obj, custom, ctx.zoom)?,
                None => String::new(),
            };
            layer_back(env, ctx, &source, Some(obj), Some(&content), false);
        }
        _ => {
            layer_back(env, ctx, &source, Some(obj), None, true);
            layer_picture(env, ctx, &source, obj, None, PaintOptions::default());
        }
    }
    Ok(())
}

/// Export a table: one background layer over the grid, then its cells.
fn export_table(
    env: &mut ExportEnv<'_>,
    ctx: &mut PageContext,
    obj: &ReportObject,
    table: &TableObject,
) -> Result<()> {
    if table.is_empty() {
        return Ok(());
    }
    env.stats.add_table();

    let rect = Rect::new(
        obj.base.left,
        obj.base.top,
        table.total_width().min(obj.base.width),
        table.total_height(),
    );
    let background = LayerSource::object(obj).at(rect);
    layer_back(env, ctx, &background, None, None, false);
    layer_table(env, ctx, table, obj.base.left, obj.base.top)
}
