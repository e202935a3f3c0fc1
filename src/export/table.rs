//! Table grid walking.

use super::context::{ExportEnv, PageContext};
use super::hooks::{CustomDrawArgs, DrawTarget, HookAction};
use super::positioner::{layer_back, layer_picture, LayerSource};
use super::text::layer_text;
use crate::draw::{CellPaint, PaintOptions};
use crate::error::Result;
use crate::model::{Rect, TableCell, TableObject};

/// A cell that is not covered by another cell's span, with its
/// page-absolute bounds.
#[derive(Debug, Clone, Copy)]
pub struct PlacedCell<'a> {
    pub cell: &'a TableCell,
    pub column: usize,
    pub row: usize,
    pub rect: Rect,
}

/// Visible cells of `table` placed at `(left, top)`, rows top to bottom
/// and columns left to right.
///
/// A spanning cell's bounds cover every column and row it spans, clamped
/// to the grid.
pub fn visible_cells(table: &TableObject, left: f32, top: f32) -> Vec<PlacedCell<'_>> {
    let covered = table.span_coverage();
    let mut cells = Vec::new();

    let mut y = 0.0;
    for (r, row) in table.rows.iter().enumerate() {
        let mut x = 0.0;
        for (c, column) in table.columns.iter().enumerate() {
            let is_covered = covered.get(r).and_then(|row| row.get(c)).copied().unwrap_or(false);
            if let (false, Some(cell)) = (is_covered, row.cells.get(c)) {
                let last_col = (c + cell.col_span.max(1) as usize).min(table.columns.len());
                let last_row = (r + cell.row_span.max(1) as usize).min(table.rows.len());
                let width: f32 = table.columns[c..last_col].iter().map(|col| col.width).sum();
                let height: f32 = table.rows[r..last_row].iter().map(|row| row.height).sum();
                cells.push(PlacedCell {
                    cell,
                    column: c,
                    row: r,
                    rect: Rect::new(left + x, top + y, width, height),
                });
            }
            x += column.width;
        }
        y += row.height;
    }

    cells
}

/// Layer every visible cell of a table placed at `(left, top)`.
///
/// Each cell is first offered to the custom-draw hook.
pub fn layer_table(
    env: &mut ExportEnv<'_>,
    ctx: &mut PageContext,
    table: &TableObject,
    left: f32,
    top: f32,
) -> Result<()> {
    for placed in visible_cells(table, left, top) {
        let cell = placed.cell;
        let rect = placed.rect;
        env.stats.add_cell();

        let args = CustomDrawArgs {
            target: DrawTarget::Cell(cell),
            left: rect.left,
            top: ctx.h_pos + rect.top,
            width: rect.width,
            height: rect.height,
            zoom: ctx.zoom,
            layers: env.options.layers,
            page_number: ctx.number,
        };
        match env.hooks.custom_draw(&args) {
            HookAction::Replace { html, css } => {
                env.stats.add_custom_drawn();
                ctx.css.push_str(&css);
                ctx.html.push_str(&html);
                continue;
            }
            HookAction::Skip => {
                env.stats.add_custom_drawn();
                continue;
            }
            HookAction::Continue => {}
        }

        let source = LayerSource::cell(cell, rect);
        let paint = CellPaint { cell, rect };
        if cell.text.is_memo() {
            layer_text(env, ctx, &source, &cell.text, Some(&paint))?;
        } else {
            layer_back(env, ctx, &source, Some(&paint), None, false);
            layer_picture(env, ctx, &source, &paint, None, PaintOptions::default());
        }
    }
    Ok(())
}
