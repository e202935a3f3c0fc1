//! Table types.

use super::{Border, CellularTextObject, Fill, HorzAlign, Hyperlink, Padding, TextObject, VertAlign};
use serde::{Deserialize, Serialize};

/// A row/column grid of cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableObject {
    /// Columns, left to right
    pub columns: Vec<TableColumn>,

    /// Rows, top to bottom
    pub rows: Vec<TableRow>,
}

impl TableObject {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from column widths and rows.
    pub fn with_grid(column_widths: &[f32], rows: Vec<TableRow>) -> Self {
        Self {
            columns: column_widths.iter().map(|&w| TableColumn::new(w)).collect(),
            rows,
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Sum of the column widths.
    pub fn total_width(&self) -> f32 {
        self.columns.iter().map(|c| c.width).sum()
    }

    /// Sum of the row heights.
    pub fn total_height(&self) -> f32 {
        self.rows.iter().map(|r| r.height).sum()
    }

    /// Cell at the given column and row.
    pub fn cell(&self, column: usize, row: usize) -> Option<&TableCell> {
        self.rows.get(row).and_then(|r| r.cells.get(column))
    }

    /// Check if the table has merged cells.
    pub fn has_merged_cells(&self) -> bool {
        self.rows
            .iter()
            .flat_map(|r| &r.cells)
            .any(|c| c.row_span > 1 || c.col_span > 1)
    }

    /// Coverage map: `true` where a cell is covered by a preceding spanning cell.
    ///
    /// Indexed as `[row][column]`.
    pub fn span_coverage(&self) -> Vec<Vec<bool>> {
        let rows = self.rows.len();
        let cols = self.columns.len();
        let mut covered = vec![vec![false; cols]; rows];

        for (y, row) in self.rows.iter().enumerate() {
            for (x, cell) in row.cells.iter().enumerate().take(cols) {
                if covered[y][x] {
                    continue;
                }
                let row_end = (y + cell.row_span.max(1) as usize).min(rows);
                let col_end = (x + cell.col_span.max(1) as usize).min(cols);
                for covered_row in covered.iter_mut().take(row_end).skip(y) {
                    for flag in covered_row.iter_mut().take(col_end).skip(x) {
                        *flag = true;
                    }
                }
                // the spanning cell itself stays visible
                covered[y][x] = false;
            }
        }

        covered
    }
}

/// A table column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableColumn {
    /// Width in pixels
    pub width: f32,
}

impl TableColumn {
    /// Column of the given width.
    pub fn new(width: f32) -> Self {
        Self { width }
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRow {
    /// Height in pixels
    pub height: f32,

    /// Cells in the row, one per column
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(height: f32, cells: Vec<TableCell>) -> Self {
        Self { height, cells }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(height: f32, values: impl IntoIterator<Item = S>) -> Self {
        Self::new(height, values.into_iter().map(TableCell::text).collect())
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableCell {
    /// Cell name, used as the click-event identifier
    pub name: String,

    /// Number of columns this cell spans
    pub col_span: u32,

    /// Number of rows this cell spans
    pub row_span: u32,

    pub border: Border,
    pub fill: Fill,
    pub hyperlink: Option<Hyperlink>,
    pub has_click_listeners: bool,

    /// Cell text and its formatting
    pub text: TextObject,
}

impl TableCell {
    /// Create a new cell with text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: TextObject::new(text),
            ..Self::default()
        }
    }

    /// Create an empty cell.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the name and return self.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set colspan and return self.
    pub fn col_span(mut self, span: u32) -> Self {
        self.col_span = span;
        self
    }

    /// Set rowspan and return self.
    pub fn row_span(mut self, span: u32) -> Self {
        self.row_span = span;
        self
    }

    /// Set the border and return self.
    pub fn with_border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            name: String::new(),
            col_span: 1,
            row_span: 1,
            border: Border::default(),
            fill: Fill::default(),
            hyperlink: None,
            has_click_listeners: false,
            text: TextObject::default(),
        }
    }
}

/// Upper bound on cells along one axis of a cellular grid.
pub const MAX_CELLULAR_SIDE: usize = 4096;

/// Whole cells of `cell` size plus `spacing` that fit in `extent`.
fn cells_along(extent: f32, cell: f32, spacing: f32) -> usize {
    let step = (cell + spacing).max(1.0);
    let extent = if extent.is_finite() { extent.max(0.0) } else { 0.0 };
    let fit = ((extent + spacing) / step).floor();
    if fit.is_finite() {
        (fit as usize).min(extent.ceil() as usize + 1).min(MAX_CELLULAR_SIDE)
    } else {
        0
    }
}

impl CellularTextObject {
    /// Cell size, falling back to a font-derived square when unset.
    pub fn cell_size(&self) -> (f32, f32) {
        let auto = (self.font.size_px() * 1.8).round().max(1.0);
        let width = if self.cell_width > 0.0 { self.cell_width } else { auto };
        let height = if self.cell_height > 0.0 { self.cell_height } else { auto };
        (width, height)
    }

    /// Resolve the text into a grid of one character per cell.
    ///
    /// Spacing between cells becomes empty spacer columns and rows. The
    /// number of cells along an axis never exceeds the object's extent in
    /// pixels, nor [`MAX_CELLULAR_SIDE`].
    pub fn to_table(&self, width: f32, height: f32) -> TableObject {
        let (cell_w, cell_h) = self.cell_size();
        let horz_spacing = self.horz_spacing.max(0.0);
        let vert_spacing = self.vert_spacing.max(0.0);
        let per_row = cells_along(width, cell_w, horz_spacing).max(1);
        let chars: Vec<char> = self.text.chars().filter(|c| *c != '\r').collect();

        let mut lines: Vec<Vec<char>> = Vec::new();
        for source_line in chars.split(|c| *c == '\n') {
            if source_line.is_empty() {
                lines.push(Vec::new());
                continue;
            }
            lines.extend(source_line.chunks(per_row).map(|chunk| chunk.to_vec()));
        }
        let fit_rows = cells_along(height, cell_h, vert_spacing);
        let row_count = lines.len().max(fit_rows).clamp(1, MAX_CELLULAR_SIDE);

        let mut column_widths = Vec::with_capacity(per_row * 2);
        for i in 0..per_row {
            if i > 0 && horz_spacing > 0.0 {
                column_widths.push(horz_spacing);
            }
            column_widths.push(cell_w);
        }

        let mut table = TableObject::with_grid(&column_widths, Vec::new());
        for y in 0..row_count {
            if y > 0 && vert_spacing > 0.0 {
                let spacer = (0..column_widths.len()).map(|_| TableCell::empty()).collect();
                table.add_row(TableRow::new(vert_spacing, spacer));
            }

            let line = lines.get(y).map(Vec::as_slice).unwrap_or(&[]);
            let mut cells = Vec::with_capacity(column_widths.len());
            for x in 0..per_row {
                if x > 0 && horz_spacing > 0.0 {
                    cells.push(TableCell::empty());
                }
                cells.push(self.character_cell(line.get(x).copied()));
            }
            table.add_row(TableRow::new(cell_h, cells));
        }

        table
    }

    fn character_cell(&self, ch: Option<char>) -> TableCell {
        let mut text = TextObject::new(ch.map(String::from).unwrap_or_default());
        text.font = self.font.clone();
        text.text_color = self.text_color;
        text.horz_align = HorzAlign::Center;
        text.vert_align = VertAlign::Center;
        text.padding = Padding::default();
        text.word_wrap = false;

        TableCell {
            border: self.cell_border.clone(),
            text,
            ..TableCell::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(cols: usize, rows: usize) -> TableObject {
        let widths = vec![50.0; cols];
        let rows = (0..rows)
            .map(|_| TableRow::new(20.0, (0..cols).map(|_| TableCell::empty()).collect()))
            .collect();
        TableObject::with_grid(&widths, rows)
    }

    #[test]
    fn test_totals() {
        let table = grid(3, 2);
        assert_eq!(table.total_width(), 150.0);
        assert_eq!(table.total_height(), 40.0);
        assert!(!table.has_merged_cells());
    }

    #[test]
    fn test_span_coverage_full() {
        let mut table = grid(2, 2);
        table.rows[0].cells[0] = TableCell::text("all").col_span(2).row_span(2);

        let covered = table.span_coverage();
        assert!(!covered[0][0]);
        assert!(covered[0][1]);
        assert!(covered[1][0]);
        assert!(covered[1][1]);
    }

    #[test]
    fn test_span_coverage_clamped() {
        let mut table = grid(2, 2);
        table.rows[1].cells[1] = TableCell::empty().col_span(5).row_span(5);

        let covered = table.span_coverage();
        assert!(covered.iter().flatten().all(|c| !c));
    }

    #[test]
    fn test_cellular_to_table() {
        let cellular = CellularTextObject {
            text: "ABCDE".to_string(),
            cell_width: 20.0,
            cell_height: 20.0,
            ..CellularTextObject::default()
        };

        let table = cellular.to_table(60.0, 20.0);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 0).unwrap().text.text, "A");
        assert_eq!(table.cell(1, 1).unwrap().text.text, "E");
        assert_eq!(table.cell(2, 1).unwrap().text.text, "");
    }

    #[test]
    fn test_cellular_spacing() {
        let cellular = CellularTextObject {
            text: "AB".to_string(),
            cell_width: 20.0,
            cell_height: 20.0,
            horz_spacing: 5.0,
            ..CellularTextObject::default()
        };

        let table = cellular.to_table(45.0, 20.0);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.columns[1].width, 5.0);
        assert_eq!(table.cell(2, 0).unwrap().text.text, "B");
    }

    #[test]
    fn test_cellular_tiny_cells_stay_bounded() {
        let cellular = CellularTextObject {
            text: "AB".to_string(),
            cell_width: 1e-20,
            cell_height: 1e-20,
            ..CellularTextObject::default()
        };

        let table = cellular.to_table(10.0, 4.0);
        assert!(table.column_count() <= 11);
        assert!(table.row_count() <= 5);
        assert_eq!(table.cell(0, 0).unwrap().text.text, "A");
    }

    #[test]
    fn test_cellular_negative_spacing_is_ignored() {
        let cellular = CellularTextObject {
            text: "ABC".to_string(),
            cell_width: 20.0,
            cell_height: 20.0,
            horz_spacing: -20.0,
            vert_spacing: -20.0,
            ..CellularTextObject::default()
        };

        let table = cellular.to_table(40.0, 20.0);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 2);
        assert!(table.columns.iter().all(|c| c.width == 20.0));
    }

    #[test]
    fn test_cellular_huge_extent_is_capped() {
        let cellular = CellularTextObject {
            text: "A".to_string(),
            cell_width: 1.0,
            cell_height: 1.0,
            ..CellularTextObject::default()
        };

        let table = cellular.to_table(1e9, f32::INFINITY);
        assert_eq!(table.column_count(), MAX_CELLULAR_SIDE);
        assert_eq!(table.row_count(), 1);
    }
}
