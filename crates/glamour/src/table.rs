//! Table accumulation and fixed-width layout.
//!
//! A [`TableBuilder`] collects header and body cells as the document walk
//! enters and leaves table nodes. Finishing it yields a [`TableData`] that
//! [`render_table`] lays out into plain lines with configurable separators.
//!
//! # Example
//!
//! ```rust
//! use glamour::ast::Alignment;
//! use glamour::table::{TableBuilder, TableLayout, render_table};
//!
//! let mut builder = TableBuilder::new(vec![Alignment::Left, Alignment::Right]);
//! builder.begin_header().unwrap();
//! builder.add_cell("Name").unwrap();
//! builder.add_cell("Age").unwrap();
//! builder.end_header().unwrap();
//! builder.begin_row().unwrap();
//! builder.add_cell("Alice").unwrap();
//! builder.add_cell("30").unwrap();
//! builder.end_row().unwrap();
//!
//! let table = builder.finish().unwrap();
//! let out = render_table(&table, &TableLayout::default()).unwrap();
//! assert_eq!(out.lines().count(), 3);
//! ```

use crate::ansi::{self, visible_width};
use crate::ast::Alignment;
use crate::error::TableError;

/// A table cell ready for layout. Content may carry SGR sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    /// Rendered cell text.
    pub content: String,
    /// Alignment within the column.
    pub alignment: Alignment,
}

impl TableCell {
    /// Creates a new cell.
    pub fn new(content: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            content: content.into(),
            alignment,
        }
    }
}

/// A complete table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableData {
    /// Column alignments from the delimiter row.
    pub alignments: Vec<Alignment>,
    /// Header cells.
    pub header: Vec<TableCell>,
    /// Body rows, each exactly as wide as the header.
    pub rows: Vec<Vec<TableCell>>,
}

impl TableData {
    /// Returns the number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Returns the number of rows with cell data, header included.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }
}

// ============================================================================
// Table Builder
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuilderState {
    Idle,
    AccumulatingHeader,
    AccumulatingRow,
}

impl BuilderState {
    const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AccumulatingHeader => "accumulating header",
            Self::AccumulatingRow => "accumulating row",
        }
    }
}

/// Accumulates the cells of one table.
///
/// Transitions: idle → header → idle → row (repeatable) → idle, then
/// [`TableBuilder::finish`] consumes the builder.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    state: BuilderState,
    alignments: Vec<Alignment>,
    header: Option<Vec<TableCell>>,
    rows: Vec<Vec<TableCell>>,
    current: Vec<TableCell>,
}

impl TableBuilder {
    /// Starts a table with the given column alignments.
    #[must_use]
    pub fn new(alignments: Vec<Alignment>) -> Self {
        Self {
            state: BuilderState::Idle,
            alignments,
            header: None,
            rows: Vec::new(),
            current: Vec::new(),
        }
    }

    fn unexpected(&self, event: &'static str) -> TableError {
        TableError::UnexpectedEvent {
            event,
            state: self.state.name(),
        }
    }

    /// Starts the header row.
    ///
    /// # Errors
    ///
    /// Fails unless the builder is idle with no header yet.
    pub fn begin_header(&mut self) -> Result<(), TableError> {
        if self.state != BuilderState::Idle || self.header.is_some() {
            return Err(self.unexpected("header"));
        }
        self.state = BuilderState::AccumulatingHeader;
        Ok(())
    }

    /// Commits the header row.
    ///
    /// # Errors
    ///
    /// Fails unless a header row is open.
    pub fn end_header(&mut self) -> Result<(), TableError> {
        if self.state != BuilderState::AccumulatingHeader {
            return Err(self.unexpected("header end"));
        }
        self.header = Some(std::mem::take(&mut self.current));
        self.state = BuilderState::Idle;
        Ok(())
    }

    /// Starts a body row.
    ///
    /// # Errors
    ///
    /// Fails if another row is open or the header has not been committed.
    pub fn begin_row(&mut self) -> Result<(), TableError> {
        if self.state != BuilderState::Idle {
            return Err(self.unexpected("row"));
        }
        if self.header.is_none() {
            return Err(TableError::UnexpectedEvent {
                event: "row",
                state: "awaiting header",
            });
        }
        self.state = BuilderState::AccumulatingRow;
        Ok(())
    }

    /// Commits the open body row, padding short rows with empty cells.
    ///
    /// # Errors
    ///
    /// Fails if no row is open or the row is wider than the header.
    pub fn end_row(&mut self) -> Result<(), TableError> {
        if self.state != BuilderState::AccumulatingRow {
            return Err(self.unexpected("row end"));
        }
        let columns = self.header.as_ref().map_or(0, Vec::len);
        let mut row = std::mem::take(&mut self.current);
        if row.len() > columns {
            return Err(TableError::RaggedRow {
                row: self.rows.len(),
                cells: row.len(),
                columns,
            });
        }
        while row.len() < columns {
            let alignment = self.alignment(row.len());
            row.push(TableCell::new("", alignment));
        }
        self.rows.push(row);
        self.state = BuilderState::Idle;
        Ok(())
    }

    /// Adds a cell to the open row, aligned per its column.
    ///
    /// # Errors
    ///
    /// Fails if no header or body row is open.
    pub fn add_cell(&mut self, content: impl Into<String>) -> Result<(), TableError> {
        match self.state {
            BuilderState::AccumulatingHeader | BuilderState::AccumulatingRow => {
                let alignment = self.alignment(self.current.len());
                self.current.push(TableCell::new(content, alignment));
                Ok(())
            }
            BuilderState::Idle => Err(self.unexpected("cell")),
        }
    }

    fn alignment(&self, column: usize) -> Alignment {
        self.alignments.get(column).copied().unwrap_or_default()
    }

    /// Number of committed rows with cell data, header included.
    #[must_use]
    pub fn committed_rows(&self) -> usize {
        self.rows.len() + usize::from(self.header.is_some())
    }

    /// Completes the table.
    ///
    /// # Errors
    ///
    /// Fails if a row is still open or the table has no columns.
    pub fn finish(self) -> Result<TableData, TableError> {
        if self.state != BuilderState::Idle {
            return Err(self.unexpected("finish"));
        }
        let header = self.header.unwrap_or_default();
        if header.is_empty() {
            return Err(TableError::NoColumns);
        }
        Ok(TableData {
            alignments: self.alignments,
            header,
            rows: self.rows,
        })
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Separator glyphs and the width budget for [`render_table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    /// Glyph where the header rule crosses a column boundary.
    pub center_separator: String,
    /// Glyph between columns.
    pub column_separator: String,
    /// Glyph repeated to draw the header rule.
    pub row_separator: String,
    /// Maximum line width (0 = no limit).
    pub max_width: usize,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            center_separator: "┼".to_string(),
            column_separator: "│".to_string(),
            row_separator: "─".to_string(),
            max_width: 0,
        }
    }
}

const CELL_PADDING: usize = 1;
const MIN_COLUMN_WIDTH: usize = 1;

/// Content width of every column plus the padding on each side of a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnWidths {
    /// Content width per column.
    pub widths: Vec<usize>,
    /// Spaces on each side of every cell.
    pub padding: usize,
}

/// Calculates content widths per column, shrinking to fit `layout.max_width`.
///
/// Columns shrink in proportion to their natural width. Cell padding is
/// dropped when the padded columns cannot fit.
#[must_use]
pub fn calculate_column_widths(table: &TableData, layout: &TableLayout) -> ColumnWidths {
    let column_count = table.column_count();
    let mut widths = vec![MIN_COLUMN_WIDTH; column_count];
    for row in std::iter::once(&table.header).chain(&table.rows) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(visible_width(&cell.content));
        }
    }

    if layout.max_width == 0 || column_count == 0 {
        return ColumnWidths {
            widths,
            padding: CELL_PADDING,
        };
    }

    let separators = (column_count - 1) * visible_width(&layout.column_separator);
    let content: usize = widths.iter().sum();
    for padding in [CELL_PADDING, 0] {
        let overhead = column_count * padding * 2 + separators;
        if content + overhead <= layout.max_width {
            return ColumnWidths { widths, padding };
        }
        let available = layout.max_width.saturating_sub(overhead);
        if available >= column_count * MIN_COLUMN_WIDTH {
            return ColumnWidths {
                widths: shrink(&widths, available),
                padding,
            };
        }
    }

    ColumnWidths {
        widths: vec![MIN_COLUMN_WIDTH; column_count],
        padding: 0,
    }
}

/// Scales `widths` down so they sum to at most `available`, keeping every
/// column at least [`MIN_COLUMN_WIDTH`] wide.
fn shrink(widths: &[usize], available: usize) -> Vec<usize> {
    let floor = widths.len() * MIN_COLUMN_WIDTH;
    let spare = available - floor;
    let excess: usize = widths.iter().map(|w| w - MIN_COLUMN_WIDTH).sum();
    if excess == 0 {
        return widths.to_vec();
    }

    let mut out: Vec<usize> = widths
        .iter()
        .map(|w| MIN_COLUMN_WIDTH + (w - MIN_COLUMN_WIDTH) * spare / excess)
        .collect();
    let mut leftover = available - out.iter().sum::<usize>();
    for (width, &natural) in out.iter_mut().zip(widths) {
        if leftover == 0 {
            break;
        }
        if *width < natural {
            *width += 1;
            leftover -= 1;
        }
    }
    out
}

/// Pad content to a target width with the specified alignment.
///
/// Content at least as wide as the target is returned unchanged.
#[must_use]
pub fn pad_content(content: &str, width: usize, alignment: Alignment) -> String {
    let content_width = visible_width(content);
    if content_width >= width {
        return content.to_string();
    }
    let padding_needed = width - content_width;
    match alignment {
        Alignment::None | Alignment::Left => format!("{content}{}", " ".repeat(padding_needed)),
        Alignment::Right => format!("{}{content}", " ".repeat(padding_needed)),
        Alignment::Center => {
            let left_pad = padding_needed / 2;
            let right_pad = padding_needed - left_pad;
            format!("{}{content}{}", " ".repeat(left_pad), " ".repeat(right_pad))
        }
    }
}

fn render_row(cells: &[TableCell], columns: &ColumnWidths, separator: &str) -> String {
    let margin = " ".repeat(columns.padding);
    cells
        .iter()
        .zip(&columns.widths)
        .map(|(cell, &width)| {
            let content = ansi::truncate(&cell.content, width);
            format!("{margin}{}{margin}", pad_content(&content, width, cell.alignment))
        })
        .collect::<Vec<_>>()
        .join(separator)
        .trim_end()
        .to_string()
}

/// Lays a table out as lines: header, header rule, then one line per row.
///
/// # Errors
///
/// Returns [`TableError::NoColumns`] for a table without columns.
pub fn render_table(table: &TableData, layout: &TableLayout) -> Result<String, TableError> {
    if table.column_count() == 0 {
        return Err(TableError::NoColumns);
    }
    let columns = calculate_column_widths(table, layout);

    let mut lines = Vec::with_capacity(table.row_count() + 1);
    lines.push(render_row(&table.header, &columns, &layout.column_separator));
    if !layout.row_separator.is_empty() {
        let rule = columns
            .widths
            .iter()
            .map(|w| layout.row_separator.repeat(w + columns.padding * 2))
            .collect::<Vec<_>>()
            .join(&layout.center_separator);
        lines.push(rule);
    }
    for row in &table.rows {
        lines.push(render_row(row, &columns, &layout.column_separator));
    }

    // More columns than the budget has cells for.
    if layout.max_width > 0 {
        for line in &mut lines {
            if visible_width(line) > layout.max_width {
                *line = ansi::truncate(line, layout.max_width);
            }
        }
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(header: &[&str], rows: &[&[&str]]) -> TableData {
        let mut builder = TableBuilder::new(vec![Alignment::None; header.len()]);
        builder.begin_header().unwrap();
        for cell in header {
            builder.add_cell(*cell).unwrap();
        }
        builder.end_header().unwrap();
        for row in rows {
            builder.begin_row().unwrap();
            for cell in *row {
                builder.add_cell(*cell).unwrap();
            }
            builder.end_row().unwrap();
        }
        builder.finish().unwrap()
    }

    fn ascii() -> TableLayout {
        TableLayout {
            center_separator: "+".into(),
            column_separator: "|".into(),
            row_separator: "-".into(),
            max_width: 0,
        }
    }

    #[test]
    fn builder_counts_header_plus_rows() {
        let table = build(&["a", "b"], &[&["1", "2"], &["3", "4"], &["5", "6"]]);
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn short_rows_are_padded() {
        let table = build(&["a", "b", "c"], &[&["1"]]);
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[0][2].content, "");
    }

    #[test]
    fn wide_rows_are_rejected() {
        let mut builder = TableBuilder::new(vec![]);
        builder.begin_header().unwrap();
        builder.add_cell("a").unwrap();
        builder.end_header().unwrap();
        builder.begin_row().unwrap();
        builder.add_cell("1").unwrap();
        builder.add_cell("2").unwrap();
        assert_eq!(
            builder.end_row(),
            Err(TableError::RaggedRow {
                row: 0,
                cells: 2,
                columns: 1
            })
        );
    }

    #[test]
    fn cell_outside_row_is_rejected() {
        let mut builder = TableBuilder::new(vec![]);
        assert_eq!(
            builder.add_cell("x"),
            Err(TableError::UnexpectedEvent {
                event: "cell",
                state: "idle"
            })
        );
    }

    #[test]
    fn row_before_header_is_rejected() {
        let mut builder = TableBuilder::new(vec![]);
        assert!(matches!(
            builder.begin_row(),
            Err(TableError::UnexpectedEvent { event: "row", .. })
        ));
    }

    #[test]
    fn second_header_is_rejected() {
        let mut builder = TableBuilder::new(vec![]);
        builder.begin_header().unwrap();
        builder.add_cell("a").unwrap();
        builder.end_header().unwrap();
        assert!(builder.begin_header().is_err());
    }

    #[test]
    fn finish_requires_columns_and_closed_rows() {
        assert_eq!(TableBuilder::new(vec![]).finish(), Err(TableError::NoColumns));

        let mut open = TableBuilder::new(vec![]);
        open.begin_header().unwrap();
        assert!(matches!(
            open.finish(),
            Err(TableError::UnexpectedEvent { event: "finish", .. })
        ));
    }

    #[test]
    fn renders_header_rule_and_rows() {
        let table = build(&["Name", "Age"], &[&["Alice", "30"], &["Bob", "7"]]);
        let out = render_table(&table, &ascii()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], " Name  | Age");
        assert_eq!(lines[1], "-------+-----");
        assert_eq!(lines[2], " Alice | 30");
        assert_eq!(lines[3], " Bob   | 7");
    }

    #[test]
    fn alignment_pads_cells() {
        assert_eq!(pad_content("Hi", 6, Alignment::Left), "Hi    ");
        assert_eq!(pad_content("Hi", 6, Alignment::Right), "    Hi");
        assert_eq!(pad_content("Hi", 6, Alignment::Center), "  Hi  ");
        assert_eq!(pad_content("\x1b[1mHi\x1b[0m", 4, Alignment::Right), "  \x1b[1mHi\x1b[0m");
    }

    #[test]
    fn right_aligned_columns() {
        let mut builder = TableBuilder::new(vec![Alignment::Left, Alignment::Right]);
        builder.begin_header().unwrap();
        builder.add_cell("k").unwrap();
        builder.add_cell("value").unwrap();
        builder.end_header().unwrap();
        builder.begin_row().unwrap();
        builder.add_cell("a").unwrap();
        builder.add_cell("1").unwrap();
        builder.end_row().unwrap();
        let out = render_table(&builder.finish().unwrap(), &ascii()).unwrap();
        assert_eq!(out.lines().nth(2), Some(" a |     1"));
    }

    #[test]
    fn shrinks_to_max_width() {
        let table = build(
            &["Column one", "Column two"],
            &[&["a very long cell value", "another long cell value"]],
        );
        let layout = TableLayout {
            max_width: 30,
            ..ascii()
        };
        let out = render_table(&table, &layout).unwrap();
        for line in out.lines() {
            assert!(visible_width(line) <= 30, "too wide: {line:?}");
        }
        assert!(out.contains('…'));
    }

    #[test]
    fn widths_have_a_floor_of_one() {
        let table = build(&["", ""], &[]);
        assert_eq!(calculate_column_widths(&table, &ascii()).widths, vec![1, 1]);
    }

    #[test]
    fn narrow_budgets_drop_cell_padding() {
        let table = build(&["a", "b", "c", "d", "e"], &[&["1", "2", "3", "4", "5"]]);
        let layout = TableLayout {
            max_width: 10,
            ..ascii()
        };
        let columns = calculate_column_widths(&table, &layout);
        assert_eq!(columns.padding, 0);
        let out = render_table(&table, &layout).unwrap();
        assert_eq!(out.lines().next(), Some("a|b|c|d|e"));
        for line in out.lines() {
            assert!(visible_width(line) <= 10, "too wide: {line:?}");
        }
    }

    #[test]
    fn budgets_below_one_cell_per_column_are_clamped() {
        let table = build(&["a", "b", "c", "d", "e"], &[&["1", "2", "3", "4", "5"]]);
        let layout = TableLayout {
            max_width: 4,
            ..ascii()
        };
        let out = render_table(&table, &layout).unwrap();
        for line in out.lines() {
            assert!(visible_width(line) <= 4, "too wide: {line:?}");
        }
    }

    #[test]
    fn shrunk_widths_never_exceed_the_budget() {
        let table = build(
            &["x", "a much longer header", "y", "another long one"],
            &[&["1", "2", "3", "4"]],
        );
        for max_width in 12..60 {
            let layout = TableLayout {
                max_width,
                ..ascii()
            };
            let out = render_table(&table, &layout).unwrap();
            for line in out.lines() {
                assert!(visible_width(line) <= max_width, "{max_width}: {line:?}");
            }
        }
    }
}
