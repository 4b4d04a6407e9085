use crate::error::Error;
use crate::fonts::{FontStyle, MM_PER_PT, line_height, text_width, wrap_text};
use crate::surface::{Color, Surface, TextAlign};

use super::cursor::LayoutCursor;

/// Height budgeted for the header row when deciding whether a table fits.
pub const HEADER_ESTIMATE: f32 = 10.0;
/// Height budgeted per body row when deciding whether a table fits.
pub const ROW_ESTIMATE: f32 = 8.0;

const FONT_SIZE: f32 = 9.0;
const CELL_PADDING: f32 = 2.0;
const HEADER_FILL: Color = Color::gray(240);
const HEADER_TEXT: Color = Color::gray(60);
const STRIPE_FILL: Color = Color::gray(250);
const ASCENT_RATIO: f32 = 0.75;

pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Per-column alignment; missing entries default to left.
    pub alignments: Vec<TextAlign>,
    /// Render the final row as a bold summary row.
    pub emphasize_last_row: bool,
}

impl Table {
    pub fn new(headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
            alignments: Vec::new(),
            emphasize_last_row: false,
        }
    }

    pub fn align(mut self, alignments: &[TextAlign]) -> Self {
        self.alignments = alignments.to_vec();
        self
    }

    pub fn emphasize_last_row(mut self) -> Self {
        self.emphasize_last_row = true;
        self
    }

    /// `HEADER_ESTIMATE + rows * ROW_ESTIMATE`.
    pub fn estimated_height(&self) -> f32 {
        HEADER_ESTIMATE + self.rows.len() as f32 * ROW_ESTIMATE
    }

    fn alignment(&self, col: usize) -> TextAlign {
        self.alignments.get(col).copied().unwrap_or(TextAlign::Left)
    }

    fn row_style(&self, ri: usize) -> FontStyle {
        if self.emphasize_last_row && ri + 1 == self.rows.len() {
            FontStyle::Bold
        } else {
            FontStyle::Normal
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableOutcome {
    /// Cursor position just below the last row.
    pub final_y: f32,
    pub page_breaks: usize,
}

/// Start from equal column widths and widen any column whose longest
/// unbreakable word would not fit; other columns shrink proportionally and the
/// total width is preserved.
fn auto_fit_columns(table: &Table, ncols: usize, total: f32) -> Vec<f32> {
    let mut min_widths = vec![0.0f32; ncols];
    let mut measure = |col: usize, text: &str, style: FontStyle| {
        for word in text.split_whitespace() {
            let ww = text_width(word, style, FONT_SIZE) + 2.0 * CELL_PADDING;
            min_widths[col] = min_widths[col].max(ww);
        }
    };
    for (col, header) in table.headers.iter().enumerate().take(ncols) {
        measure(col, header, FontStyle::Bold);
    }
    for (ri, row) in table.rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate().take(ncols) {
            measure(col, cell, table.row_style(ri));
        }
    }

    let mut widths = vec![total / ncols as f32; ncols];

    let mut extra_needed: f32 = 0.0;
    let mut shrinkable: f32 = 0.0;
    for i in 0..ncols {
        if min_widths[i] > widths[i] {
            extra_needed += min_widths[i] - widths[i];
            widths[i] = min_widths[i];
        } else {
            shrinkable += widths[i] - min_widths[i];
        }
    }

    if extra_needed > 0.0 && shrinkable > 0.0 {
        let factor = extra_needed.min(shrinkable) / shrinkable;
        for i in 0..ncols {
            if widths[i] > min_widths[i] {
                let available = widths[i] - min_widths[i];
                widths[i] -= available * factor;
            }
        }
        let new_total: f32 = widths.iter().sum();
        if (new_total - total).abs() > 0.01 {
            let scale = total / new_total;
            for w in &mut widths {
                *w *= scale;
            }
        }
    }

    widths
}

struct RowLayout {
    height: f32,
    cell_lines: Vec<Vec<String>>,
    style: FontStyle,
}

fn layout_row(cells: &[String], col_widths: &[f32], style: FontStyle) -> RowLayout {
    let lh = line_height(FONT_SIZE);
    let cell_lines: Vec<Vec<String>> = col_widths
        .iter()
        .enumerate()
        .map(|(col, w)| {
            let text = cells.get(col).map(String::as_str).unwrap_or("");
            wrap_text(text, style, FONT_SIZE, (w - 2.0 * CELL_PADDING).max(0.0))
        })
        .collect();
    let max_lines = cell_lines.iter().map(Vec::len).max().unwrap_or(1).max(1);
    RowLayout {
        height: 2.0 * CELL_PADDING + max_lines as f32 * lh,
        cell_lines,
        style,
    }
}

fn draw_row<S: Surface + ?Sized>(
    surface: &mut S,
    table: &Table,
    layout: &RowLayout,
    col_widths: &[f32],
    left: f32,
    top: f32,
    fill: Option<Color>,
    text_color: Color,
) -> Result<(), Error> {
    let total_w: f32 = col_widths.iter().sum();
    if let Some(fill) = fill {
        surface.fill_rect(left, top, total_w, layout.height, fill)?;
    }

    surface.set_font(layout.style, FONT_SIZE)?;
    surface.set_color(text_color)?;

    let lh = line_height(FONT_SIZE);
    let first_baseline = top + CELL_PADDING + FONT_SIZE * MM_PER_PT * ASCENT_RATIO;
    let mut cell_x = left;
    for (col, (w, lines)) in col_widths.iter().zip(&layout.cell_lines).enumerate() {
        let align = table.alignment(col);
        let x = match align {
            TextAlign::Left => cell_x + CELL_PADDING,
            TextAlign::Center => cell_x + w / 2.0,
            TextAlign::Right => cell_x + w - CELL_PADDING,
        };
        for (li, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            surface.draw_text(line, x, first_baseline + li as f32 * lh, align)?;
        }
        cell_x += w;
    }
    Ok(())
}

/// Draw `table` at the cursor.
///
/// The whole estimated height is reserved up front, so a table that does not
/// fit in the remaining space starts on a fresh page. Rows that still overflow
/// (long wrapped cells, long tables) break individually and the header row is
/// repeated at the top of the continuation page.
pub fn render_table<S: Surface + ?Sized>(
    cursor: &mut LayoutCursor,
    surface: &mut S,
    table: &Table,
) -> Result<TableOutcome, Error> {
    let geometry = *cursor.geometry();
    let ncols = table.headers.len().max(1);
    let col_widths = auto_fit_columns(table, ncols, geometry.content_width());
    let left = geometry.margin;

    let header = layout_row(&table.headers, &col_widths, FontStyle::Bold);
    let rows: Vec<RowLayout> = table
        .rows
        .iter()
        .enumerate()
        .map(|(ri, cells)| layout_row(cells, &col_widths, table.row_style(ri)))
        .collect();

    let start = cursor.reserve(table.estimated_height(), surface)?;
    let mut page_breaks = usize::from(start.page_broke);

    draw_row(
        surface,
        table,
        &header,
        &col_widths,
        left,
        cursor.y(),
        Some(HEADER_FILL),
        HEADER_TEXT,
    )?;
    cursor.advance(header.height);

    for (ri, row) in rows.iter().enumerate() {
        let at = cursor.reserve(row.height, surface)?;
        if at.page_broke {
            page_breaks += 1;
            draw_row(
                surface,
                table,
                &header,
                &col_widths,
                left,
                cursor.y(),
                Some(HEADER_FILL),
                HEADER_TEXT,
            )?;
            cursor.advance(header.height);
        }
        let top = cursor.y();
        log::debug!(
            "TABLE row={} row_h={:.2} top={:.2} page={}",
            ri,
            row.height,
            top,
            cursor.page() + 1
        );
        let fill = (ri % 2 == 1).then_some(STRIPE_FILL);
        draw_row(surface, table, row, &col_widths, left, top, fill, Color::BLACK)?;
        cursor.advance(row.height);
    }

    Ok(TableOutcome {
        final_y: cursor.y(),
        page_breaks,
    })
}
