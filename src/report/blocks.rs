use crate::error::Error;
use crate::fonts::{FontStyle, line_height, text_width, wrap_text};
use crate::model::RiskTier;
use crate::surface::{Color, Surface, TextAlign};

use super::cursor::LayoutCursor;

const TITLE_SIZE: f32 = 18.0;
const TITLE_ADVANCE: f32 = 15.0;
const SECTION_SIZE: f32 = 14.0;
const SECTION_ADVANCE: f32 = 8.0;
const SUBSECTION_SIZE: f32 = 11.0;
const SUBSECTION_ADVANCE: f32 = 6.0;
const SUBSECTION_COLOR: Color = Color::gray(60);
pub(crate) const BODY_SIZE: f32 = 10.0;

const KV_SIZE: f32 = 9.0;
const KV_ROW_HEIGHT: f32 = 6.0;
const KV_TRAILING: f32 = 5.0;
const KV_LABEL_COLOR: Color = Color::gray(100);
/// Gap between a right-aligned value and its column's right edge.
const KV_VALUE_INSET: f32 = 4.0;

const NOTE_PADDING: f32 = 3.0;
const NOTE_ACCENT_WIDTH: f32 = 1.2;
const NOTE_TEXT_INSET: f32 = 4.0;
const NOTE_TITLE_ASCENT: f32 = 3.5;
const NOTE_TITLE_GAP: f32 = 5.5;
const NOTE_DESCENT: f32 = 1.5;
const NOTE_TRAILING: f32 = 6.0;
const NOTE_BODY_COLOR: Color = Color::gray(31);

pub struct KeyValue {
    pub label: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Palette entry for a [`colored_note`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteTier {
    Low,
    Medium,
    High,
    Info,
    Neutral,
}

impl NoteTier {
    pub fn foreground(self) -> Color {
        match self {
            NoteTier::Low => Color(22, 101, 52),
            NoteTier::Medium => Color(133, 77, 14),
            NoteTier::High => Color(153, 27, 27),
            NoteTier::Info => Color(30, 64, 175),
            NoteTier::Neutral => Color(75, 85, 99),
        }
    }

    pub fn background(self) -> Color {
        match self {
            NoteTier::Low => Color(240, 253, 244),
            NoteTier::Medium => Color(254, 252, 232),
            NoteTier::High => Color(254, 242, 242),
            NoteTier::Info => Color(239, 246, 255),
            NoteTier::Neutral => Color(249, 250, 251),
        }
    }
}

impl From<RiskTier> for NoteTier {
    fn from(tier: RiskTier) -> Self {
        match tier {
            RiskTier::Low => NoteTier::Low,
            RiskTier::Medium => NoteTier::Medium,
            RiskTier::High => NoteTier::High,
            RiskTier::Unknown => NoteTier::Neutral,
        }
    }
}

fn heading<S: Surface + ?Sized>(
    cursor: &mut LayoutCursor,
    surface: &mut S,
    text: &str,
    size: f32,
    color: Color,
    advance: f32,
) -> Result<(), Error> {
    let at = cursor.reserve(advance, surface)?;
    surface.set_font(FontStyle::Bold, size)?;
    surface.set_color(color)?;
    surface.draw_text(text, cursor.geometry().margin, at.y, TextAlign::Left)?;
    cursor.advance(advance);
    Ok(())
}

pub fn document_title<S: Surface + ?Sized>(
    cursor: &mut LayoutCursor,
    surface: &mut S,
    text: &str,
) -> Result<(), Error> {
    heading(cursor, surface, text, TITLE_SIZE, Color::BLACK, TITLE_ADVANCE)
}

pub fn section_title<S: Surface + ?Sized>(
    cursor: &mut LayoutCursor,
    surface: &mut S,
    text: &str,
) -> Result<(), Error> {
    heading(cursor, surface, text, SECTION_SIZE, Color::BLACK, SECTION_ADVANCE)
}

pub fn subsection_title<S: Surface + ?Sized>(
    cursor: &mut LayoutCursor,
    surface: &mut S,
    text: &str,
) -> Result<(), Error> {
    heading(
        cursor,
        surface,
        text,
        SUBSECTION_SIZE,
        SUBSECTION_COLOR,
        SUBSECTION_ADVANCE,
    )
}

/// Wrapped body paragraph followed by `trailing` space.
pub fn body_text<S: Surface + ?Sized>(
    cursor: &mut LayoutCursor,
    surface: &mut S,
    text: &str,
    trailing: f32,
) -> Result<(), Error> {
    let geometry = *cursor.geometry();
    let lines = wrap_text(text, FontStyle::Normal, BODY_SIZE, geometry.content_width());
    let lh = line_height(BODY_SIZE);
    let height = (lines.len() - 1) as f32 * lh + trailing;

    let at = cursor.reserve(height, surface)?;
    surface.set_font(FontStyle::Normal, BODY_SIZE)?;
    surface.set_color(Color::BLACK)?;
    for (i, line) in lines.iter().enumerate() {
        surface.draw_text(line, geometry.margin, at.y + i as f32 * lh, TextAlign::Left)?;
    }
    cursor.advance(height);
    Ok(())
}

/// Split `items` into `columns` groups of `ceil(n / columns)` and lay them out
/// side by side, labels left-aligned and values right-aligned per column.
pub fn key_value_grid<S: Surface + ?Sized>(
    cursor: &mut LayoutCursor,
    surface: &mut S,
    items: &[KeyValue],
    columns: usize,
) -> Result<(), Error> {
    if items.is_empty() {
        return Ok(());
    }
    let geometry = *cursor.geometry();
    let columns = columns.max(1);
    let rows_per_column = items.len().div_ceil(columns);
    let column_width = geometry.content_width() / columns as f32;
    let height = rows_per_column as f32 * KV_ROW_HEIGHT + KV_TRAILING;

    let at = cursor.reserve(height, surface)?;
    for (column, chunk) in items.chunks(rows_per_column).enumerate() {
        let start_x = geometry.margin + column as f32 * column_width;
        let value_x = start_x + column_width - KV_VALUE_INSET;
        for (row, item) in chunk.iter().enumerate() {
            let y = at.y + row as f32 * KV_ROW_HEIGHT;
            surface.set_font(FontStyle::Normal, KV_SIZE)?;
            surface.set_color(KV_LABEL_COLOR)?;
            surface.draw_text(&item.label, start_x, y, TextAlign::Left)?;

            surface.set_font(FontStyle::Bold, KV_SIZE)?;
            surface.set_color(Color::BLACK)?;
            surface.draw_text(&item.value, value_x, y, TextAlign::Right)?;

            let label_w = text_width(&item.label, FontStyle::Normal, KV_SIZE);
            let value_w = text_width(&item.value, FontStyle::Bold, KV_SIZE);
            if label_w + value_w > column_width - KV_VALUE_INSET {
                log::debug!("key-value row {:?} overlaps its value", item.label);
            }
        }
    }
    cursor.advance(height);
    Ok(())
}

/// Tinted callout with an accent bar, a tier-colored title and a wrapped body.
/// The whole note is placed on one page.
pub fn colored_note<S: Surface + ?Sized>(
    cursor: &mut LayoutCursor,
    surface: &mut S,
    title: &str,
    body: &str,
    tier: NoteTier,
) -> Result<(), Error> {
    let geometry = *cursor.geometry();
    let text_x = geometry.margin + NOTE_TEXT_INSET;
    let text_w = geometry.content_width() - 2.0 * NOTE_TEXT_INSET;
    let lines = wrap_text(body, FontStyle::Normal, BODY_SIZE, text_w);
    let lh = line_height(BODY_SIZE);

    let box_h = NOTE_PADDING
        + NOTE_TITLE_ASCENT
        + NOTE_TITLE_GAP
        + (lines.len() - 1) as f32 * lh
        + NOTE_DESCENT
        + NOTE_PADDING;

    let at = cursor.reserve(box_h + NOTE_TRAILING, surface)?;
    let top = at.y;
    surface.fill_rect(
        geometry.margin,
        top,
        geometry.content_width(),
        box_h,
        tier.background(),
    )?;
    surface.fill_rect(geometry.margin, top, NOTE_ACCENT_WIDTH, box_h, tier.foreground())?;

    let title_y = top + NOTE_PADDING + NOTE_TITLE_ASCENT;
    surface.set_font(FontStyle::Bold, SUBSECTION_SIZE)?;
    surface.set_color(tier.foreground())?;
    surface.draw_text(title, text_x, title_y, TextAlign::Left)?;

    surface.set_font(FontStyle::Normal, BODY_SIZE)?;
    surface.set_color(NOTE_BODY_COLOR)?;
    let body_y = title_y + NOTE_TITLE_GAP;
    for (i, line) in lines.iter().enumerate() {
        surface.draw_text(line, text_x, body_y + i as f32 * lh, TextAlign::Left)?;
    }

    cursor.advance(box_h + NOTE_TRAILING);
    Ok(())
}

/// Text at a fixed position, outside the flow (page footers).
pub fn pinned_text<S: Surface + ?Sized>(
    surface: &mut S,
    text: &str,
    x: f32,
    y: f32,
    style: FontStyle,
    size: f32,
    color: Color,
) -> Result<(), Error> {
    surface.set_font(style, size)?;
    surface.set_color(color)?;
    surface.draw_text(text, x, y, TextAlign::Left)
}
