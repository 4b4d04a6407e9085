use pdf_writer::{Name, Pdf, Ref};
use serde::{Deserialize, Serialize};

/// Millimetres per PostScript point. Font sizes are given in points while page
/// layout is done in millimetres.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.15;

/// The report uses the Helvetica family from the PDF base-14 set, so nothing is
/// embedded and metrics are known without touching the file system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

impl FontStyle {
    pub const ALL: [FontStyle; 3] = [FontStyle::Normal, FontStyle::Bold, FontStyle::Italic];

    /// Resource name used inside page content streams.
    pub(crate) fn resource_name(self) -> &'static str {
        match self {
            FontStyle::Normal => "F1",
            FontStyle::Bold => "F2",
            FontStyle::Italic => "F3",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            FontStyle::Normal => "Helvetica",
            FontStyle::Bold => "Helvetica-Bold",
            FontStyle::Italic => "Helvetica-Oblique",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            FontStyle::Bold => &HELVETICA_BOLD_WIDTHS,
            FontStyle::Normal | FontStyle::Italic => &HELVETICA_WIDTHS,
        }
    }
}

/// Helvetica advance widths (1000 units/em) for ASCII 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

/// Approximate width for WinAnsi bytes above the ASCII range.
const FALLBACK_WIDTH: u16 = 556;

fn byte_width_1000(style: FontStyle, byte: u8) -> f32 {
    match byte {
        32..=126 => style.widths()[(byte - 32) as usize] as f32,
        0..=31 => 0.0,
        _ => FALLBACK_WIDTH as f32,
    }
}

/// Width of `text` in millimetres when set in `style` at `size_pt`.
pub fn text_width(text: &str, style: FontStyle, size_pt: f32) -> f32 {
    let units: f32 = to_winansi_bytes(text)
        .iter()
        .map(|&b| byte_width_1000(style, b))
        .sum();
    units * size_pt / 1000.0 * MM_PER_PT
}

/// Baseline-to-baseline distance in millimetres.
pub fn line_height(size_pt: f32) -> f32 {
    size_pt * LINE_HEIGHT_FACTOR * MM_PER_PT
}

/// Greedy word wrap against static Helvetica metrics.
/// A single word wider than `max_width` gets a line of its own rather than
/// being split.
pub fn wrap_text(text: &str, style: FontStyle, size_pt: f32, max_width: f32) -> Vec<String> {
    let space_w = text_width(" ", style, size_pt);
    let mut lines: Vec<String> = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_w = 0.0f32;
        for word in paragraph.split_whitespace() {
            let ww = text_width(word, style, size_pt);
            if current.is_empty() {
                current.push_str(word);
                current_w = ww;
            } else if current_w + space_w + ww > max_width {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_w = ww;
            } else {
                current.push(' ');
                current.push_str(word);
                current_w += space_w + ww;
            }
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Characters with no WinAnsi code point are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .filter_map(|c| match char_to_winansi(c) {
            0 => {
                log::warn!("Dropping character {c:?}: not representable in WinAnsi");
                None
            }
            b => Some(b),
        })
        .collect()
}

/// Write the three Helvetica Type1 font dictionaries and return
/// `(resource name, ref)` pairs for page resource dictionaries.
pub(crate) fn register_standard_fonts(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
) -> Vec<(&'static str, Ref)> {
    FontStyle::ALL
        .iter()
        .map(|&style| {
            let font_ref = alloc();
            pdf.type1_font(font_ref)
                .base_font(Name(style.base_font().as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            (style.resource_name(), font_ref)
        })
        .collect()
}
