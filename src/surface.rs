//! Drawing backend abstraction.
//!
//! Layout code never talks to a concrete output format. It emits primitive
//! operations against a [`Surface`]; the PDF writer, the PNG rasterizer and the
//! recording [`DisplayList`] are the three implementations.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fonts::FontStyle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255);

    pub const fn gray(level: u8) -> Self {
        Color(level, level, level)
    }

    /// From a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Color((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub(crate) fn unit_rgb(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Target of all drawing. Coordinates grow rightwards and downwards from the
/// top-left corner of the current page; text `y` is the baseline.
///
/// Every operation is fallible so that an export backend can refuse work
/// midway; callers propagate the error and discard whatever was produced.
pub trait Surface {
    fn set_font(&mut self, style: FontStyle, size: f32) -> Result<(), Error>;
    /// Fill color for subsequent text.
    fn set_color(&mut self, color: Color) -> Result<(), Error>;
    fn draw_text(&mut self, text: &str, x: f32, y: f32, align: TextAlign) -> Result<(), Error>;
    fn draw_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Color,
    ) -> Result<(), Error>;
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) -> Result<(), Error>;
    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color) -> Result<(), Error>;
    fn add_page(&mut self) -> Result<(), Error>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    SetFont {
        style: FontStyle,
        size: f32,
    },
    SetColor {
        color: Color,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        align: TextAlign,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Color,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        color: Color,
    },
}

/// A surface that records operations page by page.
///
/// This is the interactive form of a rendering: hosts can serialize it and
/// paint it themselves, and any other surface can be driven from it with
/// [`DisplayList::replay`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayList {
    pub pages: Vec<Vec<DrawOp>>,
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayList {
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text runs in drawing order as `(page index, text, x, y)`.
    pub fn texts(&self) -> impl Iterator<Item = (usize, &str, f32, f32)> + '_ {
        self.pages.iter().enumerate().flat_map(|(pi, ops)| {
            ops.iter().filter_map(move |op| match op {
                DrawOp::Text { text, x, y, .. } => Some((pi, text.as_str(), *x, *y)),
                _ => None,
            })
        })
    }

    /// Locate the first text run equal to `needle`.
    pub fn find_text(&self, needle: &str) -> Option<(usize, f32, f32)> {
        self.texts()
            .find(|(_, t, _, _)| *t == needle)
            .map(|(p, _, x, y)| (p, x, y))
    }

    pub fn replay<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), Error> {
        for (pi, ops) in self.pages.iter().enumerate() {
            if pi > 0 {
                surface.add_page()?;
            }
            for op in ops {
                match op {
                    DrawOp::SetFont { style, size } => surface.set_font(*style, *size)?,
                    DrawOp::SetColor { color } => surface.set_color(*color)?,
                    DrawOp::Text { text, x, y, align } => surface.draw_text(text, *x, *y, *align)?,
                    DrawOp::Line {
                        from,
                        to,
                        width,
                        color,
                    } => surface.draw_line(*from, *to, *width, *color)?,
                    DrawOp::Rect { x, y, w, h, color } => {
                        surface.fill_rect(*x, *y, *w, *h, *color)?
                    }
                    DrawOp::Circle { cx, cy, r, color } => {
                        surface.fill_circle(*cx, *cy, *r, *color)?
                    }
                }
            }
        }
        Ok(())
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.push(op);
        }
    }
}

impl Surface for DisplayList {
    fn set_font(&mut self, style: FontStyle, size: f32) -> Result<(), Error> {
        self.push(DrawOp::SetFont { style, size });
        Ok(())
    }

    fn set_color(&mut self, color: Color) -> Result<(), Error> {
        self.push(DrawOp::SetColor { color });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, align: TextAlign) -> Result<(), Error> {
        self.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            align,
        });
        Ok(())
    }

    fn draw_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Color,
    ) -> Result<(), Error> {
        self.push(DrawOp::Line {
            from,
            to,
            width,
            color,
        });
        Ok(())
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) -> Result<(), Error> {
        self.push(DrawOp::Rect { x, y, w, h, color });
        Ok(())
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color) -> Result<(), Error> {
        self.push(DrawOp::Circle { cx, cy, r, color });
        Ok(())
    }

    fn add_page(&mut self) -> Result<(), Error> {
        self.pages.push(Vec::new());
        Ok(())
    }
}
