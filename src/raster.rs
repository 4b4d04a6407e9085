//! Single-page raster backend used for the static timeline image.

use std::io::Cursor;
use std::sync::OnceLock;

use fontdue::{Font, FontSettings};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::Error;
use crate::fonts::FontStyle;
use crate::surface::{Color, DisplayList, Surface, TextAlign};

/// DejaVu Sans, used for every raster label regardless of the requested style.
const LABEL_FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

static LABEL_FONT: OnceLock<Result<Font, String>> = OnceLock::new();

fn label_font() -> Result<&'static Font, Error> {
    LABEL_FONT
        .get_or_init(|| {
            Font::from_bytes(LABEL_FONT_BYTES, FontSettings::default()).map_err(str::to_string)
        })
        .as_ref()
        .map_err(|e| Error::BackendUnavailable(format!("label font failed to load: {e}")))
}

/// Paints shapes and text into an RGBA buffer, one surface unit per pixel.
/// Font sizes are taken as pixel heights.
pub struct RasterSurface {
    image: RgbaImage,
    font: &'static Font,
    font_size: f32,
    text_color: Color,
}

fn rgba(color: Color) -> Rgba<u8> {
    Rgba([color.0, color.1, color.2, 255])
}

fn blend(dst: Rgba<u8>, color: Color, alpha: f32) -> Rgba<u8> {
    let mix = |bg: u8, fg: u8| (bg as f32 * (1.0 - alpha) + fg as f32 * alpha).round() as u8;
    Rgba([
        mix(dst.0[0], color.0),
        mix(dst.0[1], color.1),
        mix(dst.0[2], color.2),
        255,
    ])
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, Error> {
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, rgba(Color::WHITE)),
            font: label_font()?,
            font_size: 12.0,
            text_color: Color::BLACK,
        })
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| Error::BackendUnavailable(format!("PNG encoding failed: {e}")))?;
        Ok(buf)
    }

    /// Advance width of `text` in pixels at the current font size.
    pub fn measure_text(&self, text: &str) -> f32 {
        text.chars()
            .map(|ch| self.font.metrics(ch, self.font_size).advance_width)
            .sum()
    }

    /// Set every pixel whose center satisfies `inside`, within the clipped box.
    fn fill_where(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        color: Color,
        inside: impl Fn(f32, f32) -> bool,
    ) {
        let (w, h) = self.image.dimensions();
        let px0 = x0.floor().max(0.0) as u32;
        let py0 = y0.floor().max(0.0) as u32;
        let px1 = (x1.ceil().max(0.0) as u32).min(w);
        let py1 = (y1.ceil().max(0.0) as u32).min(h);
        let pixel = rgba(color);
        for py in py0..py1 {
            for px in px0..px1 {
                if inside(px as f32 + 0.5, py as f32 + 0.5) {
                    self.image.put_pixel(px, py, pixel);
                }
            }
        }
    }
}

impl Surface for RasterSurface {
    fn set_font(&mut self, _style: FontStyle, size: f32) -> Result<(), Error> {
        self.font_size = size;
        Ok(())
    }

    fn set_color(&mut self, color: Color) -> Result<(), Error> {
        self.text_color = color;
        Ok(())
    }

    /// Coverage-blended glyphs with `y` as the baseline.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, align: TextAlign) -> Result<(), Error> {
        let width = self.measure_text(text);
        let mut pen_x = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
            TextAlign::Right => x - width,
        };
        let (img_w, img_h) = self.image.dimensions();
        for ch in text.chars() {
            let (metrics, bitmap) = self.font.rasterize(ch, self.font_size);
            let left = pen_x.round() as i64 + metrics.xmin as i64;
            let top = (y - metrics.height as f32 - metrics.ymin as f32).round() as i64;
            for (i, &coverage) in bitmap.iter().enumerate() {
                if coverage == 0 {
                    continue;
                }
                let px = left + (i % metrics.width) as i64;
                let py = top + (i / metrics.width) as i64;
                if px < 0 || py < 0 || px >= img_w as i64 || py >= img_h as i64 {
                    continue;
                }
                let (px, py) = (px as u32, py as u32);
                let blended = blend(
                    *self.image.get_pixel(px, py),
                    self.text_color,
                    coverage as f32 / 255.0,
                );
                self.image.put_pixel(px, py, blended);
            }
            pen_x += metrics.advance_width;
        }
        log::trace!("raster: text {text:?} at ({x:.1}, {y:.1}), {width:.1}px wide");
        Ok(())
    }

    /// Butt-capped stroke of `width` centred on the segment.
    fn draw_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Color,
    ) -> Result<(), Error> {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return Ok(());
        }
        let half = width / 2.0;
        let inside = |x: f32, y: f32| {
            let t = ((x - from.0) * dx + (y - from.1) * dy) / len_sq;
            if !(0.0..=1.0).contains(&t) {
                return false;
            }
            let cx = from.0 + t * dx - x;
            let cy = from.1 + t * dy - y;
            cx * cx + cy * cy <= half * half
        };
        self.fill_where(
            from.0.min(to.0) - half,
            from.1.min(to.1) - half,
            from.0.max(to.0) + half,
            from.1.max(to.1) + half,
            color,
            inside,
        );
        Ok(())
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) -> Result<(), Error> {
        self.fill_where(x, y, x + w, y + h, color, |px, py| {
            px >= x && px <= x + w && py >= y && py <= y + h
        });
        Ok(())
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color) -> Result<(), Error> {
        self.fill_where(cx - r, cy - r, cx + r, cy + r, color, |px, py| {
            let (dx, dy) = (px - cx, py - cy);
            dx * dx + dy * dy <= r * r
        });
        Ok(())
    }

    fn add_page(&mut self) -> Result<(), Error> {
        Err(Error::BackendUnavailable(
            "raster surface holds a single page".into(),
        ))
    }
}

/// Rasterize a recorded display list into PNG bytes.
pub fn render_png(list: &DisplayList, width: u32, height: u32) -> Result<Vec<u8>, Error> {
    let mut surface = RasterSurface::new(width, height)?;
    list.replay(&mut surface)?;
    surface.encode_png()
}
