use chrono::{DateTime, Datelike, Timelike, Utc};
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::error::Error;
use crate::fonts::{FontStyle, MM_PER_PT, register_standard_fonts, text_width, to_winansi_bytes};
use crate::model::LeaseSnapshot;
use crate::report::cursor::PageGeometry;
use crate::report::{DOCUMENT_TITLE, ReportComposer};
use crate::surface::{Color, Surface, TextAlign};

/// Control-point distance for approximating a quarter circle with a cubic Bézier.
const KAPPA: f32 = 0.552_284_8;

const PRODUCER: &str = concat!("lease-abstract ", env!("CARGO_PKG_VERSION"));

/// Metadata written to the document information dictionary.
pub struct DocumentInfo {
    pub title: String,
    pub created: DateTime<Utc>,
}

/// A [`Surface`] that accumulates one content stream per page and assembles a
/// PDF on [`PdfSurface::finish`]. Layout coordinates are millimetres measured
/// from the top-left corner; they are flipped into PDF user space here.
pub struct PdfSurface {
    geometry: PageGeometry,
    pages: Vec<Content>,
    font: (FontStyle, f32),
    text_color: Color,
}

impl PdfSurface {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Content::new()],
            font: (FontStyle::Normal, 10.0),
            text_color: Color::BLACK,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn pt(mm: f32) -> f32 {
        mm / MM_PER_PT
    }

    fn pdf_y(&self, y_mm: f32) -> f32 {
        Self::pt(self.geometry.page_height - y_mm)
    }

    fn content(&mut self) -> Result<&mut Content, Error> {
        self.pages
            .last_mut()
            .ok_or_else(|| Error::BackendUnavailable("PDF surface has no open page".into()))
    }

    pub fn finish(self, info: &DocumentInfo) -> Vec<u8> {
        let t0 = std::time::Instant::now();
        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let info_id = alloc();
        let font_pairs = register_standard_fonts(&mut pdf, &mut alloc);

        let n = self.pages.len();
        let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

        for (i, c) in self.pages.into_iter().enumerate() {
            let raw = c.finish();
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
            pdf.stream(content_ids[i], &compressed)
                .filter(Filter::FlateDecode);
        }

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);

        let media_box = Rect::new(
            0.0,
            0.0,
            Self::pt(self.geometry.page_width),
            Self::pt(self.geometry.page_height),
        );
        for i in 0..n {
            let mut page = pdf.page(page_ids[i]);
            page.media_box(media_box)
                .parent(pages_id)
                .contents(content_ids[i]);
            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            for (name, font_ref) in &font_pairs {
                fonts.pair(Name(name.as_bytes()), *font_ref);
            }
        }

        let created = info.created;
        let date = Date::new(created.year() as u16)
            .month(created.month() as u8)
            .day(created.day() as u8)
            .hour(created.hour() as u8)
            .minute(created.minute() as u8)
            .second(created.second() as u8)
            .utc_offset_hour(0);
        pdf.document_info(info_id)
            .title(TextStr(&info.title))
            .producer(TextStr(PRODUCER))
            .creation_date(date);

        let bytes = pdf.finish();
        log::debug!(
            "PDF assembly: {} page(s), {} bytes in {:.1}ms",
            n,
            bytes.len(),
            t0.elapsed().as_secs_f64() * 1000.0
        );
        bytes
    }
}

impl Surface for PdfSurface {
    fn set_font(&mut self, style: FontStyle, size: f32) -> Result<(), Error> {
        self.font = (style, size);
        Ok(())
    }

    fn set_color(&mut self, color: Color) -> Result<(), Error> {
        self.text_color = color;
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, align: TextAlign) -> Result<(), Error> {
        if text.is_empty() {
            return Ok(());
        }
        let (style, size) = self.font;
        let width = text_width(text, style, size);
        let x = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
            TextAlign::Right => x - width,
        };
        let (px, py) = (Self::pt(x), self.pdf_y(y));
        let (r, g, b) = self.text_color.unit_rgb();
        let bytes = to_winansi_bytes(text);

        let content = self.content()?;
        content.begin_text();
        content.set_font(Name(style.resource_name().as_bytes()), size);
        content.set_fill_rgb(r, g, b);
        content.next_line(px, py);
        content.show(Str(&bytes));
        content.end_text();
        Ok(())
    }

    fn draw_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Color,
    ) -> Result<(), Error> {
        let (x1, y1) = (Self::pt(from.0), self.pdf_y(from.1));
        let (x2, y2) = (Self::pt(to.0), self.pdf_y(to.1));
        let (r, g, b) = color.unit_rgb();

        let content = self.content()?;
        content.save_state();
        content.set_line_width(Self::pt(width));
        content.set_stroke_rgb(r, g, b);
        content.move_to(x1, y1);
        content.line_to(x2, y2);
        content.stroke();
        content.restore_state();
        Ok(())
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) -> Result<(), Error> {
        let (px, py) = (Self::pt(x), self.pdf_y(y + h));
        let (r, g, b) = color.unit_rgb();

        let content = self.content()?;
        content.save_state();
        content.set_fill_rgb(r, g, b);
        content.rect(px, py, Self::pt(w), Self::pt(h));
        content.fill_nonzero();
        content.restore_state();
        Ok(())
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color) -> Result<(), Error> {
        let (x, y, r) = (Self::pt(cx), self.pdf_y(cy), Self::pt(r));
        let k = r * KAPPA;
        let (cr, cg, cb) = color.unit_rgb();

        let content = self.content()?;
        content.save_state();
        content.set_fill_rgb(cr, cg, cb);
        content.move_to(x + r, y);
        content.cubic_to(x + r, y + k, x + k, y + r, x, y + r);
        content.cubic_to(x - k, y + r, x - r, y + k, x - r, y);
        content.cubic_to(x - r, y - k, x - k, y - r, x, y - r);
        content.cubic_to(x + k, y - r, x + r, y - k, x + r, y);
        content.close_path();
        content.fill_nonzero();
        content.restore_state();
        Ok(())
    }

    fn add_page(&mut self) -> Result<(), Error> {
        self.pages.push(Content::new());
        Ok(())
    }
}

/// Lay out the lease summary for `snapshot` and return the finished PDF.
/// Nothing is returned unless every section rendered.
pub fn render(snapshot: &LeaseSnapshot, now: DateTime<Utc>) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let geometry = PageGeometry::a4();
    let mut surface = PdfSurface::new(geometry);

    let summary = ReportComposer::new(snapshot, now, geometry, &mut surface).compose()?;
    let t_layout = t0.elapsed();

    let bytes = surface.finish(&DocumentInfo {
        title: format!("{DOCUMENT_TITLE} - {}", snapshot.tenant.name),
        created: now,
    });
    let t_assembly = t0.elapsed();

    log::info!(
        "Render phases: layout={:.1}ms, assembly={:.1}ms ({} page(s))",
        t_layout.as_secs_f64() * 1000.0,
        (t_assembly - t_layout).as_secs_f64() * 1000.0,
        summary.pages,
    );

    Ok(bytes)
}
