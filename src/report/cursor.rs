use crate::error::Error;
use crate::surface::Surface;

/// Fixed page geometry in layout units (millimetres for the PDF report).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    /// Baseline of the first line on a fresh page.
    pub top: f32,
    /// Lowest `y` a block may extend to.
    pub bottom: f32,
    /// Baseline of the footer on the last page.
    pub footer_y: f32,
}

impl PageGeometry {
    /// A4 portrait.
    pub const fn a4() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 15.0,
            top: 20.0,
            bottom: 280.0,
            footer_y: 285.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reservation {
    /// Where the caller should start drawing.
    pub y: f32,
    pub page_broke: bool,
}

/// Vertical write position for one render pass.
///
/// This is the only place that decides page breaks: a block asks for the
/// height it is about to occupy and draws wherever the cursor says.
#[derive(Debug)]
pub struct LayoutCursor {
    geometry: PageGeometry,
    y: f32,
    page: usize,
}

impl LayoutCursor {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            y: geometry.top,
            page: 0,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    /// Zero-based page index.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn at_page_top(&self) -> bool {
        self.y <= self.geometry.top
    }

    pub fn would_overflow(&self, height: f32) -> bool {
        self.y + height > self.geometry.bottom
    }

    /// Make room for a block of `height`, breaking to a new page first when it
    /// would cross the bottom bound. A cursor already sitting at the top of a
    /// page never breaks again; the block simply overruns.
    pub fn reserve<S: Surface + ?Sized>(
        &mut self,
        height: f32,
        surface: &mut S,
    ) -> Result<Reservation, Error> {
        let height = height.max(0.0);
        if self.would_overflow(height) && !self.at_page_top() {
            surface.add_page()?;
            self.page += 1;
            log::debug!(
                "page break: block of {height:.1} did not fit at y={:.1}, now on page {}",
                self.y,
                self.page + 1
            );
            self.y = self.geometry.top;
            return Ok(Reservation {
                y: self.y,
                page_broke: true,
            });
        }
        Ok(Reservation {
            y: self.y,
            page_broke: false,
        })
    }

    /// Break now if the next `height` units would not fit, without claiming them.
    pub fn keep_with_next<S: Surface + ?Sized>(
        &mut self,
        height: f32,
        surface: &mut S,
    ) -> Result<bool, Error> {
        self.reserve(height, surface).map(|r| r.page_broke)
    }

    pub fn advance(&mut self, height: f32) {
        self.y += height.max(0.0);
    }

    /// Move to an absolute `y` on the current page; never moves backwards.
    pub fn advance_to(&mut self, y: f32) {
        self.y = self.y.max(y);
    }
}
