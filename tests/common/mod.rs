#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use lease_abstract::fonts::FontStyle;
use lease_abstract::report::compose_report;
use lease_abstract::surface::{Color, DisplayList, Surface, TextAlign};
use lease_abstract::{Error, LeaseSnapshot, snapshot};

pub const FIXTURE: &[u8] = include_bytes!("../fixtures/lease.json");

pub fn sample_snapshot() -> LeaseSnapshot {
    snapshot::parse_bytes(FIXTURE).expect("fixture parses")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Fixed clock for deterministic output.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
}

pub fn render_list(snapshot: &LeaseSnapshot, now: DateTime<Utc>) -> DisplayList {
    let mut list = DisplayList::new();
    compose_report(snapshot, now, &mut list).expect("report renders");
    list
}

/// Index of the first text run equal to `needle` in drawing order.
pub fn text_index(list: &DisplayList, needle: &str) -> Option<usize> {
    list.texts().position(|(_, t, _, _)| t == needle)
}

/// Records like a display list but rejects every operation after `budget` of them.
pub struct FailingSurface {
    pub inner: DisplayList,
    budget: usize,
}

impl FailingSurface {
    pub fn new(budget: usize) -> Self {
        Self {
            inner: DisplayList::new(),
            budget,
        }
    }

    fn spend(&mut self) -> Result<(), Error> {
        if self.budget == 0 {
            return Err(Error::BackendUnavailable("export surface closed".into()));
        }
        self.budget -= 1;
        Ok(())
    }
}

impl Surface for FailingSurface {
    fn set_font(&mut self, style: FontStyle, size: f32) -> Result<(), Error> {
        self.spend()?;
        self.inner.set_font(style, size)
    }

    fn set_color(&mut self, color: Color) -> Result<(), Error> {
        self.spend()?;
        self.inner.set_color(color)
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, align: TextAlign) -> Result<(), Error> {
        self.spend()?;
        self.inner.draw_text(text, x, y, align)
    }

    fn draw_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Color,
    ) -> Result<(), Error> {
        self.spend()?;
        self.inner.draw_line(from, to, width, color)
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) -> Result<(), Error> {
        self.spend()?;
        self.inner.fill_rect(x, y, w, h, color)
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color) -> Result<(), Error> {
        self.spend()?;
        self.inner.fill_circle(cx, cy, r, color)
    }

    fn add_page(&mut self) -> Result<(), Error> {
        self.spend()?;
        self.inner.add_page()
    }
}
