//! Proportional lease timeline: the primary term followed by each renewal
//! option, laid out on a fixed-width axis.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_math::{add_years, years_between};
use crate::error::Error;
use crate::fonts::FontStyle;
use crate::model::{Lease, RenewalOption};
use crate::surface::{Color, DisplayList, Surface, TextAlign};

const BACKGROUND: Color = Color::hex(0xF9FAFB);
const RAIL: Color = Color::hex(0xE5E7EB);
const PRIMARY: Color = Color::hex(0x4F46E5);
const RENEWAL: Color = Color::hex(0x9CA3AF);
const LABEL: Color = Color::hex(0x6B7280);
const RAIL_WIDTH: f32 = 4.0;
const SEGMENT_WIDTH: f32 = 8.0;
const MARKER_RADIUS: f32 = 8.0;
const LABEL_SIZE: f32 = 12.0;
const DATE_LABEL_OFFSET: f32 = -20.0;
const NAME_LABEL_OFFSET: f32 = 30.0;

/// Drawing area for the timeline, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineAxis {
    pub width: f32,
    pub height: f32,
    /// Horizontal inset of the axis from both edges.
    pub padding: f32,
}

impl Default for TimelineAxis {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 100.0,
            padding: 50.0,
        }
    }
}

impl TimelineAxis {
    pub fn with_width(width: f32) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    pub fn start(&self) -> f32 {
        self.padding
    }

    pub fn end(&self) -> f32 {
        self.width - self.padding
    }

    pub fn length(&self) -> f32 {
        self.end() - self.start()
    }

    pub fn center_y(&self) -> f32 {
        self.height / 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerTier {
    Primary,
    Renewal,
}

impl MarkerTier {
    fn color(self) -> Color {
        match self {
            MarkerTier::Primary => PRIMARY,
            MarkerTier::Renewal => RENEWAL,
        }
    }
}

/// One span of the timeline, in years from the lease start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineInterval {
    pub label: String,
    pub start_offset_years: f64,
    pub duration_years: f64,
    pub is_primary: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineSegment {
    pub x_start: f32,
    pub x_end: f32,
    pub tier: MarkerTier,
}

impl TimelineSegment {
    pub fn length(&self) -> f32 {
        self.x_end - self.x_start
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineMarker {
    pub x: f32,
    pub offset_years: f64,
    pub label: String,
    pub date: NaiveDate,
    /// `Mon YYYY`.
    pub date_label: String,
    pub tier: MarkerTier,
}

/// Figures shown next to the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineLegend {
    /// Primary term rounded to whole years.
    pub primary_years: i64,
    pub renewal_years: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineProjection {
    pub axis: TimelineAxis,
    pub primary_term_years: f64,
    pub total_years: f64,
    pub intervals: Vec<TimelineInterval>,
    pub segments: Vec<TimelineSegment>,
    pub markers: Vec<TimelineMarker>,
}

fn month_year(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Project a primary term and its renewal options onto `axis`.
///
/// Renewal option `n` is dated `expiry + (term_1 + ... + term_n)` whole years,
/// i.e. every option stacks additively from the original expiry date.
pub fn project(
    start: NaiveDate,
    expiry: NaiveDate,
    options: &[RenewalOption],
    axis: TimelineAxis,
) -> Result<TimelineProjection, Error> {
    if axis.length() <= 0.0 {
        return Err(Error::InvalidAxis {
            width: axis.width,
            padding: axis.padding,
        });
    }
    let primary = years_between(start, expiry);
    let renewal_years: u64 = options.iter().map(|o| u64::from(o.term)).sum();
    let total = primary + renewal_years as f64;
    if total <= 0.0 {
        return Err(Error::DegenerateTimeline { total_years: total });
    }
    if primary <= 0.0 {
        return Err(Error::InvalidDateOrder { start, expiry });
    }

    let axis_start = axis.start() as f64;
    let axis_len = axis.length() as f64;
    let to_x = |offset_years: f64| (axis_start + offset_years / total * axis_len) as f32;

    let mut intervals = Vec::with_capacity(options.len() + 1);
    let mut segments = Vec::with_capacity(options.len() + 1);
    let mut markers = Vec::with_capacity(options.len() + 2);

    intervals.push(TimelineInterval {
        label: "Primary Term".to_string(),
        start_offset_years: 0.0,
        duration_years: primary,
        is_primary: true,
    });
    segments.push(TimelineSegment {
        x_start: to_x(0.0),
        x_end: to_x(primary),
        tier: MarkerTier::Primary,
    });
    markers.push(TimelineMarker {
        x: to_x(0.0),
        offset_years: 0.0,
        label: "Start".to_string(),
        date: start,
        date_label: month_year(start),
        tier: MarkerTier::Primary,
    });
    markers.push(TimelineMarker {
        x: to_x(primary),
        offset_years: primary,
        label: "Expiry".to_string(),
        date: expiry,
        date_label: month_year(expiry),
        tier: MarkerTier::Primary,
    });

    let mut offset = primary;
    let mut stacked_years: u64 = 0;
    for (i, option) in options.iter().enumerate() {
        let label = format!("Option {}", i + 1);
        let duration = option.term as f64;
        stacked_years += u64::from(option.term);
        let date = i32::try_from(stacked_years)
            .ok()
            .and_then(|years| add_years(expiry, years))
            .ok_or_else(|| {
                Error::InvalidSnapshot(format!(
                    "{label} ends {stacked_years} years after {expiry}, past the calendar"
                ))
            })?;

        intervals.push(TimelineInterval {
            label: label.clone(),
            start_offset_years: offset,
            duration_years: duration,
            is_primary: false,
        });
        segments.push(TimelineSegment {
            x_start: to_x(offset),
            x_end: to_x(offset + duration),
            tier: MarkerTier::Renewal,
        });
        offset += duration;
        markers.push(TimelineMarker {
            x: to_x(offset),
            offset_years: offset,
            label,
            date,
            date_label: month_year(date),
            tier: MarkerTier::Renewal,
        });
    }

    log::debug!(
        "timeline: primary={:.3}y renewals={}y total={:.3}y over {:.0}px",
        primary,
        renewal_years,
        total,
        axis.length()
    );

    Ok(TimelineProjection {
        axis,
        primary_term_years: primary,
        total_years: total,
        intervals,
        segments,
        markers,
    })
}

pub fn project_lease(lease: &Lease, axis: TimelineAxis) -> Result<TimelineProjection, Error> {
    project(
        lease.start_date,
        lease.expiry_date,
        &lease.renewal_options,
        axis,
    )
}

impl TimelineProjection {
    pub fn legend(&self) -> TimelineLegend {
        TimelineLegend {
            primary_years: self.primary_term_years.round() as i64,
            renewal_years: self
                .intervals
                .iter()
                .filter(|i| !i.is_primary)
                .map(|i| i.duration_years as u32)
                .sum(),
        }
    }

    /// Paint the timeline: background, rail, segments, markers, then labels.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), Error> {
        let axis = &self.axis;
        let y = axis.center_y();

        surface.fill_rect(0.0, 0.0, axis.width, axis.height, BACKGROUND)?;
        surface.draw_line((axis.start(), y), (axis.end(), y), RAIL_WIDTH, RAIL)?;
        for segment in &self.segments {
            surface.draw_line(
                (segment.x_start, y),
                (segment.x_end, y),
                SEGMENT_WIDTH,
                segment.tier.color(),
            )?;
        }
        for marker in &self.markers {
            surface.fill_circle(marker.x, y, MARKER_RADIUS, marker.tier.color())?;
        }

        surface.set_font(FontStyle::Normal, LABEL_SIZE)?;
        surface.set_color(LABEL)?;
        for marker in &self.markers {
            surface.draw_text(
                &marker.date_label,
                marker.x,
                y + DATE_LABEL_OFFSET,
                TextAlign::Center,
            )?;
            surface.draw_text(
                &marker.label,
                marker.x,
                y + NAME_LABEL_OFFSET,
                TextAlign::Center,
            )?;
        }
        Ok(())
    }

    /// The interactive form: a recorded, serialisable list of draw operations.
    pub fn display_list(&self) -> Result<DisplayList, Error> {
        let mut list = DisplayList::new();
        self.draw(&mut list)?;
        Ok(list)
    }
}
