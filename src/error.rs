use std::fmt;

use chrono::NaiveDate;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// The snapshot could not be decoded or failed validation.
    InvalidSnapshot(String),
    InvalidDateOrder {
        start: NaiveDate,
        expiry: NaiveDate,
    },
    /// Primary term plus renewal terms add up to zero or less.
    DegenerateTimeline {
        total_years: f64,
    },
    MissingRequiredField(&'static str),
    /// The timeline axis leaves no room between its paddings.
    InvalidAxis {
        width: f32,
        padding: f32,
    },
    /// The drawing/export backend refused an operation.
    BackendUnavailable(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidSnapshot(msg) => write!(f, "Invalid lease snapshot: {msg}"),
            Error::InvalidDateOrder { start, expiry } => write!(
                f,
                "Invalid date order: expiry date {expiry} is not after start date {start}"
            ),
            Error::DegenerateTimeline { total_years } => write!(
                f,
                "Degenerate timeline: total duration {total_years:.2} years"
            ),
            Error::MissingRequiredField(field) => write!(f, "Missing required field: {field}"),
            Error::InvalidAxis { width, padding } => write!(
                f,
                "Invalid timeline axis: width {width} must exceed twice the padding {padding}"
            ),
            Error::BackendUnavailable(msg) => write!(f, "Rendering backend unavailable: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}
