//! Calendar arithmetic for lease terms.
//!
//! Year spans use a fixed 365-day year with no leap-year adjustment, so a
//! 15-year lease spanning three leap days reads as ~15.005 years.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::error::Error;

pub const DAYS_PER_YEAR: f64 = 365.0;

/// `(b - a) / 365 days`. Negative when `b` precedes `a`.
pub fn years_between(a: NaiveDate, b: NaiveDate) -> f64 {
    (b - a).num_days() as f64 / DAYS_PER_YEAR
}

/// Longest span of renewal terms a lease may carry, in whole years.
pub const MAX_RENEWAL_YEARS: u64 = 1000;

/// Advance the calendar year of `base` by whole years.
///
/// A 29 February that does not exist in the target year rolls over to
/// 1 March rather than being clamped back to the 28th. Returns `None` when the
/// target year is outside the supported calendar.
pub fn add_years(base: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = base.year().checked_add(years)?;
    NaiveDate::from_ymd_opt(year, base.month(), base.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

pub fn check_date_order(start: NaiveDate, expiry: NaiveDate) -> Result<(), Error> {
    if expiry <= start {
        return Err(Error::InvalidDateOrder { start, expiry });
    }
    Ok(())
}

/// Length of the primary term; fails when the expiry does not follow the start.
pub fn primary_term_years(start: NaiveDate, expiry: NaiveDate) -> Result<f64, Error> {
    check_date_order(start, expiry)?;
    Ok(years_between(start, expiry))
}

/// Years from the UTC calendar date of `now` to `expiry`.
pub fn years_remaining(now: DateTime<Utc>, expiry: NaiveDate) -> f64 {
    years_between(now.date_naive(), expiry)
}
