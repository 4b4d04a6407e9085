mod common;

use chrono::{TimeZone, Utc};

use common::date;
use lease_abstract::Error;
use lease_abstract::date_math::{
    add_years, check_date_order, primary_term_years, years_between, years_remaining,
};

#[test]
fn years_between_uses_fixed_365_day_year() {
    // 2020-06-01 .. 2035-05-31 is 5477 days, including three leap days.
    let years = years_between(date(2020, 6, 1), date(2035, 5, 31));
    assert!((years - 5477.0 / 365.0).abs() < 1e-12, "got {years}");

    let leap_year = years_between(date(2024, 1, 1), date(2025, 1, 1));
    assert!((leap_year - 366.0 / 365.0).abs() < 1e-12);
}

#[test]
fn years_between_is_negative_when_reversed() {
    let years = years_between(date(2035, 5, 31), date(2020, 6, 1));
    assert!(years < 0.0);
    assert_eq!(years, -years_between(date(2020, 6, 1), date(2035, 5, 31)));
}

#[test]
fn add_years_keeps_month_and_day() {
    assert_eq!(add_years(date(2035, 5, 31), 5), Some(date(2040, 5, 31)));
    assert_eq!(add_years(date(2035, 5, 31), 10), Some(date(2045, 5, 31)));
    assert_eq!(add_years(date(2035, 5, 31), 0), Some(date(2035, 5, 31)));
}

#[test]
fn add_years_rolls_missing_leap_day_forward() {
    assert_eq!(add_years(date(2024, 2, 29), 1), Some(date(2025, 3, 1)));
    assert_eq!(add_years(date(2024, 2, 29), 4), Some(date(2028, 2, 29)));
}

#[test]
fn add_years_outside_calendar_is_none() {
    assert_eq!(add_years(date(2035, 5, 31), 300_000), None);
    assert_eq!(add_years(date(2035, 5, 31), i32::MAX), None);
}

#[test]
fn date_order_rejects_expiry_on_or_before_start() {
    assert!(check_date_order(date(2020, 6, 1), date(2035, 5, 31)).is_ok());

    match check_date_order(date(2020, 6, 1), date(2020, 6, 1)) {
        Err(Error::InvalidDateOrder { start, expiry }) => {
            assert_eq!(start, date(2020, 6, 1));
            assert_eq!(expiry, date(2020, 6, 1));
        }
        other => panic!("expected InvalidDateOrder, got {other:?}"),
    }

    assert!(matches!(
        primary_term_years(date(2035, 5, 31), date(2020, 6, 1)),
        Err(Error::InvalidDateOrder { .. })
    ));
}

#[test]
fn remaining_term_counts_from_utc_date_of_now() {
    let now = Utc.with_ymd_and_hms(2025, 1, 15, 23, 59, 59).unwrap();
    let remaining = years_remaining(now, date(2035, 5, 31));
    assert!((remaining - 3788.0 / 365.0).abs() < 1e-12, "got {remaining}");
    assert_eq!(format!("{remaining:.1}"), "10.4");
}

#[test]
fn remaining_term_goes_negative_after_expiry() {
    let now = Utc.with_ymd_and_hms(2036, 1, 1, 0, 0, 0).unwrap();
    let remaining = years_remaining(now, date(2035, 5, 31));
    assert!(remaining < 0.0);
    assert_eq!(format!("{remaining:.1}"), "-0.6");
}
