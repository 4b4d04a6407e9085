mod common;

use std::ops::Range;

use image::RgbaImage;

use common::{date, sample_snapshot};
use lease_abstract::model::RenewalOption;
use lease_abstract::surface::DrawOp;
use lease_abstract::timeline::{self, MarkerTier, TimelineLegend};
use lease_abstract::{DisplayList, Error, TimelineAxis};

fn option(term: u32) -> RenewalOption {
    RenewalOption {
        term,
        kind: "Market".into(),
        notice: "12 months".into(),
    }
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

/// Columns in the box holding at least one pixel darkened towards the label grey.
fn inked_columns(image: &RgbaImage, xs: Range<u32>, ys: Range<u32>) -> Vec<u32> {
    xs.filter(|&x| {
        ys.clone().any(|y| {
            let [r, g, b, _] = image.get_pixel(x, y).0;
            r < 0xE0 && g < 0xE0 && b < 0xE0 && b >= r
        })
    })
    .collect()
}

#[test]
fn renewals_stack_after_primary_term() {
    let lease = sample_snapshot().lease;
    let projection = timeline::project_lease(&lease, TimelineAxis::default()).unwrap();

    let primary = 5477.0 / 365.0;
    assert!((projection.primary_term_years - primary).abs() < 1e-9);
    assert!((projection.total_years - (primary + 10.0)).abs() < 1e-9);

    let labels: Vec<&str> = projection.markers.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(labels, ["Start", "Expiry", "Option 1", "Option 2"]);

    let option1 = &projection.markers[2];
    assert!((option1.offset_years - (primary + 5.0)).abs() < 1e-9);
    assert_eq!(option1.date, date(2040, 5, 31));
    assert_eq!(option1.date_label, "May 2040");
    assert_eq!(option1.tier, MarkerTier::Renewal);

    let option2 = &projection.markers[3];
    assert!((option2.offset_years - (primary + 10.0)).abs() < 1e-9);
    assert_eq!(option2.date, date(2045, 5, 31));
    assert_eq!(option2.date_label, "May 2045");

    assert_eq!(projection.markers[0].date_label, "Jun 2020");
    assert_eq!(projection.markers[1].date_label, "May 2035");
}

#[test]
fn markers_are_proportional_to_elapsed_years() {
    let lease = sample_snapshot().lease;
    let projection = timeline::project_lease(&lease, TimelineAxis::default()).unwrap();

    let total = projection.total_years;
    for marker in &projection.markers {
        let expected = 50.0 + (marker.offset_years / total * 700.0) as f32;
        assert!(close(marker.x, expected), "{} at {}", marker.label, marker.x);
    }
    assert!(close(projection.markers[0].x, 50.0));
    assert!(close(projection.markers[3].x, 750.0));
    assert!(projection.markers.windows(2).all(|w| w[0].x < w[1].x));

    let covered: f32 = projection.segments.iter().map(|s| s.length()).sum();
    assert!(close(covered, 700.0), "segments cover {covered}");
    for pair in projection.segments.windows(2) {
        assert!(close(pair[0].x_end, pair[1].x_start));
    }
}

#[test]
fn no_renewals_spans_whole_axis_with_primary_term() {
    let projection =
        timeline::project(date(2020, 6, 1), date(2035, 5, 31), &[], TimelineAxis::default())
            .unwrap();

    assert_eq!(projection.segments.len(), 1);
    let segment = &projection.segments[0];
    assert_eq!(segment.tier, MarkerTier::Primary);
    assert!(close(segment.x_start, 50.0));
    assert!(close(segment.x_end, 750.0));
    assert_eq!(projection.markers.len(), 2);
    assert!(projection.markers.iter().all(|m| m.tier == MarkerTier::Primary));
}

#[test]
fn renewal_dates_use_cumulative_terms() {
    let projection = timeline::project(
        date(2020, 6, 1),
        date(2030, 5, 31),
        &[option(3), option(7)],
        TimelineAxis::default(),
    )
    .unwrap();

    assert_eq!(projection.markers[2].date, date(2033, 5, 31));
    assert_eq!(projection.markers[3].date, date(2040, 5, 31));
    assert_eq!(
        projection.legend(),
        TimelineLegend {
            primary_years: 10,
            renewal_years: 10,
        }
    );
}

#[test]
fn renewal_from_leap_day_expiry_rolls_to_march() {
    let projection = timeline::project(
        date(2020, 3, 1),
        date(2024, 2, 29),
        &[option(1)],
        TimelineAxis::default(),
    )
    .unwrap();
    assert_eq!(projection.markers[2].date, date(2025, 3, 1));
    assert_eq!(projection.markers[2].date_label, "Mar 2025");
}

#[test]
fn zero_length_timeline_is_rejected() {
    let err = timeline::project(date(2020, 6, 1), date(2020, 6, 1), &[], TimelineAxis::default())
        .unwrap_err();
    assert!(matches!(err, Error::DegenerateTimeline { .. }), "got {err:?}");

    let err = timeline::project(
        date(2020, 6, 1),
        date(2020, 6, 1),
        &[option(5)],
        TimelineAxis::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidDateOrder { .. }), "got {err:?}");
}

#[test]
fn renewals_past_the_calendar_are_rejected() {
    let err = timeline::project(
        date(2020, 6, 1),
        date(2035, 5, 31),
        &[option(300_000)],
        TimelineAxis::default(),
    )
    .unwrap_err();
    assert!(
        matches!(&err, Error::InvalidSnapshot(msg) if msg.contains("Option 1")),
        "got {err:?}"
    );

    let err = timeline::project(
        date(2020, 6, 1),
        date(2035, 5, 31),
        &[option(3_000_000_000), option(3_000_000_000)],
        TimelineAxis::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidSnapshot(_)), "got {err:?}");
}

#[test]
fn axis_without_room_is_rejected() {
    let lease = sample_snapshot().lease;
    for width in [100.0, 60.0, 0.0] {
        let err = timeline::project_lease(&lease, TimelineAxis::with_width(width)).unwrap_err();
        assert!(matches!(err, Error::InvalidAxis { .. }), "width {width}: {err:?}");
    }
    assert!(timeline::project_lease(&lease, TimelineAxis::with_width(101.0)).is_ok());
}

#[test]
fn legend_reports_rounded_primary_and_renewal_years() {
    let lease = sample_snapshot().lease;
    let projection = timeline::project_lease(&lease, TimelineAxis::default()).unwrap();
    assert_eq!(
        projection.legend(),
        TimelineLegend {
            primary_years: 15,
            renewal_years: 10,
        }
    );
}

#[test]
fn axis_follows_requested_width() {
    let lease = sample_snapshot().lease;
    let axis = TimelineAxis::with_width(1200.0);
    let projection = timeline::project_lease(&lease, axis).unwrap();

    assert!(close(projection.markers[0].x, 50.0));
    assert!(close(projection.markers[3].x, 1150.0));
}

#[test]
fn display_list_carries_labels_and_serializes() {
    let lease = sample_snapshot().lease;
    let list = timeline::project_lease(&lease, TimelineAxis::default())
        .unwrap()
        .display_list()
        .unwrap();

    assert_eq!(list.page_count(), 1);
    assert!(matches!(list.pages[0][0], DrawOp::Rect { .. }));
    for label in ["Start", "Expiry", "Option 1", "Option 2", "Jun 2020", "May 2045"] {
        assert!(list.find_text(label).is_some(), "missing {label}");
    }
    let circles = list.pages[0]
        .iter()
        .filter(|op| matches!(op, DrawOp::Circle { .. }))
        .count();
    assert_eq!(circles, 4);

    let json = serde_json::to_value(&list).unwrap();
    assert_eq!(json["pages"][0][0]["op"], "rect");
    let decoded: DisplayList = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, list);
}

#[test]
fn static_image_matches_display_list_shapes() {
    let snapshot = sample_snapshot();
    let png = lease_abstract::render_timeline_png(&snapshot, TimelineAxis::default()).unwrap();
    let again = lease_abstract::render_timeline_png(&snapshot, TimelineAxis::default()).unwrap();
    assert_eq!(png, again, "rasterization is deterministic");

    let image = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (800, 100));

    // Background, start marker (primary) and last renewal marker.
    assert_eq!(image.get_pixel(5, 5).0, [0xF9, 0xFA, 0xFB, 255]);
    assert_eq!(image.get_pixel(50, 50).0, [0x4F, 0x46, 0xE5, 255]);
    assert_eq!(image.get_pixel(749, 50).0, [0x9C, 0xA3, 0xAF, 255]);
    // On the primary segment, clear of any marker.
    assert_eq!(image.get_pixel(200, 52).0, [0x4F, 0x46, 0xE5, 255]);

    // "Jun 2020" above and "Start" below the first marker, centred on x = 50.
    for rows in [14..34, 66..84] {
        let inked = inked_columns(&image, 10..90, rows.clone());
        assert!(inked.len() > 10, "rows {rows:?}: {inked:?}");
        let (first, last) = (inked[0], inked[inked.len() - 1]);
        assert!(first < 50 && last > 50, "rows {rows:?} span {first}..={last}");
        assert!((first + last).abs_diff(100) <= 6, "rows {rows:?} span {first}..={last}");
    }
    assert!(inked_columns(&image, 250..300, 66..84).is_empty());
}
