mod common;

use chrono::{Duration, TimeZone, Utc};
use rayon::prelude::*;

use common::{FIXTURE, now, render_list, sample_snapshot};
use lease_abstract::pdf::{self, PdfSurface};
use lease_abstract::report::ReportComposer;
use lease_abstract::{Error, PageGeometry};

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

fn page_objects(pdf: &[u8]) -> usize {
    count(pdf, b"/Type /Page") - count(pdf, b"/Type /Pages")
}

#[test]
fn renders_a_pdf_document() {
    let bytes = pdf::render(&sample_snapshot(), now()).unwrap();

    assert!(bytes.starts_with(b"%PDF-"));
    assert!(bytes.ends_with(b"%%EOF") || bytes.ends_with(b"%%EOF\n"));
    assert_eq!(count(&bytes, b"/Type /Pages"), 1);
    assert_eq!(count(&bytes, b"/Helvetica-Bold"), 1);
    assert_eq!(count(&bytes, b"/Helvetica-Oblique"), 1);
    assert!(count(&bytes, b"(Lease Summary - Amazon)") >= 1);
    assert!(count(&bytes, b"/FlateDecode") >= 1);
}

#[test]
fn pdf_page_count_matches_layout() {
    let snapshot = sample_snapshot();
    let list = render_list(&snapshot, now());

    let mut surface = PdfSurface::new(PageGeometry::a4());
    let summary = ReportComposer::new(&snapshot, now(), PageGeometry::a4(), &mut surface)
        .compose()
        .unwrap();
    assert_eq!(surface.page_count(), list.page_count());
    assert_eq!(summary.pages, list.page_count());

    let bytes = pdf::render(&snapshot, now()).unwrap();
    assert_eq!(page_objects(&bytes), list.page_count());
}

#[test]
fn output_is_byte_identical_for_same_input() {
    let snapshot = sample_snapshot();
    let a = pdf::render(&snapshot, now()).unwrap();
    let b = pdf::render(&snapshot, now()).unwrap();
    assert_eq!(a, b);

    let later = pdf::render(&snapshot, now() + Duration::days(400)).unwrap();
    assert_ne!(a, later, "remaining term and footer follow the clock");
}

#[test]
fn concurrent_renders_do_not_interfere() {
    let snapshot = sample_snapshot();
    let clocks: Vec<_> = (0..8)
        .map(|i| Utc.with_ymd_and_hms(2021 + i, 3, 1, 9, 30, 0).unwrap())
        .collect();

    let serial: Vec<Vec<u8>> = clocks
        .iter()
        .map(|&t| pdf::render(&snapshot, t).unwrap())
        .collect();
    let parallel: Vec<Vec<u8>> = clocks
        .par_iter()
        .map(|&t| pdf::render(&snapshot, t).unwrap())
        .collect();

    assert_eq!(serial, parallel);
}

#[test]
fn renders_from_in_memory_json() {
    let from_bytes = lease_abstract::render_lease_bytes_to_pdf(FIXTURE, now()).unwrap();
    let direct = pdf::render(&sample_snapshot(), now()).unwrap();
    assert_eq!(from_bytes, direct);

    let err = lease_abstract::render_lease_bytes_to_pdf(b"{\"tenant\": ", now()).unwrap_err();
    assert!(matches!(err, Error::InvalidSnapshot(_)), "got {err:?}");
}

#[test]
fn writes_pdf_file_from_snapshot_file() {
    let dir = std::env::temp_dir().join(format!("lease-abstract-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("lease.json");
    let output = dir.join("lease.pdf");
    std::fs::write(&input, FIXTURE).unwrap();

    lease_abstract::render_lease_to_pdf(&input, &output, now()).unwrap();
    let written = std::fs::read(&output).unwrap();
    assert_eq!(written, pdf::render(&sample_snapshot(), now()).unwrap());

    let missing = dir.join("missing.json");
    let err = lease_abstract::render_lease_to_pdf(&missing, &output, now()).unwrap_err();
    match err {
        Error::Io(e) => assert!(e.to_string().contains("missing.json")),
        other => panic!("expected Io, got {other:?}"),
    }

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn failed_render_produces_no_document() {
    let mut snapshot = sample_snapshot();
    snapshot.lease.recovery_terms.cam.clear();
    let err = pdf::render(&snapshot, now()).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingRequiredField("lease.recoveryTerms.cam")
    ));
}
