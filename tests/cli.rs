use std::path::PathBuf;
use std::process::Command;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/lease.json")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir =
        std::env::temp_dir().join(format!("lease-abstract-cli-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lease-abstract"));
    cmd.env("LEASE_ABSTRACT_NOW", "2025-01-15");
    cmd
}

#[test]
fn narrow_timeline_width_is_rejected() {
    let dir = scratch_dir("narrow");
    for width in ["100", "40", "-5"] {
        let out = cli()
            .arg(fixture_path())
            .arg("-o")
            .arg(dir.join("lease.pdf"))
            .arg("--timeline-png")
            .arg(dir.join("timeline.png"))
            .arg(format!("--timeline-width={width}"))
            .output()
            .unwrap();
        assert!(!out.status.success(), "width {width} accepted");
        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(stderr.contains("timeline width"), "stderr: {stderr}");
    }
    assert!(!dir.join("timeline.png").exists());
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn writes_report_and_timeline_outputs() {
    let dir = scratch_dir("outputs");
    let out = cli()
        .arg(fixture_path())
        .arg("-o")
        .arg(dir.join("lease.pdf"))
        .arg("--timeline-png")
        .arg(dir.join("timeline.png"))
        .arg("--timeline-json")
        .arg(dir.join("timeline.json"))
        .arg("--timeline-width=640")
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let pdf = std::fs::read(dir.join("lease.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    let png = image::open(dir.join("timeline.png")).unwrap();
    assert_eq!((png.width(), png.height()), (640, 100));
    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.join("timeline.json")).unwrap()).unwrap();
    assert!(json["pages"][0].as_array().is_some_and(|ops| !ops.is_empty()));

    std::fs::remove_dir_all(&dir).unwrap();
}
