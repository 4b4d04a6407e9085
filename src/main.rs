use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;

use lease_abstract::{Error, TimelineAxis, snapshot, timeline};

/// Render a lease abstract snapshot (JSON) to a PDF summary and timeline.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Lease snapshot in JSON form
    input: PathBuf,

    /// Output PDF path (defaults to the input path with a .pdf extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Timestamp used for "remaining term" and the footer (RFC 3339 or YYYY-MM-DD)
    #[arg(long, env = "LEASE_ABSTRACT_NOW", value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    /// Also write the static timeline image (PNG)
    #[arg(long)]
    timeline_png: Option<PathBuf>,

    /// Also write the timeline display list (JSON) for interactive hosts
    #[arg(long)]
    timeline_json: Option<PathBuf>,

    /// Timeline width in pixels; must leave room between the side paddings
    #[arg(long, default_value_t = 800.0, value_parser = parse_timeline_width)]
    timeline_width: f32,
}

fn parse_now(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = s.parse::<DateTime<Utc>>() {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("expected RFC 3339 timestamp or YYYY-MM-DD, got {s:?}"))
}

fn parse_timeline_width(s: &str) -> Result<f32, String> {
    let width: f32 = s.parse().map_err(|e| format!("{s:?} is not a number: {e}"))?;
    let min = 2.0 * TimelineAxis::default().padding;
    if !width.is_finite() || width <= min {
        return Err(format!("timeline width must be greater than {min}, got {width}"));
    }
    Ok(width)
}

fn run(cli: Cli) -> Result<(), Error> {
    let now = cli.now.unwrap_or_else(Utc::now);
    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension("pdf"));

    lease_abstract::render_lease_to_pdf(&cli.input, &output, now)?;
    println!("Wrote {}", output.display());

    if cli.timeline_png.is_none() && cli.timeline_json.is_none() {
        return Ok(());
    }

    let snapshot = snapshot::parse(&cli.input)?;
    let axis = TimelineAxis::with_width(cli.timeline_width);

    if let Some(path) = cli.timeline_png {
        let png = lease_abstract::render_timeline_png(&snapshot, axis)?;
        std::fs::write(&path, png).map_err(Error::Io)?;
        println!("Wrote {}", path.display());
    }

    if let Some(path) = cli.timeline_json {
        let list = timeline::project_lease(&snapshot.lease, axis)?.display_list()?;
        let json = serde_json::to_vec_pretty(&list)
            .map_err(|e| Error::BackendUnavailable(format!("display list encoding failed: {e}")))?;
        std::fs::write(&path, json).map_err(Error::Io)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
