pub mod date_math;
mod error;
pub mod fonts;
pub mod model;
pub mod pdf;
pub mod raster;
pub mod report;
pub mod snapshot;
pub mod surface;
pub mod timeline;

pub use error::Error;
pub use model::LeaseSnapshot;
pub use report::cursor::{LayoutCursor, PageGeometry};
pub use surface::{DisplayList, Surface};
pub use timeline::{TimelineAxis, TimelineProjection};

use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};

pub fn render_lease_to_pdf(input: &Path, output: &Path, now: DateTime<Utc>) -> Result<(), Error> {
    let t0 = Instant::now();

    let snapshot = snapshot::parse(input)?;
    let t_parse = t0.elapsed();

    let bytes = pdf::render(&snapshot, now)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_render - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(())
}

/// Render the report for an in-memory JSON snapshot.
pub fn render_lease_bytes_to_pdf(input: &[u8], now: DateTime<Utc>) -> Result<Vec<u8>, Error> {
    let snapshot = snapshot::parse_bytes(input)?;
    pdf::render(&snapshot, now)
}

/// Project the lease timeline and rasterize its static form to PNG.
pub fn render_timeline_png(snapshot: &LeaseSnapshot, axis: TimelineAxis) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();
    let projection = timeline::project_lease(&snapshot.lease, axis)?;
    let list = projection.display_list()?;
    let png = raster::render_png(&list, axis.width.round() as u32, axis.height.round() as u32)?;
    log::info!(
        "Timeline: {} marker(s), {:.0}x{:.0}px, {} bytes in {:.1}ms",
        projection.markers.len(),
        axis.width,
        axis.height,
        png.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    Ok(png)
}
