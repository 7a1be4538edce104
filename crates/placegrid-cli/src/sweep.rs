//! Command handlers for the CLI.

use std::path::Path;

use anyhow::Context;
use placegrid_core::{build_grid, AppConfig, BoundingBox, LatLng};
use placegrid_places::{PlacesClient, SweepOptions, SweepRequest, Sweeper};

use crate::output;

/// Runs a full sweep and writes the enriched rows to `out`.
///
/// When `dry_run` is `true` the area is resolved and the grid planned, then
/// the function prints the planned search count and returns without
/// searching.
///
/// # Errors
///
/// Any fatal sweep error (resolution, search failure, transport) or a
/// failure writing the output file. Nothing is written on error.
pub(crate) async fn run_sweep(
    config: &AppConfig,
    request: &SweepRequest,
    out: &Path,
    dry_run: bool,
) -> anyhow::Result<()> {
    let client = PlacesClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build places client: {e}"))?;
    let sweeper = Sweeper::new(client, SweepOptions::from_config(config));

    if dry_run {
        let bounds = sweeper.resolve(request).await?;
        let grid = Sweeper::plan(&bounds, request)?;
        println!(
            "dry-run: {} resolves to {} .. {}; grid {} x {} = {} tile searches (up to {} pages each)",
            request.place,
            bounds.southwest,
            bounds.northeast,
            grid.rows(),
            grid.cols(),
            grid.len(),
            config.max_pages,
        );
        return Ok(());
    }

    tracing::info!(
        place = %request.place,
        radius_m = request.radius_m,
        overlap = request.overlap,
        category = %request.category,
        "starting sweep"
    );
    let report = sweeper.run(request).await?;

    let written = output::write_rows(out, &report.rows)
        .with_context(|| format!("failed to write {}", out.display()))?;
    if written {
        println!(
            "swept {} tiles ({} x {}), wrote {} places to {}",
            report.grid_rows * report.grid_cols,
            report.grid_rows,
            report.grid_cols,
            report.rows.len(),
            out.display()
        );
    } else {
        println!("swept {} tiles, no places found", report.grid_rows * report.grid_cols);
    }
    Ok(())
}

/// Prints the sample points for a literal rectangle, one `lat,lng` per line.
///
/// # Errors
///
/// Returns an error if the rectangle is inverted or the radius or overlap
/// is out of range.
pub(crate) fn print_grid(
    northeast: LatLng,
    southwest: LatLng,
    radius_m: u32,
    overlap: f64,
) -> anyhow::Result<()> {
    let center = LatLng::new(
        (northeast.lat + southwest.lat) / 2.0,
        (northeast.lng + southwest.lng) / 2.0,
    );
    let bounds = BoundingBox::new(northeast, southwest, center)?;
    let grid = build_grid(&bounds, f64::from(radius_m), overlap)?;

    println!(
        "# {} rows x {} cols = {} points (step {:.6} lat, {:.6} lng)",
        grid.rows(),
        grid.cols(),
        grid.len(),
        grid.lat_step(),
        grid.lng_step()
    );
    for point in grid.points() {
        println!("{:.6},{:.6}", point.lat, point.lng);
    }
    Ok(())
}
