mod output;
mod sweep;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "placegrid")]
#[command(about = "Sweep a named area with a grid of nearby-place searches")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve an area, search every grid tile, enrich, and write CSV
    Sweep {
        /// Area name to geocode, e.g. "Taichung"
        #[arg(long, env = "PLACEGRID_PLACE")]
        place: String,
        /// Search radius per tile, in meters
        #[arg(long, env = "PLACEGRID_RADIUS_M", default_value_t = 1500)]
        radius: u32,
        /// Grid step multiplier, strictly between 0 and 1
        #[arg(long, env = "PLACEGRID_OVERLAP", default_value_t = 0.6)]
        overlap: f64,
        #[arg(long, env = "PLACEGRID_LANGUAGE", default_value = "zh-TW")]
        lang: String,
        #[arg(long, env = "PLACEGRID_REGION", default_value = "tw")]
        region: String,
        /// Upstream place type to search for
        #[arg(long, env = "PLACEGRID_CATEGORY", default_value = "cafe")]
        category: String,
        #[arg(long, env = "PLACEGRID_OUT", default_value = "places.csv")]
        out: PathBuf,
        /// Resolve the area and plan the grid without searching
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the sample points for a literal rectangle (offline)
    Grid {
        #[arg(long, allow_hyphen_values = true)]
        ne_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        ne_lng: f64,
        #[arg(long, allow_hyphen_values = true)]
        sw_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        sw_lng: f64,
        #[arg(long, default_value_t = 1500)]
        radius: u32,
        #[arg(long, default_value_t = 0.6)]
        overlap: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sweep {
            place,
            radius,
            overlap,
            lang,
            region,
            category,
            out,
            dry_run,
        } => {
            let config = placegrid_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            let request = placegrid_places::SweepRequest {
                place,
                radius_m: radius,
                overlap,
                language: lang,
                region,
                category,
            };
            sweep::run_sweep(&config, &request, &out, dry_run).await?;
        }
        Commands::Grid {
            ne_lat,
            ne_lng,
            sw_lat,
            sw_lng,
            radius,
            overlap,
        } => {
            init_tracing("info")?;
            let northeast = placegrid_core::LatLng::new(ne_lat, ne_lng);
            let southwest = placegrid_core::LatLng::new(sw_lat, sw_lng);
            sweep::print_grid(northeast, southwest, radius, overlap)?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `fallback` (the configured level).
fn init_tracing(fallback: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
