pub mod app_config;
pub mod config;
pub mod geo;
pub mod grid;
pub mod sweep;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{BoundingBox, LatLng, SamplePoint};
pub use grid::{build_grid, degree_steps_for_radius, Grid};
pub use sweep::{SweepDelays, SweepLimits};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("search radius must be a positive number of meters, got {0}")]
    InvalidRadius(f64),

    #[error("overlap factor must lie strictly between 0 and 1, got {0}")]
    InvalidOverlap(f64),

    #[error("bounding box is inverted: northeast {northeast} is south or west of southwest {southwest}")]
    InvertedBounds { northeast: LatLng, southwest: LatLng },
}
