//! Geographic grid generation for area sweeps.
//!
//! Converts a search radius into latitude/longitude steps, shrinks them by an
//! overlap factor so neighbouring search circles overlap, and walks the
//! bounding rectangle from its southwest corner to its northeast corner.
//! Longitude step is computed at the rectangle's center latitude so columns
//! narrow toward the poles.

use crate::geo::{BoundingBox, SamplePoint};
use crate::GridError;

/// Approximate length of one degree of latitude.
pub const KM_PER_LAT_DEGREE: f64 = 110.574;

/// Approximate length of one degree of longitude at the equator.
pub const KM_PER_LNG_DEGREE_AT_EQUATOR: f64 = 111.320;

/// Sample points covering a bounding rectangle, in traversal order.
///
/// Traversal is row-major: every longitude of the southernmost latitude row,
/// then the next row north. Tile results are aggregated in this order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    lats: Vec<f64>,
    lngs: Vec<f64>,
    lat_step: f64,
    lng_step: f64,
}

impl Grid {
    /// Number of latitude rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.lats.len()
    }

    /// Number of longitude columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.lngs.len()
    }

    /// Total number of sample points (`rows * cols`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Always `false` for a grid produced by [`build_grid`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn lat_step(&self) -> f64 {
        self.lat_step
    }

    #[must_use]
    pub fn lng_step(&self) -> f64 {
        self.lng_step
    }

    /// Sample points in traversal order.
    pub fn points(&self) -> impl Iterator<Item = SamplePoint> + '_ {
        self.lats
            .iter()
            .flat_map(move |&lat| self.lngs.iter().map(move |&lng| SamplePoint { lat, lng }))
    }
}

/// Convert a search radius in meters into `(lat_step, lng_step)` in degrees,
/// measured at latitude `at_lat`.
#[must_use]
pub fn degree_steps_for_radius(radius_m: f64, at_lat: f64) -> (f64, f64) {
    let radius_km = radius_m / 1000.0;
    let km_per_lng_degree = KM_PER_LNG_DEGREE_AT_EQUATOR * at_lat.to_radians().cos();
    (
        radius_km / KM_PER_LAT_DEGREE,
        radius_km / km_per_lng_degree,
    )
}

/// Build the sample grid covering `bounds`.
///
/// Both steps are multiplied by `overlap` (strictly between 0 and 1); a
/// smaller factor gives a denser grid. Each axis is walked from the southwest
/// value while `value <= northeast`, so a rectangle narrower than one step
/// still yields its starting point.
///
/// # Errors
///
/// - [`GridError::InvalidRadius`] if `radius_m` is not a positive finite number.
/// - [`GridError::InvalidOverlap`] if `overlap` is outside `(0, 1)`.
/// - [`GridError::InvertedBounds`] if `bounds` violates its corner ordering.
pub fn build_grid(bounds: &BoundingBox, radius_m: f64, overlap: f64) -> Result<Grid, GridError> {
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(GridError::InvalidRadius(radius_m));
    }
    if !(overlap > 0.0 && overlap < 1.0) {
        return Err(GridError::InvalidOverlap(overlap));
    }
    bounds.validate()?;

    let (lat_step, lng_step) = degree_steps_for_radius(radius_m, bounds.center.lat);
    let lat_step = lat_step * overlap;
    let lng_step = lng_step * overlap;

    let lats = walk_axis(bounds.southwest.lat, bounds.northeast.lat, lat_step);
    let lngs = walk_axis(bounds.southwest.lng, bounds.northeast.lng, lng_step);

    tracing::debug!(
        rows = lats.len(),
        cols = lngs.len(),
        lat_step,
        lng_step,
        "built sweep grid"
    );

    Ok(Grid {
        lats,
        lngs,
        lat_step,
        lng_step,
    })
}

/// Values `start, start + step, ...` while `<= end`. Always contains `start`.
fn walk_axis(start: f64, end: f64, step: f64) -> Vec<f64> {
    let mut values = vec![start];
    // A non-finite step (longitude at a pole) leaves a single column.
    if !step.is_finite() || step <= 0.0 {
        return values;
    }
    let mut value = start + step;
    while value <= end {
        values.push(value);
        value += step;
    }
    values
}
