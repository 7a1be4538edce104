//! Coordinate and bounding-rectangle types shared across the sweep pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::GridError;

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// A coordinate at which one proximity search (a tile) is executed.
pub type SamplePoint = LatLng;

/// The rectangle covering the area being swept, plus its representative center.
///
/// Antimeridian-crossing rectangles are not supported: `northeast` must be
/// north of and east of `southwest`, or equal to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub northeast: LatLng,
    pub southwest: LatLng,
    pub center: LatLng,
}

impl BoundingBox {
    /// Builds a bounding box, rejecting inverted corners.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvertedBounds`] when `northeast` lies south or
    /// west of `southwest`.
    pub fn new(northeast: LatLng, southwest: LatLng, center: LatLng) -> Result<Self, GridError> {
        let bounds = Self {
            northeast,
            southwest,
            center,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Checks the corner ordering invariant.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvertedBounds`] when the invariant does not hold.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.northeast.lat < self.southwest.lat || self.northeast.lng < self.southwest.lng {
            return Err(GridError::InvertedBounds {
                northeast: self.northeast,
                southwest: self.southwest,
            });
        }
        Ok(())
    }

    /// North-south extent in degrees.
    #[must_use]
    pub fn height_deg(&self) -> f64 {
        self.northeast.lat - self.southwest.lat
    }

    /// East-west extent in degrees.
    #[must_use]
    pub fn width_deg(&self) -> f64 {
        self.northeast.lng - self.southwest.lng
    }
}
