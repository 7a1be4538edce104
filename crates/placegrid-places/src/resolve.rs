//! Area resolution: place name to bounding rectangle.

use placegrid_core::BoundingBox;

use crate::client::PlacesClient;
use crate::error::PlacesError;
use crate::types::GeocodeResponse;

/// Geocodes `place` and returns the rectangle to sweep.
///
/// The first candidate wins. When it carries no explicit `bounds`, its
/// `viewport` is used instead.
///
/// # Errors
///
/// - [`PlacesError::Resolution`] if geocoding yields no usable candidate.
/// - [`PlacesError::Grid`] if the returned rectangle is inverted.
/// - Transport errors from [`PlacesClient::geocode`].
pub async fn resolve_area(
    client: &PlacesClient,
    place: &str,
    language: &str,
    region: &str,
) -> Result<BoundingBox, PlacesError> {
    let response = client.geocode(place, language, region).await?;
    let bounds = bounds_from_geocode(place, response)?;
    tracing::info!(
        place,
        northeast = %bounds.northeast,
        southwest = %bounds.southwest,
        center = %bounds.center,
        "resolved area bounds"
    );
    Ok(bounds)
}

fn bounds_from_geocode(place: &str, response: GeocodeResponse) -> Result<BoundingBox, PlacesError> {
    let no_candidates = |status: String| PlacesError::Resolution {
        query: place.to_owned(),
        status,
    };

    let GeocodeResponse {
        status, results, ..
    } = response;
    let Some(first) = results.into_iter().next() else {
        return Err(no_candidates(status));
    };

    let geometry = first.geometry;
    let Some(rect) = geometry.bounds.or(geometry.viewport) else {
        return Err(no_candidates(status));
    };
    if geometry.bounds.is_none() {
        tracing::debug!(place, "no explicit bounds in geocode result, using viewport");
    }

    Ok(BoundingBox::new(rect.northeast, rect.southwest, geometry.location)?)
}
