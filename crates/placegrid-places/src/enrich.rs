//! Detail enrichment: fetch the richer record for a place and merge it with
//! the search-result record into one [`OutputRow`].
//!
//! A detail lookup that comes back with a non-success status is not an error;
//! the row is then built from the search result alone.

use std::time::Duration;

use crate::client::PlacesClient;
use crate::error::PlacesError;
use crate::gate::RequestGate;
use crate::types::{DetailedPlace, LightweightPlace, OutputRow, PhotoRef};

/// Generic type tags that say nothing about the place.
pub const IGNORED_TYPES: &[&str] = &["establishment", "point_of_interest", "food"];

/// Joins the per-day opening-hours lines.
pub const OPENING_HOURS_SEPARATOR: &str = " | ";

/// Which record a merged field is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    Detail,
    Lightweight,
}

/// Precedence for merged fields, highest first. A source is skipped when its
/// value is absent or empty; when every source is skipped the field is empty.
pub const FIELD_PRECEDENCE: [FieldSource; 2] = [FieldSource::Detail, FieldSource::Lightweight];

/// Portable map link built from the identifier alone.
#[must_use]
pub fn maps_url_for_place_id(place_id: &str) -> String {
    format!("https://www.google.com/maps/place/?q=place_id:{place_id}")
}

/// The first candidate that is present and not blank.
pub fn first_non_empty<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

/// Drops [`IGNORED_TYPES`], keeping order.
#[must_use]
pub fn clean_types(types: &[String]) -> Vec<String> {
    types
        .iter()
        .filter(|t| !IGNORED_TYPES.contains(&t.as_str()))
        .cloned()
        .collect()
}

/// Picks a value following [`FIELD_PRECEDENCE`].
fn by_precedence<T>(detail: Option<T>, light: Option<T>, is_empty: impl Fn(&T) -> bool) -> Option<T> {
    let mut detail = detail;
    let mut light = light;
    FIELD_PRECEDENCE.iter().find_map(|source| {
        let candidate = match source {
            FieldSource::Detail => detail.take(),
            FieldSource::Lightweight => light.take(),
        };
        candidate.filter(|value| !is_empty(value))
    })
}

fn blank(value: &&str) -> bool {
    value.trim().is_empty()
}

/// Merges a search result with its detail record, if any.
///
/// `photo_url` turns a photo reference into a fetchable URL.
pub fn merge_place(
    light: &LightweightPlace,
    detail: Option<&DetailedPlace>,
    photo_url: impl Fn(&str) -> String,
) -> OutputRow {
    let name = by_precedence(
        detail.and_then(|d| d.name.as_deref()),
        light.name.as_deref(),
        blank,
    );
    let address = by_precedence(
        detail.and_then(|d| d.formatted_address.as_deref()),
        light.vicinity.as_deref(),
        blank,
    );
    // Local format first; the search result never carries a phone number.
    let phone = detail.and_then(|d| {
        first_non_empty([
            d.formatted_phone_number.as_deref(),
            d.international_phone_number.as_deref(),
        ])
    });
    let rating = by_precedence(detail.and_then(|d| d.rating), light.rating, |_| false);
    // Tags are taken wholesale from one source, never merged.
    let types = by_precedence(
        detail.map(|d| d.types.as_slice()),
        Some(light.types.as_slice()),
        |t| t.is_empty(),
    )
    .map(clean_types)
    .unwrap_or_default();
    let opening_hours = detail
        .and_then(|d| d.opening_hours.as_ref())
        .map(|oh| oh.weekday_text.join(OPENING_HOURS_SEPARATOR))
        .unwrap_or_default();
    let photo_url = by_precedence(
        detail.map(|d| d.photos.as_slice()),
        Some(light.photos.as_slice()),
        |p| p.is_empty(),
    )
    .and_then(first_photo_reference)
    .map(photo_url)
    .unwrap_or_default();
    let maps_url = first_non_empty([detail.and_then(|d| d.url.as_deref())]).map_or_else(
        || maps_url_for_place_id(&light.place_id),
        str::to_owned,
    );

    OutputRow {
        name: name.unwrap_or_default().to_owned(),
        address: address.unwrap_or_default().to_owned(),
        phone: phone.unwrap_or_default().to_owned(),
        opening_hours,
        rating,
        types,
        photo_url,
        maps_url,
    }
}

/// Only the first photo is used; a blank reference yields no photo.
fn first_photo_reference(photos: &[PhotoRef]) -> Option<&str> {
    photos
        .first()
        .and_then(|p| p.photo_reference.as_deref())
        .filter(|r| !r.trim().is_empty())
}

/// Looks up details for `place_id`, holding a gate permit for `after` once done.
///
/// Returns `Ok(None)` when the upstream status is anything but `OK`.
///
/// # Errors
///
/// Transport and deserialization errors from [`PlacesClient::place_details`].
pub async fn fetch_detail(
    client: &PlacesClient,
    gate: &RequestGate,
    place_id: &str,
    language: &str,
    after: Duration,
) -> Result<Option<DetailedPlace>, PlacesError> {
    let response = gate
        .paced(after, client.place_details(place_id, language))
        .await?;

    if response.status == "OK" {
        if let Some(detail) = response.result {
            return Ok(Some(detail));
        }
    }

    tracing::warn!(
        place_id,
        status = %response.status,
        message = response.error_message.as_deref().unwrap_or(""),
        "detail unavailable, keeping search result data"
    );
    Ok(None)
}

/// Fetches and merges details for one place.
#[derive(Clone, Copy)]
pub struct Enrichment<'a> {
    pub client: &'a PlacesClient,
    pub gate: &'a RequestGate,
    pub language: &'a str,
    pub after_detail: Duration,
    pub photo_max_width: u32,
}

impl Enrichment<'_> {
    /// # Errors
    ///
    /// Transport and deserialization errors from the detail lookup.
    pub async fn run(&self, light: &LightweightPlace) -> Result<OutputRow, PlacesError> {
        let detail = fetch_detail(
            self.client,
            self.gate,
            &light.place_id,
            self.language,
            self.after_detail,
        )
        .await?;
        Ok(merge_place(light, detail.as_ref(), |reference| {
            self.client.photo_url(reference, self.photo_max_width)
        }))
    }
}

#[cfg(test)]
#[path = "enrich_test.rs"]
mod tests;
