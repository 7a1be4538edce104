//! Places API response types and the sweep's output row.
//!
//! Every upstream response is a JSON envelope with a `status` string. The
//! envelope types keep `status` raw; callers classify it with
//! [`SearchStatus::parse`] or by comparing against `"OK"`.

use placegrid_core::LatLng;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Geocoding
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: Option<String>,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
    #[serde(default)]
    pub bounds: Option<Viewport>,
    #[serde(default)]
    pub viewport: Option<Viewport>,
}

/// A rectangle as the upstream encodes it.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Viewport {
    pub northeast: LatLng,
    pub southwest: LatLng,
}

// ---------------------------------------------------------------------------
// Nearby search
// ---------------------------------------------------------------------------

/// One page of proximity-search results.
#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<LightweightPlace>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Classified proximity-search status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    /// `OK`
    Ok,
    /// `ZERO_RESULTS`
    ZeroResults,
    /// `INVALID_REQUEST`; for a continuation page this means the token is
    /// not valid yet.
    InvalidRequest,
    /// Anything else: quota exhaustion, denied key, unknown errors.
    Other(String),
}

impl SearchStatus {
    #[must_use]
    pub fn parse(status: &str) -> Self {
        match status {
            "OK" => Self::Ok,
            "ZERO_RESULTS" => Self::ZeroResults,
            "INVALID_REQUEST" => Self::InvalidRequest,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// A place as reported by a single proximity search.
///
/// The same real-world place can show up in several tiles; identity is
/// carried by `place_id`. Upstream records without an identifier
/// deserialize with an empty `place_id` and are dropped during aggregation.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct LightweightPlace {
    #[serde(default)]
    pub place_id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Approximate address.
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PhotoRef {
    #[serde(default)]
    pub photo_reference: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

// ---------------------------------------------------------------------------
// Place details
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub status: String,
    #[serde(default)]
    pub result: Option<DetailedPlace>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Fields requested from the detail endpoint.
pub const DETAIL_FIELDS: &[&str] = &[
    "place_id",
    "name",
    "formatted_address",
    "formatted_phone_number",
    "international_phone_number",
    "opening_hours/weekday_text",
    "rating",
    "types",
    "url",
    "website",
    "photos",
];

/// The richer record returned by a detail lookup.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DetailedPlace {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    /// Local-format phone number.
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub international_phone_number: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub types: Vec<String>,
    /// Canonical map URL.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct OpeningHours {
    /// One human-readable line per weekday.
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One row of sweep output: a search-result place merged with its detail
/// record, if any.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OutputRow {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub opening_hours: String,
    pub rating: Option<f64>,
    pub types: Vec<String>,
    pub photo_url: String,
    pub maps_url: String,
}
