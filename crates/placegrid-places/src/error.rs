use placegrid_core::GridError;
use thiserror::Error;

/// Errors returned by the places client and the sweep pipeline.
///
/// Every variant is fatal for the run. A detail lookup that comes back with a
/// non-success status is not an error: it surfaces as `Ok(None)` from
/// [`crate::fetch_detail`] and the place keeps its search-result data.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx HTTP status that is not retried.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL could not be parsed.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Geocoding returned no candidate for the requested area.
    #[error("geocoding '{query}' returned no results (status {status})")]
    Resolution { query: String, status: String },

    /// The area resolved but its rectangle or the sweep parameters are unusable.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Proximity search returned a non-retryable status.
    ///
    /// `message` is the upstream `error_message`, empty when none was sent.
    #[error("nearby search failed at ({lat}, {lng}): {status} {message}")]
    SearchFailure {
        status: String,
        lat: f64,
        lng: f64,
        message: String,
    },

    /// A continuation token stayed "not ready" for every allowed retry.
    #[error("continuation token at ({lat}, {lng}) never became valid after {attempts} retries")]
    TokenNeverReady { lat: f64, lng: f64, attempts: u32 },
}
