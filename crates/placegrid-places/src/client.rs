//! HTTP client for the places web service.
//!
//! Wraps `reqwest` with API key management, endpoint construction, and typed
//! response deserialization. Transport failures are retried with back-off;
//! the `status` field inside each JSON envelope is left for callers to judge.

use std::time::Duration;

use placegrid_core::{AppConfig, SamplePoint};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::PlacesError;
use crate::retry::retry_with_backoff;
use crate::types::{DetailsResponse, GeocodeResponse, NearbySearchResponse, DETAIL_FIELDS};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";

/// Parameters shared by every proximity search in a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearbyQuery {
    pub radius_m: u32,
    /// Upstream place type, e.g. `cafe`.
    pub category: String,
    pub language: String,
}

/// Client for the geocoding, nearby-search, details and photo endpoints.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    geocode_url: Url,
    nearby_url: Url,
    details_url: Url,
    photo_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PlacesClient {
    /// Creates a client pointed at the production API, without retries.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client from application config, including its retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Ok(
            Self::new(&config.api_key, config.request_timeout_secs, &config.user_agent)?
                .with_retry_policy(config.max_retries, config.retry_backoff_base_ms),
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let invalid = |e| invalid_base_url(base_url, e);
        let base = Url::parse(&normalised).map_err(invalid)?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            geocode_url: base.join("geocode/json").map_err(invalid)?,
            nearby_url: base.join("place/nearbysearch/json").map_err(invalid)?,
            details_url: base.join("place/details/json").map_err(invalid)?,
            photo_url: base.join("place/photo").map_err(invalid)?,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Enables retries on transient transport errors.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Looks up `address`, biased by `language` and `region`.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] / [`PlacesError::UnexpectedStatus`] on transport failure.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn geocode(
        &self,
        address: &str,
        language: &str,
        region: &str,
    ) -> Result<GeocodeResponse, PlacesError> {
        let mut url = self.geocode_url.clone();
        url.query_pairs_mut()
            .append_pair("address", address)
            .append_pair("key", &self.api_key)
            .append_pair("language", language)
            .append_pair("region", region);
        self.get_json(url, &format!("geocode(address={address})"))
            .await
    }

    /// Fetches one page of proximity-search results around `location`.
    ///
    /// `page_token` is the previous page's continuation token, if any.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] / [`PlacesError::UnexpectedStatus`] on transport failure.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn nearby_search(
        &self,
        query: &NearbyQuery,
        location: SamplePoint,
        page_token: Option<&str>,
    ) -> Result<NearbySearchResponse, PlacesError> {
        let mut url = self.nearby_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("key", &self.api_key)
                .append_pair("location", &format!("{},{}", location.lat, location.lng))
                .append_pair("radius", &query.radius_m.to_string())
                .append_pair("type", &query.category)
                .append_pair("language", &query.language);
            if let Some(token) = page_token {
                pairs.append_pair("pagetoken", token);
            }
        }
        self.get_json(url, &format!("nearbysearch(location={location})"))
            .await
    }

    /// Fetches the detail record for `place_id`.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] / [`PlacesError::UnexpectedStatus`] on transport failure.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn place_details(
        &self,
        place_id: &str,
        language: &str,
    ) -> Result<DetailsResponse, PlacesError> {
        let mut url = self.details_url.clone();
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("place_id", place_id)
            .append_pair("language", language)
            .append_pair("fields", &DETAIL_FIELDS.join(","));
        self.get_json(url, &format!("details(place_id={place_id})"))
            .await
    }

    /// Builds a directly fetchable photo URL for `photo_reference`.
    ///
    /// The URL carries the API key; the service answers it with a redirect
    /// to the image. It is never fetched here.
    #[must_use]
    pub fn photo_url(&self, photo_reference: &str, max_width: u32) -> String {
        let mut url = self.photo_url.clone();
        url.query_pairs_mut()
            .append_pair("maxwidth", &max_width.to_string())
            .append_pair("photo_reference", photo_reference)
            .append_pair("key", &self.api_key);
        url.to_string()
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T, PlacesError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(redacted)?;
                let status = response.status();
                if !status.is_success() {
                    return Err(PlacesError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: without_query(&url),
                    });
                }

                let body = response.text().await.map_err(redacted)?;
                serde_json::from_str::<T>(&body).map_err(|e| PlacesError::Deserialize {
                    context: context.to_owned(),
                    source: e,
                })
            }
        })
        .await
    }
}

fn invalid_base_url(url: &str, reason: impl std::fmt::Display) -> PlacesError {
    PlacesError::InvalidBaseUrl {
        url: url.to_owned(),
        reason: reason.to_string(),
    }
}

/// Transport errors carry the request URL, and with it the API key.
fn redacted(err: reqwest::Error) -> PlacesError {
    PlacesError::Http(err.without_url())
}

/// Drops the query string so the API key never lands in error messages.
fn without_query(url: &Url) -> String {
    let mut bare = url.clone();
    bare.set_query(None);
    bare.to_string()
}
