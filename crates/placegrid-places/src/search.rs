//! Tile search: drive one sample point's paginated proximity search to exhaustion.
//!
//! Pagination is an explicit state machine:
//!
//! ```text
//! Fetch ──(next token, pages < cap)──▶ AwaitTokenReady ──(token delay)──▶ Fetch
//!   │  ╲
//!   │   ╲──(INVALID_REQUEST on a token page)──▶ Fetch (same token, after not-ready delay)
//!   │
//!   ├──(no token, or page cap reached)──▶ Done
//!   └──(any other status)──▶ Err(SearchFailure)
//! ```
//!
//! Pages of one tile are always fetched sequentially: each continuation token
//! comes from the previous response.

use placegrid_core::{SamplePoint, SweepDelays, SweepLimits};

use crate::client::{NearbyQuery, PlacesClient};
use crate::error::PlacesError;
use crate::gate::{pause, RequestGate};
use crate::types::{LightweightPlace, SearchStatus};

/// Everything a tile search needs besides the point itself.
#[derive(Clone, Copy)]
pub struct TileSearch<'a> {
    pub client: &'a PlacesClient,
    pub gate: &'a RequestGate,
    pub query: &'a NearbyQuery,
    pub delays: &'a SweepDelays,
    pub limits: &'a SweepLimits,
}

enum TileState {
    Fetch {
        token: Option<String>,
        not_ready_retries: u32,
    },
    AwaitTokenReady {
        token: String,
    },
    Done,
}

impl TileSearch<'_> {
    /// Collects every place visible at `point`, up to `limits.max_pages` pages.
    ///
    /// `tile` is the 1-based position of `point` in grid traversal order and
    /// only labels log events.
    ///
    /// Returns an empty list when the upstream reports `ZERO_RESULTS`.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::SearchFailure`] on any status other than `OK`,
    ///   `ZERO_RESULTS`, or a not-ready continuation token.
    /// - [`PlacesError::TokenNeverReady`] when a token stays invalid for more
    ///   than `limits.max_token_retries` retries.
    /// - Transport errors from [`PlacesClient::nearby_search`].
    pub async fn run(
        &self,
        tile: usize,
        point: SamplePoint,
    ) -> Result<Vec<LightweightPlace>, PlacesError> {
        let mut places = Vec::new();
        let mut pages = 0usize;
        let mut state = TileState::Fetch {
            token: None,
            not_ready_retries: 0,
        };

        loop {
            state = match state {
                TileState::AwaitTokenReady { token } => {
                    pause(self.delays.token_ready).await;
                    TileState::Fetch {
                        token: Some(token),
                        not_ready_retries: 0,
                    }
                }
                TileState::Fetch {
                    token,
                    not_ready_retries,
                } => {
                    let response = self
                        .gate
                        .paced(
                            self.delays.after_page,
                            self.client
                                .nearby_search(self.query, point, token.as_deref()),
                        )
                        .await?;

                    match SearchStatus::parse(&response.status) {
                        SearchStatus::Ok | SearchStatus::ZeroResults => {
                            pages += 1;
                            tracing::debug!(
                                tile,
                                lat = point.lat,
                                lng = point.lng,
                                page = pages,
                                results = response.results.len(),
                                "fetched nearby page"
                            );
                            places.extend(response.results);

                            match response.next_page_token.filter(|t| !t.is_empty()) {
                                Some(next) if pages < self.limits.max_pages => {
                                    TileState::AwaitTokenReady { token: next }
                                }
                                Some(_) => {
                                    tracing::debug!(
                                        tile,
                                        lat = point.lat,
                                        lng = point.lng,
                                        max_pages = self.limits.max_pages,
                                        "page cap reached with a continuation token left"
                                    );
                                    TileState::Done
                                }
                                None => TileState::Done,
                            }
                        }
                        SearchStatus::InvalidRequest if token.is_some() => {
                            if not_ready_retries >= self.limits.max_token_retries {
                                return Err(PlacesError::TokenNeverReady {
                                    lat: point.lat,
                                    lng: point.lng,
                                    attempts: not_ready_retries,
                                });
                            }
                            tracing::warn!(
                                tile,
                                lat = point.lat,
                                lng = point.lng,
                                retry = not_ready_retries + 1,
                                "continuation token not ready, retrying"
                            );
                            pause(self.delays.not_ready).await;
                            TileState::Fetch {
                                token,
                                not_ready_retries: not_ready_retries + 1,
                            }
                        }
                        // INVALID_REQUEST without a token is not a readiness issue: never retried.
                        SearchStatus::InvalidRequest | SearchStatus::Other(_) => {
                            return Err(PlacesError::SearchFailure {
                                status: response.status,
                                lat: point.lat,
                                lng: point.lng,
                                message: response.error_message.unwrap_or_default(),
                            });
                        }
                    }
                }
                TileState::Done => return Ok(places),
            };
        }
    }
}
