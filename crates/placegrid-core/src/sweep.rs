//! Pacing and pagination limits for a sweep run.
//!
//! The defaults encode the observed behavior of the upstream places service:
//! continuation tokens need roughly two seconds before they become valid, and
//! proximity search never returns more than three pages.

use std::time::Duration;

/// Page cap per tile. The upstream proximity search stops at three pages.
pub const DEFAULT_MAX_PAGES: usize = 3;

/// How many times a "not ready" continuation token is retried per page.
pub const DEFAULT_MAX_TOKEN_RETRIES: u32 = 30;

/// Fixed courtesy delays applied around upstream calls.
///
/// These are static, not adaptive. Tests use [`SweepDelays::none`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepDelays {
    /// Wait before fetching a page with a continuation token.
    pub token_ready: Duration,
    /// Wait after the upstream reports the token is not ready yet.
    pub not_ready: Duration,
    /// Courtesy delay after every page fetch.
    pub after_page: Duration,
    /// Courtesy delay after every tile.
    pub after_tile: Duration,
    /// Courtesy delay after every detail lookup.
    pub after_detail: Duration,
}

impl SweepDelays {
    /// All delays zero.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            token_ready: Duration::ZERO,
            not_ready: Duration::ZERO,
            after_page: Duration::ZERO,
            after_tile: Duration::ZERO,
            after_detail: Duration::ZERO,
        }
    }
}

impl Default for SweepDelays {
    fn default() -> Self {
        Self {
            token_ready: Duration::from_millis(2_000),
            not_ready: Duration::from_millis(2_000),
            after_page: Duration::from_millis(1_000),
            after_tile: Duration::from_millis(500),
            after_detail: Duration::from_millis(250),
        }
    }
}

/// Pagination limits for a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepLimits {
    pub max_pages: usize,
    pub max_token_retries: u32,
}

impl Default for SweepLimits {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_token_retries: DEFAULT_MAX_TOKEN_RETRIES,
        }
    }
}

