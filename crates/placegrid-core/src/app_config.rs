use std::time::Duration;

use crate::sweep::{SweepDelays, SweepLimits};

#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub max_pages: usize,
    pub max_token_retries: u32,
    pub token_delay_ms: u64,
    pub not_ready_delay_ms: u64,
    pub page_delay_ms: u64,
    pub tile_delay_ms: u64,
    pub detail_delay_ms: u64,
    pub photo_max_width: u32,
    pub max_concurrent_tiles: usize,
    pub max_concurrent_details: usize,
    pub max_in_flight: usize,
}

impl AppConfig {
    #[must_use]
    pub fn delays(&self) -> SweepDelays {
        SweepDelays {
            token_ready: Duration::from_millis(self.token_delay_ms),
            not_ready: Duration::from_millis(self.not_ready_delay_ms),
            after_page: Duration::from_millis(self.page_delay_ms),
            after_tile: Duration::from_millis(self.tile_delay_ms),
            after_detail: Duration::from_millis(self.detail_delay_ms),
        }
    }

    #[must_use]
    pub fn limits(&self) -> SweepLimits {
        SweepLimits {
            max_pages: self.max_pages,
            max_token_retries: self.max_token_retries,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("max_pages", &self.max_pages)
            .field("max_token_retries", &self.max_token_retries)
            .field("token_delay_ms", &self.token_delay_ms)
            .field("not_ready_delay_ms", &self.not_ready_delay_ms)
            .field("page_delay_ms", &self.page_delay_ms)
            .field("tile_delay_ms", &self.tile_delay_ms)
            .field("detail_delay_ms", &self.detail_delay_ms)
            .field("photo_max_width", &self.photo_max_width)
            .field("max_concurrent_tiles", &self.max_concurrent_tiles)
            .field("max_concurrent_details", &self.max_concurrent_details)
            .field("max_in_flight", &self.max_in_flight)
            .finish()
    }
}
