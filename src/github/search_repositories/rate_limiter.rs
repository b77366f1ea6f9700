//! Rate limiting support

use chrono::{DateTime, Utc};
use log::{info, warn};
use std::time::Duration;
use tokio::time::sleep;

use super::types::SearchQuota;

/// Tracks the search quota between page requests.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    pub remaining: u32,
    pub reset_time: DateTime<Utc>,
}

impl RateLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            // Authenticated search allows 30 requests per minute
            remaining: 30,
            reset_time: Utc::now() + chrono::Duration::minutes(1),
        }
    }

    pub fn update(&mut self, quota: SearchQuota) {
        self.remaining = quota.remaining;
        self.reset_time = quota.reset_time;
    }

    /// How long to wait before the next request, if at all.
    #[must_use]
    pub fn required_wait(&self, buffer: u32, now: DateTime<Utc>) -> Option<Duration> {
        if self.remaining <= buffer && now < self.reset_time {
            Some(
                (self.reset_time - now)
                    .to_std()
                    .unwrap_or(Duration::from_secs(60)),
            )
        } else {
            None
        }
    }

    /// Sleeps until the quota resets when it is nearly used up.
    ///
    /// Waits longer than `max_wait` are not taken; the request goes out and
    /// the pager's retry path absorbs the rejection.
    pub async fn wait_if_needed(&self, buffer: u32, max_wait: Duration) {
        let Some(wait_time) = self.required_wait(buffer, Utc::now()) else {
            return;
        };

        if wait_time > max_wait {
            warn!(
                "Search quota exhausted until {}, not waiting {wait_time:?}",
                self.reset_time
            );
            return;
        }

        info!("Rate limit approaching, waiting {wait_time:?}");
        sleep(wait_time).await;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
