//! Configuration for discovery runs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::types::{RepoSearchSort, SearchOrder};

/// GitHub caps search pages at 100 items.
pub const PAGE_SIZE: u8 = 100;

/// What to do when a page request fails authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthFailurePolicy {
    /// Treat it like any transient failure and retry the page
    #[default]
    Retry,
    /// Give up on the page and move on
    SkipPage,
    /// Stop the whole run
    Abort,
}

/// Configuration for discovery operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub query: String,
    pub topic: String,
    pub language: String,
    pub max_results: u32,
    pub start_page: u32,
    pub sort: RepoSearchSort,
    pub order: SearchOrder,
    pub output: PathBuf,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    pub auth_failure_policy: AuthFailurePolicy,
    pub api_timeout_secs: u64,
    pub rate_limit_buffer: u32,
    pub max_rate_limit_wait_secs: u64,
    pub api_base_uri: Option<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            query: String::new(),
            topic: String::new(),
            language: String::new(),
            max_results: 1000,
            start_page: 1,
            sort: RepoSearchSort::Stars,
            order: SearchOrder::Desc,
            output: PathBuf::from("repo_info.csv"),
            max_retries: 5,
            retry_delay_secs: 30,
            auth_failure_policy: AuthFailurePolicy::Retry,
            api_timeout_secs: 10,
            rate_limit_buffer: 1,
            max_rate_limit_wait_secs: 300,
            api_base_uri: None,
        }
    }
}

impl DiscoveryConfig {
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    #[must_use]
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    #[must_use]
    pub fn max_rate_limit_wait(&self) -> Duration {
        Duration::from_secs(self.max_rate_limit_wait_secs)
    }

    /// First page to request; the search API is 1-based.
    #[must_use]
    pub fn first_page(&self) -> u32 {
        self.start_page.max(1)
    }

    /// Number of pages a run may visit before `max_results` is exhausted.
    #[must_use]
    pub fn page_budget(&self) -> u32 {
        self.max_results.div_ceil(u32::from(PAGE_SIZE))
    }
}
