//! GitHub Repository Discovery
//!
//! Pages through the repository search API and appends every hit to the
//! discovery table as soon as its page arrives, so partial progress survives
//! a crash.

mod config;
mod fetch;
mod pager;
mod rate_limiter;
mod types;

pub use config::{AuthFailurePolicy, DiscoveryConfig, PAGE_SIZE};
pub use pager::{PageState, RetryPolicy, SkipReason};
pub use rate_limiter::RateLimiter;
pub use types::{
    DiscoveryError, DiscoveryResult, DiscoveryStats, PageRequest, RepoSearchSort,
    RepositoryDescriptor, SearchItem, SearchOrder, SearchQuota,
};

use log::info;
use std::future::Future;

use crate::github::error::GitHubResult;
use crate::table;

use pager::fetch_page;

/// Paginated repository search backend.
pub trait RepositorySearch: Send + Sync {
    /// Fetch one page of results.
    fn search_page(
        &self,
        request: &PageRequest,
    ) -> impl Future<Output = GitHubResult<Vec<SearchItem>>> + Send;

    /// Current search quota, when the backend can report it.
    fn search_quota(&self) -> impl Future<Output = Option<SearchQuota>> + Send {
        async { None }
    }
}

/// Runs a discovery pass and appends its rows to `config.output`.
///
/// Stops on the first short page, once `max_results` rows were written, or
/// once `ceil(max_results / PAGE_SIZE)` pages (skipped ones included) were visited.
pub async fn run_discovery<S: RepositorySearch>(
    api: &S,
    config: &DiscoveryConfig,
) -> DiscoveryResult<DiscoveryStats> {
    let mut stats = DiscoveryStats::default();
    let mut limiter = RateLimiter::new();
    let policy = RetryPolicy {
        max_retries: config.max_retries,
        delay: config.retry_delay(),
        on_auth_failure: config.auth_failure_policy,
    };
    let page_budget = config.page_budget();
    let mut page = config.first_page();
    let mut visited = 0u32;

    info!(
        "Searching '{}' sorted by {} {} (max {} results, from page {page})",
        config.query, config.sort, config.order, config.max_results
    );

    while visited < page_budget && stats.rows_written < u64::from(config.max_results) {
        limiter
            .wait_if_needed(config.rate_limit_buffer, config.max_rate_limit_wait())
            .await;

        let request = PageRequest {
            query: config.query.clone(),
            sort: config.sort,
            order: config.order,
            page,
            per_page: PAGE_SIZE,
        };
        let (state, requests) = fetch_page(api, &request, &policy).await;
        stats.requests += requests;
        visited += 1;

        match state {
            PageState::Succeeded(items) => {
                stats.pages_succeeded += 1;
                let count = items.len();
                for item in items {
                    let row = RepositoryDescriptor::from_search_item(
                        item,
                        &config.topic,
                        &config.language,
                        config.sort,
                        config.order,
                    );
                    table::append_serialized(&config.output, &row).map_err(|source| {
                        DiscoveryError::Output {
                            path: config.output.clone(),
                            source,
                        }
                    })?;
                    stats.rows_written += 1;
                }
                info!("Page {page}: {count} repositories");

                if count < usize::from(PAGE_SIZE) {
                    break;
                }

                if let Some(quota) = api.search_quota().await {
                    limiter.update(quota);
                }
            }
            PageState::Aborted(kind) => return Err(DiscoveryError::Aborted { page, kind }),
            // fetch_page only hands back terminal states
            _ => stats.pages_skipped += 1,
        }

        page += 1;
    }

    info!(
        "Discovery finished: {} rows from {} pages ({} skipped, {} requests)",
        stats.rows_written, stats.pages_succeeded, stats.pages_skipped, stats.requests
    );
    Ok(stats)
}
