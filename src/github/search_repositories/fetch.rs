//! Repository fetching logic

use chrono::DateTime;
use log::debug;
use octocrab::models::Repository;

use crate::github::client::GitHubClient;
use crate::github::error::{GitHubError, GitHubResult};

use super::RepositorySearch;
use super::types::{PageRequest, SearchItem, SearchQuota};

impl RepositorySearch for GitHubClient {
    async fn search_page(&self, request: &PageRequest) -> GitHubResult<Vec<SearchItem>> {
        if request.query.trim().is_empty() {
            return Err(GitHubError::InvalidInput(
                "search query cannot be empty".into(),
            ));
        }

        let search_future = self
            .inner()
            .search()
            .repositories(&request.query)
            .sort(request.sort.as_str())
            .order(request.order.as_str())
            .per_page(request.per_page)
            .page(request.page)
            .send();

        let timeout = self.api_timeout();
        let search_resp = tokio::time::timeout(timeout, search_future)
            .await
            .map_err(|_| GitHubError::Timeout(timeout))??;

        Ok(search_resp.items.into_iter().map(search_item).collect())
    }

    async fn search_quota(&self) -> Option<SearchQuota> {
        match self.inner().ratelimit().get().await {
            Ok(rate_limit) => {
                let search = rate_limit.resources.search;
                let reset_time = DateTime::from_timestamp(search.reset as i64, 0)
                    .unwrap_or_else(|| chrono::Utc::now() + chrono::Duration::minutes(1));
                Some(SearchQuota {
                    remaining: search.remaining as u32,
                    reset_time,
                })
            }
            Err(e) => {
                debug!("Rate limit lookup failed: {e}");
                None
            }
        }
    }
}

fn search_item(repo: Repository) -> SearchItem {
    SearchItem {
        full_name: repo.full_name.unwrap_or_else(|| repo.name.clone()),
        description: repo.description,
        html_url: repo
            .html_url
            .as_ref()
            .map_or("", reqwest::Url::as_str)
            .to_string(),
        stars: u64::from(repo.stargazers_count.unwrap_or(0)),
        forks: u64::from(repo.forks_count.unwrap_or(0)),
    }
}
