//! Type definitions for GitHub repository discovery

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::github::error::FailureKind;
use crate::table::TableError;

/// Fatal discovery errors. Per-page failures never surface here.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Failed to append to {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error("Discovery aborted on page {page}: {kind:?} failure")]
    Aborted { page: u32, kind: FailureKind },
}

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Sort field for repository search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RepoSearchSort {
    /// Sort by stargazer count
    #[default]
    Stars,
    /// Sort by fork count
    Forks,
    /// Sort by open issues labelled help-wanted
    HelpWantedIssues,
    /// Sort by last update
    Updated,
}

impl RepoSearchSort {
    /// Returns the GitHub API string representation of this sort field.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stars => "stars",
            Self::Forks => "forks",
            Self::HelpWantedIssues => "help-wanted-issues",
            Self::Updated => "updated",
        }
    }
}

impl fmt::Display for RepoSearchSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort order for search results.
///
/// Controls whether results are returned in ascending or descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchOrder {
    /// Ascending order (low to high, old to new)
    Asc,
    /// Descending order (high to low, new to old)
    #[default]
    Desc,
}

impl SearchOrder {
    /// Returns the GitHub API string representation of this sort order.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SearchOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of a repository search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub query: String,
    pub sort: RepoSearchSort,
    pub order: SearchOrder,
    pub page: u32,
    pub per_page: u8,
}

/// The fields of a search hit the discovery table keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchItem {
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub stars: u64,
    pub forks: u64,
}

/// Remaining search quota as reported by the rate-limit endpoint.
#[derive(Debug, Clone, Copy)]
pub struct SearchQuota {
    pub remaining: u32,
    pub reset_time: DateTime<Utc>,
}

/// One row of the discovery table, and the input row of the metrics pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    #[serde(rename = "Repository")]
    pub name: String,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Stars")]
    pub stars: u64,
    #[serde(rename = "Forks")]
    pub forks: u64,
    #[serde(rename = "Topic", default)]
    pub topic: String,
    #[serde(rename = "Language", default)]
    pub language: String,
    #[serde(rename = "SearchedBy")]
    pub searched_by: String,
    #[serde(rename = "Order")]
    pub order: String,
}

impl RepositoryDescriptor {
    /// Normalise a search hit into a table row tagged with the search settings.
    #[must_use]
    pub fn from_search_item(
        item: SearchItem,
        topic: &str,
        language: &str,
        sort: RepoSearchSort,
        order: SearchOrder,
    ) -> Self {
        Self {
            name: item.full_name,
            description: item.description,
            url: item.html_url,
            stars: item.stars,
            forks: item.forks,
            topic: topic.to_string(),
            language: language.to_string(),
            searched_by: sort.as_str().to_string(),
            order: order.as_str().to_string(),
        }
    }
}

/// Counters for one discovery run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryStats {
    /// HTTP requests issued, retries included
    pub requests: u32,
    pub pages_succeeded: u32,
    pub pages_skipped: u32,
    pub rows_written: u64,
}
