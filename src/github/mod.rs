//! GitHub API operations module
//!
//! Provides the repository search used by discovery, via octocrab.

pub mod client;
pub mod error;
pub mod search_repositories;

// Re-export client types
pub use client::{GitHubClient, GitHubClientBuilder};

// Re-export error types
pub use error::{FailureKind, GitHubError, GitHubResult};

// Re-export discovery functionality
pub use search_repositories::{
    AuthFailurePolicy, DiscoveryConfig, DiscoveryError, DiscoveryStats, PAGE_SIZE, PageRequest,
    PageState, RateLimiter, RepoSearchSort, RepositoryDescriptor, RepositorySearch, RetryPolicy,
    SearchItem, SearchOrder, SearchQuota, SkipReason, run_discovery,
};
