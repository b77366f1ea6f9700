//! `repo_harvest` - GitHub repository discovery and code-quality metrics
//!
//! This library pages through GitHub's repository search into a CSV table,
//! clones those repositories, runs radon over them and reduces its per-file
//! output into one summary row per repository. A small utility removes
//! duplicate rows from the resulting tables.

// Module declarations
pub mod config;
pub mod dedup;
pub mod github;
pub mod metrics;
pub mod table;

pub use config::{ConfigError, HarvestConfig};

// Re-export GitHub client and error types
pub use github::{GitHubClient, GitHubClientBuilder, GitHubError, GitHubResult};

// Re-export discovery types
pub use github::{
    AuthFailurePolicy, DiscoveryConfig, DiscoveryError, DiscoveryStats, RepoSearchSort,
    RepositoryDescriptor, RepositorySearch, SearchOrder, run_discovery,
};

// Re-export metrics pipeline types
pub use metrics::{MetricsConfig, MetricsError, MetricsPipeline, MetricsRunStats};

pub use dedup::{DedupStats, dedup_records, dedup_table};
