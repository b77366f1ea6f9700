//! Tests for paginated discovery into the results table.

use super::mock::MockSearch;
use repo_harvest::github::{
    AuthFailurePolicy, DiscoveryConfig, DiscoveryError, FailureKind, RepoSearchSort,
    RepositoryDescriptor, SearchOrder, run_discovery,
};
use std::path::Path;
use tempfile::TempDir;

fn config(dir: &TempDir, max_results: u32) -> DiscoveryConfig {
    DiscoveryConfig {
        query: "language:python topic:web".to_string(),
        topic: "web".to_string(),
        language: "python".to_string(),
        max_results,
        output: dir.path().join("repo_info.csv"),
        retry_delay_secs: 0,
        ..DiscoveryConfig::default()
    }
}

fn read_rows(path: &Path) -> Vec<RepositoryDescriptor> {
    csv::Reader::from_path(path)
        .unwrap()
        .deserialize()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[tokio::test]
async fn test_stops_on_short_page() {
    let dir = TempDir::new().unwrap();
    let api = MockSearch::new(250);
    let config = config(&dir, 1000);

    let stats = run_discovery(&api, &config).await.unwrap();

    assert_eq!(api.calls(), vec![1, 2, 3]);
    assert_eq!(stats.requests, 3);
    assert_eq!(stats.rows_written, 250);
    assert_eq!(read_rows(&config.output).len(), 250);
}

#[tokio::test]
async fn test_exact_multiple_ends_on_empty_page() {
    let dir = TempDir::new().unwrap();
    let api = MockSearch::new(200);
    let config = config(&dir, 1000);

    let stats = run_discovery(&api, &config).await.unwrap();

    assert_eq!(api.calls(), vec![1, 2, 3]);
    assert_eq!(stats.pages_succeeded, 3);
    assert_eq!(stats.rows_written, 200);
}

#[tokio::test]
async fn test_max_results_bounds_pages() {
    let dir = TempDir::new().unwrap();
    let api = MockSearch::new(5000);
    let config = config(&dir, 150);

    let stats = run_discovery(&api, &config).await.unwrap();

    // Whole pages are kept, so the last page may overshoot the maximum
    assert_eq!(api.calls(), vec![1, 2]);
    assert_eq!(stats.rows_written, 200);
}

#[tokio::test]
async fn test_zero_max_results_makes_no_requests() {
    let dir = TempDir::new().unwrap();
    let api = MockSearch::new(500);
    let config = config(&dir, 0);

    let stats = run_discovery(&api, &config).await.unwrap();

    assert!(api.calls().is_empty());
    assert_eq!(stats.rows_written, 0);
    assert!(!config.output.exists());
}

#[tokio::test]
async fn test_rows_carry_search_settings() {
    let dir = TempDir::new().unwrap();
    let api = MockSearch::new(3);
    let config = DiscoveryConfig {
        sort: RepoSearchSort::Updated,
        order: SearchOrder::Asc,
        ..config(&dir, 1000)
    };

    run_discovery(&api, &config).await.unwrap();

    let rows = read_rows(&config.output);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].name, "owner0/repo0");
    assert_eq!(rows[0].description.as_deref(), Some("Repository number 0"));
    assert_eq!(rows[1].description, None);
    assert_eq!(rows[0].url, "https://github.com/owner0/repo0");
    assert_eq!(rows[0].topic, "web");
    assert_eq!(rows[0].language, "python");
    assert_eq!(rows[0].searched_by, "updated");
    assert_eq!(rows[0].order, "asc");
}

#[tokio::test]
async fn test_header_written_once_across_runs() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, 1000);

    run_discovery(&MockSearch::new(2), &config).await.unwrap();
    run_discovery(&MockSearch::new(2), &config).await.unwrap();

    let text = std::fs::read_to_string(&config.output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "Repository,Description,URL,Stars,Forks,Topic,Language,SearchedBy,Order"
    );
    assert_eq!(lines.len(), 5);
    assert_eq!(lines.iter().filter(|l| l.starts_with("Repository,")).count(), 1);
}

#[tokio::test]
async fn test_unprocessable_page_is_skipped() {
    let dir = TempDir::new().unwrap();
    let api = MockSearch::new(1000).fail_page(2, &[422]);
    let config = config(&dir, 300);

    let stats = run_discovery(&api, &config).await.unwrap();

    assert_eq!(api.calls(), vec![1, 2, 3]);
    assert_eq!(stats.pages_skipped, 1);
    assert_eq!(stats.rows_written, 200);
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let dir = TempDir::new().unwrap();
    let api = MockSearch::new(50).fail_page(1, &[502, 500]);
    let config = config(&dir, 1000);

    let stats = run_discovery(&api, &config).await.unwrap();

    assert_eq!(api.calls(), vec![1, 1, 1]);
    assert_eq!(stats.requests, 3);
    assert_eq!(stats.rows_written, 50);
}

#[tokio::test]
async fn test_exhausted_retries_skip_page() {
    let dir = TempDir::new().unwrap();
    let api = MockSearch::new(1000).fail_page(1, &[500; 6]);
    let config = config(&dir, 200);

    let stats = run_discovery(&api, &config).await.unwrap();

    // One attempt plus five retries, then the next page
    assert_eq!(api.calls(), vec![1, 1, 1, 1, 1, 1, 2]);
    assert_eq!(stats.pages_skipped, 1);
    assert_eq!(stats.rows_written, 100);
}

#[tokio::test]
async fn test_auth_failure_retries_by_default() {
    let dir = TempDir::new().unwrap();
    let api = MockSearch::new(10).fail_page(1, &[401]);
    let config = config(&dir, 1000);

    let stats = run_discovery(&api, &config).await.unwrap();

    assert_eq!(api.calls(), vec![1, 1]);
    assert_eq!(stats.rows_written, 10);
}

#[tokio::test]
async fn test_auth_failure_skip_policy() {
    let dir = TempDir::new().unwrap();
    let api = MockSearch::new(1000).fail_page(1, &[403]);
    let config = DiscoveryConfig {
        auth_failure_policy: AuthFailurePolicy::SkipPage,
        ..config(&dir, 200)
    };

    let stats = run_discovery(&api, &config).await.unwrap();

    assert_eq!(api.calls(), vec![1, 2]);
    assert_eq!(stats.pages_skipped, 1);
}

#[tokio::test]
async fn test_auth_failure_abort_policy() {
    let dir = TempDir::new().unwrap();
    let api = MockSearch::new(1000).fail_page(2, &[401]);
    let config = DiscoveryConfig {
        auth_failure_policy: AuthFailurePolicy::Abort,
        ..config(&dir, 1000)
    };

    let err = run_discovery(&api, &config).await.unwrap_err();

    assert!(matches!(
        err,
        DiscoveryError::Aborted {
            page: 2,
            kind: FailureKind::Authentication
        }
    ));
    // Rows of the first page are already on disk
    assert_eq!(read_rows(&config.output).len(), 100);
}

#[tokio::test]
async fn test_start_page_is_one_based() {
    let dir = TempDir::new().unwrap();
    let api = MockSearch::new(10);
    let config = DiscoveryConfig {
        start_page: 0,
        ..config(&dir, 1000)
    };

    run_discovery(&api, &config).await.unwrap();

    assert_eq!(api.calls(), vec![1]);
}

#[tokio::test]
async fn test_start_page_offsets_search() {
    let dir = TempDir::new().unwrap();
    let api = MockSearch::new(350);
    let config = DiscoveryConfig {
        start_page: 3,
        ..config(&dir, 1000)
    };

    let stats = run_discovery(&api, &config).await.unwrap();

    assert_eq!(api.calls(), vec![3, 4]);
    assert_eq!(stats.rows_written, 150);
}
