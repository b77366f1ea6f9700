//! Tests for GitHub failure classification.

use repo_harvest::GitHubError;
use repo_harvest::github::FailureKind;
use std::time::Duration;

fn status(code: u16, message: &str) -> GitHubError {
    GitHubError::Status {
        code,
        message: message.to_string(),
    }
}

#[test]
fn test_unprocessable_statuses() {
    assert_eq!(
        status(422, "Validation Failed").kind(),
        FailureKind::Unprocessable
    );
    assert_eq!(
        GitHubError::InvalidInput("search query cannot be empty".into()).kind(),
        FailureKind::Unprocessable
    );
}

#[test]
fn test_authentication_statuses() {
    assert_eq!(
        status(401, "Bad credentials").kind(),
        FailureKind::Authentication
    );
    assert_eq!(
        status(403, "Resource not accessible by personal access token").kind(),
        FailureKind::Authentication
    );
}

#[test]
fn test_rate_limit_403_is_transient() {
    assert_eq!(
        status(403, "API rate limit exceeded for user ID 1.").kind(),
        FailureKind::Transient
    );
    assert_eq!(
        status(403, "You have exceeded a secondary rate limit").kind(),
        FailureKind::Transient
    );
}

#[test]
fn test_other_failures_are_transient() {
    assert_eq!(status(500, "Server Error").kind(), FailureKind::Transient);
    assert_eq!(status(503, "Unavailable").kind(), FailureKind::Transient);
    assert_eq!(
        GitHubError::Timeout(Duration::from_secs(10)).kind(),
        FailureKind::Transient
    );
}

#[test]
fn test_status_accessor() {
    assert_eq!(status(422, "x").status(), Some(422));
    assert_eq!(GitHubError::Timeout(Duration::from_secs(1)).status(), None);
}
