//! GitHub API error types

use std::time::Duration;
use thiserror::Error;

/// Error types for GitHub API operations
#[derive(Debug, Error)]
pub enum GitHubError {
    /// GitHub answered with a non-success status
    #[error("GitHub API returned {code}: {message}")]
    Status { code: u16, message: String },

    /// Octocrab library error without an HTTP status (transport, decoding)
    #[error("Octocrab error: {0}")]
    Octocrab(octocrab::Error),

    /// Request did not complete within the API timeout
    #[error("GitHub API request timed out after {0:?}")]
    Timeout(Duration),

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Client setup/configuration error
    #[error("Client setup failed: {0}")]
    ClientSetup(String),
}

/// Convenience result alias for GitHub operations
pub type GitHubResult<T> = Result<T, GitHubError>;

impl From<octocrab::Error> for GitHubError {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => GitHubError::Status {
                code: source.status_code.as_u16(),
                message: source.message.clone(),
            },
            other => GitHubError::Octocrab(other),
        }
    }
}

/// How a failed page request should be treated by the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Query malformed or page beyond the search depth (HTTP 422)
    Unprocessable,
    /// Token missing, invalid or lacking scope
    Authentication,
    /// Anything worth retrying: network, 5xx, rate limiting, timeouts
    Transient,
}

impl GitHubError {
    /// HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Classify the error for retry decisions.
    ///
    /// GitHub reports secondary rate limits as 403, so a 403 whose message
    /// mentions the rate limit is transient rather than an auth problem.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Status { code: 422, .. } | Self::InvalidInput(_) => FailureKind::Unprocessable,
            Self::Status { code: 401, .. } => FailureKind::Authentication,
            Self::Status { code: 403, message } => {
                if message.to_ascii_lowercase().contains("rate limit") {
                    FailureKind::Transient
                } else {
                    FailureKind::Authentication
                }
            }
            _ => FailureKind::Transient,
        }
    }
}
