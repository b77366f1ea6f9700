//! Per-page request state machine.
//!
//! A page starts in [`PageState::Requesting`] and ends in one of the terminal
//! states. Failures move it according to their [`FailureKind`], never by
//! looking at raw status codes here.

use log::{info, warn};
use std::time::Duration;

use crate::github::error::{FailureKind, GitHubError};

use super::RepositorySearch;
use super::config::AuthFailurePolicy;
use super::types::{PageRequest, SearchItem};

/// Why a page was given up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Unprocessable,
    Authentication,
    RetriesExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    Requesting,
    /// Retry number `n` (1-based) is due
    Retrying(u32),
    Succeeded(Vec<SearchItem>),
    Skipped(SkipReason),
    Aborted(FailureKind),
}

/// Retry settings that drive [`PageState::advance`].
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
    pub on_auth_failure: AuthFailurePolicy,
}

impl PageState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded(_) | Self::Skipped(_) | Self::Aborted(_)
        )
    }

    fn retries_used(&self) -> u32 {
        match self {
            Self::Retrying(n) => *n,
            _ => 0,
        }
    }

    /// Apply the outcome of one request.
    ///
    /// Terminal states are returned unchanged.
    #[must_use]
    pub fn advance(self, outcome: Result<Vec<SearchItem>, FailureKind>, policy: &RetryPolicy) -> Self {
        if self.is_terminal() {
            return self;
        }

        let kind = match outcome {
            Ok(items) => return Self::Succeeded(items),
            Err(kind) => kind,
        };

        match (kind, policy.on_auth_failure) {
            (FailureKind::Unprocessable, _) => Self::Skipped(SkipReason::Unprocessable),
            (FailureKind::Authentication, AuthFailurePolicy::SkipPage) => {
                Self::Skipped(SkipReason::Authentication)
            }
            (FailureKind::Authentication, AuthFailurePolicy::Abort) => {
                Self::Aborted(FailureKind::Authentication)
            }
            _ => {
                let used = self.retries_used();
                if used < policy.max_retries {
                    Self::Retrying(used + 1)
                } else {
                    Self::Skipped(SkipReason::RetriesExhausted)
                }
            }
        }
    }
}

/// Drives one page to a terminal state.
///
/// Returns the terminal state and the number of requests issued.
pub(crate) async fn fetch_page<S: RepositorySearch>(
    api: &S,
    request: &PageRequest,
    policy: &RetryPolicy,
) -> (PageState, u32) {
    let mut state = PageState::Requesting;
    let mut requests = 0u32;

    while !state.is_terminal() {
        if let PageState::Retrying(n) = state {
            info!(
                "Retrying page {} ({n}/{}) after {:?}",
                request.page, policy.max_retries, policy.delay
            );
            if !policy.delay.is_zero() {
                tokio::time::sleep(policy.delay).await;
            }
        }

        requests += 1;
        let outcome = api.search_page(request).await.map_err(|e| {
            let kind = e.kind();
            report_failure(request.page, &e, kind);
            kind
        });
        state = state.advance(outcome, policy);
    }

    match &state {
        PageState::Skipped(SkipReason::Unprocessable) => {
            warn!("Unprocessable request for page {}. Skipping...", request.page);
        }
        PageState::Skipped(SkipReason::Authentication) => {
            warn!("Authentication failed for page {}. Skipping...", request.page);
        }
        PageState::Skipped(SkipReason::RetriesExhausted) => {
            warn!("Maximum retries reached for page {}. Skipping...", request.page);
        }
        _ => {}
    }

    (state, requests)
}

fn report_failure(page: u32, err: &GitHubError, kind: FailureKind) {
    warn!("Error fetching page {page}: {err}");
    if kind == FailureKind::Authentication {
        warn!("Authentication error. Check the GITHUB_TOKEN in use.");
    }
}
