//! Errors raised by the GitHub client.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use triage::{PublishError, RetryPolicy};

/// Errors that can occur when calling the GitHub REST API.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Missing or invalid connection settings.
    #[error("Invalid GitHub configuration: {0}")]
    Config(String),

    /// The request could not be sent or the response could not be read.
    #[error("GitHub request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// GitHub answered with a non-success status.
    #[error("GitHub API returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// GitHub's `message` field, or the raw body.
        message: String,
        /// `true` when the response reported an exhausted rate limit.
        rate_limited: bool,
        /// Delay requested by a `Retry-After` header.
        retry_after: Option<Duration>,
    },
}

impl GitHubError {
    /// Returns whether the failed call may succeed if attempted again.
    ///
    /// Timeouts, connection failures, rate limiting and `5xx` are retryable.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Request(e) if e.is_timeout() || e.is_connect() => {
                RetryPolicy::Retryable { after: None }
            }
            Self::Status {
                status,
                rate_limited,
                retry_after,
                ..
            } if *rate_limited
                || *status == StatusCode::TOO_MANY_REQUESTS
                || status.is_server_error() =>
            {
                RetryPolicy::Retryable {
                    after: *retry_after,
                }
            }
            _ => RetryPolicy::NonRetryable,
        }
    }
}

impl From<GitHubError> for PublishError {
    fn from(err: GitHubError) -> Self {
        let retry = err.retry_policy();
        PublishError::new(err.to_string(), retry)
    }
}
