//! Errors raised by the chat-completions client.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use triage::{ClassificationServiceError, RetryPolicy};

/// Errors that can occur when calling the chat-completions API.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Missing or invalid connection settings.
    #[error("Invalid LLM configuration: {0}")]
    Config(String),

    /// The request could not be sent or the response could not be read.
    #[error("LLM request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("LLM API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Response body, or the API's error message when it sent one.
        body: String,
        /// Delay requested by a `Retry-After` header.
        retry_after: Option<Duration>,
    },

    /// The API answered successfully but without a usable reply.
    #[error("Unexpected LLM response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Returns whether the failed call may succeed if attempted again.
    ///
    /// Timeouts, connection failures, `408`, `429` and `5xx` are retryable.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Request(e) if e.is_timeout() || e.is_connect() => {
                RetryPolicy::Retryable { after: None }
            }
            Self::Status {
                status,
                retry_after,
                ..
            } if *status == StatusCode::REQUEST_TIMEOUT
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

impl From<LlmError> for ClassificationServiceError {
    fn from(err: LlmError) -> Self {
        let retry = err.retry_policy();
        ClassificationServiceError::new(err.to_string(), retry)
    }
}
