//! Error and retry-policy types for the triage domain.
//!
//! [`TriageError`] is what a triage run returns to its caller. The two port
//! error types ([`ClassificationServiceError`], [`PublishError`]) are what the
//! infrastructure adapters return; the dispatcher wraps them with the failing
//! step and the issue being processed.
//!
//! [`RetryPolicy`] is a cross-cutting concern: nothing inside the workspace
//! retries, but every error can tell the caller's automation whether
//! re-running the invocation is worth it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{IssueNumber, RepositoryId};

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// - `Retryable` errors: timeouts, connection failures, rate-limit and 5xx
///   responses.
/// - `NonRetryable` errors: bad credentials, missing issue, invalid
///   configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt, usually taken from a
        /// `Retry-After` header. `None` means apply the caller's own schedule.
        after: Option<Duration>,
    },
    /// The operation must not be retried without a human changing something.
    NonRetryable,
}

impl RetryPolicy {
    /// Returns `true` for [`RetryPolicy::Retryable`].
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable { .. })
    }
}

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

/// The external classification service could not produce a reply
/// (network, authentication, quota).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClassificationServiceError {
    /// Description of the failure.
    pub message: String,
    /// Whether the call may succeed if attempted again.
    pub retry: RetryPolicy,
}

impl ClassificationServiceError {
    /// Creates an error with the given retry policy.
    pub fn new(message: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            message: message.into(),
            retry,
        }
    }
}

/// A source-control call (issue lookup, comment, label) failed.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PublishError {
    /// Description of the failure.
    pub message: String,
    /// Whether the call may succeed if attempted again.
    pub retry: RetryPolicy,
}

impl PublishError {
    /// Creates an error with the given retry policy.
    pub fn new(message: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            message: message.into(),
            retry,
        }
    }
}

// ---------------------------------------------------------------------------
// Triage errors
// ---------------------------------------------------------------------------

/// The source-control step that was running when a [`PublishError`] occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStep {
    /// Looking up the issue.
    FetchIssue,
    /// Posting the analysis comment.
    Comment,
    /// Applying the classification label.
    Label,
}

impl std::fmt::Display for PublishStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::FetchIssue => "issue lookup",
            Self::Comment => "comment",
            Self::Label => "label",
        })
    }
}

/// Errors returned by a triage run.
#[derive(Debug, Error)]
pub enum TriageError {
    /// The external classification call failed. Fatal for the invocation.
    #[error("Classification service failed: {0}")]
    ClassificationService(#[from] ClassificationServiceError),

    /// The model reply could not be read as the expected JSON structure.
    ///
    /// The model-based classifier recovers from this by degrading to an
    /// `Uncertain` record; the error itself is kept as a diagnostic.
    #[error("Malformed classification reply: {reason}")]
    MalformedClassificationReply {
        /// Why parsing failed.
        reason: String,
        /// The reply text exactly as received.
        raw_reply: String,
    },

    /// A source-control call failed. Side effects already committed (e.g. a
    /// posted comment) are not rolled back.
    #[error("Publishing {step} to {repository}#{issue} failed: {source}")]
    Publish {
        /// The step that failed.
        step: PublishStep,
        /// Repository of the issue being processed.
        repository: RepositoryId,
        /// Issue being processed.
        issue: IssueNumber,
        /// Underlying adapter error.
        #[source]
        source: PublishError,
    },

    /// Required input is absent or invalid. Raised before any work begins.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

impl TriageError {
    /// Shorthand for [`TriageError::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns whether re-running the failed operation may succeed.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::ClassificationService(e) => e.retry.clone(),
            Self::Publish { source, .. } => source.retry.clone(),
            Self::MalformedClassificationReply { .. } => RetryPolicy::Retryable { after: None },
            Self::Configuration { .. } => RetryPolicy::NonRetryable,
        }
    }
}
