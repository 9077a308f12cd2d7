//! Capability interfaces implemented by infrastructure crates.
//!
//! The `llm` crate implements [`ClassificationService`]; the `github` crate
//! implements [`IssueStore`] and [`IssueHandle`]. Tests substitute in-memory
//! fakes.

use async_trait::async_trait;

use crate::{ClassificationServiceError, IssueNumber, PublishError, RepositoryId};

/// A hosted natural-language model that answers one instruction pair.
#[async_trait]
pub trait ClassificationService: Send + Sync {
    /// Sends `system_instruction` and `user_instruction` once and returns the
    /// model's reply text.
    ///
    /// # Errors
    ///
    /// Returns [`ClassificationServiceError`] if the call fails (network,
    /// auth, quota, unexpected response shape).
    async fn complete(
        &self,
        system_instruction: &str,
        user_instruction: &str,
    ) -> Result<String, ClassificationServiceError>;
}

/// Looks up issues on the source-control host.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Returns a handle to an existing issue.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] if the issue does not exist or cannot be read.
    async fn get_issue(
        &self,
        repository: &RepositoryId,
        issue: IssueNumber,
    ) -> Result<Box<dyn IssueHandle>, PublishError>;
}

/// Write access to a single issue.
#[async_trait]
pub trait IssueHandle: Send + Sync {
    /// Posts a comment with the given Markdown body.
    async fn add_comment(&self, body: &str) -> Result<(), PublishError>;

    /// Applies a label, creating it on the repository if needed.
    async fn add_label(&self, name: &str) -> Result<(), PublishError>;
}
