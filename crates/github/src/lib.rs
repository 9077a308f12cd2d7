//! Issue triage GitHub infrastructure adapter.
//!
//! Implements the issue-facing ports defined in the [`triage`] crate
//! ([`triage::IssueStore`], [`triage::IssueHandle`]) over the GitHub REST API.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. All GitHub
//! API details (authentication headers, API versioning, rate-limit
//! detection) are handled here; the [`triage`] crate never sees them.

mod client;
mod config;
mod error;

pub use client::{GitHubClient, GitHubIssue};
pub use config::{GitHubConfig, DEFAULT_API_URL};
pub use error::GitHubError;
