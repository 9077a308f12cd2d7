//! Issue triage domain.
//!
//! This crate turns unstructured issue text into a [`ClassificationRecord`]
//! and renders that record into the comment posted back on the issue. It is
//! the only crate with decision logic; infrastructure crates implement the
//! port traits defined here and add no domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RepositoryId`, `IssueNumber`, `TriageRunId`) |
//! | [`types`] | `ClassificationRecord` and its value types |
//! | [`errors`] | Error taxonomy and retry policy |
//! | [`ports`] | Capability traits implemented by the `llm` and `github` crates |
//! | [`classifier`] | The `Classifier` trait shared by both strategies |
//! | [`rule_based`] | Deterministic keyword classifier |
//! | [`model_based`] | Language-model classifier: prompt construction and reply parsing |
//! | [`render`] | Comment renderer |

pub mod classifier;
pub mod errors;
pub mod identifiers;
pub mod model_based;
pub mod ports;
pub mod render;
pub mod rule_based;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use classifier::{Classification, Classifier};
pub use errors::{ClassificationServiceError, PublishError, PublishStep, RetryPolicy, TriageError};
pub use identifiers::{IssueNumber, RepositoryId, TriageRunId};
pub use model_based::{
    extract_json_payload, parse_reply, user_instruction, ModelBasedClassifier, SYSTEM_INSTRUCTION,
};
pub use ports::{ClassificationService, IssueHandle, IssueStore};
pub use render::render_comment;
pub use rule_based::RuleBasedClassifier;
pub use types::{ClassificationRecord, IssueType, Priority, Topic};
