//! Issue triage orchestration.
//!
//! [`Dispatcher`] sequences one triage run: classify the issue text, render
//! the comment, post the comment, then apply the label.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The dispatcher sequences calls between business
//! logic in the [`triage`] crate and the port traits ([`triage::Classifier`],
//! [`triage::IssueStore`]). It contains no domain rules of its own.
//!
//! ## Partial failure
//!
//! Side effects are strictly ordered: the comment is always posted before the
//! label. If labelling fails after the comment was posted, the run still
//! returns its [`DispatchOutcome`] with [`DispatchOutcome::label_error`] set;
//! the posted comment is not rolled back.

mod dispatcher;

pub use dispatcher::{DispatchOutcome, Dispatcher};
