//! The [`Classifier`] capability shared by both classification strategies.

use async_trait::async_trait;

use crate::{ClassificationRecord, TriageError};

/// Outcome of classifying one issue.
#[derive(Debug)]
pub struct Classification {
    /// The structured result. Always populated, even when the strategy had to
    /// fall back to [`crate::IssueType::Uncertain`].
    pub record: ClassificationRecord,

    /// The external service reply, for strategies that make one.
    pub raw_reply: Option<String>,

    /// A recovered failure that caused the record to degrade, kept so the
    /// caller can log or surface it.
    pub diagnostic: Option<TriageError>,
}

impl Classification {
    /// Wraps a record produced without any external call or diagnostic.
    pub fn from_record(record: ClassificationRecord) -> Self {
        Self {
            record,
            raw_reply: None,
            diagnostic: None,
        }
    }
}

/// Turns raw issue text into a [`ClassificationRecord`].
///
/// Implemented by [`crate::RuleBasedClassifier`] and
/// [`crate::ModelBasedClassifier`]. The dispatcher depends only on this trait.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classifies `issue_text`.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::ClassificationService`] if an external call the
    /// strategy depends on fails. Unreadable replies never produce an error
    /// here; they degrade to an `Uncertain` record with a diagnostic.
    async fn classify(&self, issue_text: &str) -> Result<Classification, TriageError>;
}
