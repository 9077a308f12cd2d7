use std::sync::Arc;

use triage::{
    render_comment, ClassificationRecord, Classifier, IssueNumber, IssueStore, IssueType,
    PublishError, PublishStep, RepositoryId, TriageError,
};

/// Result of a triage run that posted its comment.
#[derive(Debug)]
pub struct DispatchOutcome {
    /// The classification that was published.
    pub record: ClassificationRecord,

    /// The comment body that was posted.
    pub comment: String,

    /// Set when the comment was posted but applying the label failed.
    pub label_error: Option<TriageError>,
}

impl DispatchOutcome {
    /// Returns the final classification type.
    pub fn issue_type(&self) -> IssueType {
        self.record.issue_type
    }

    /// Returns `true` if both the comment and the label were published.
    pub fn is_complete(&self) -> bool {
        self.label_error.is_none()
    }
}

/// Runs classify → render → comment → label for one issue.
#[derive(Clone)]
pub struct Dispatcher {
    classifier: Arc<dyn Classifier>,
    issues: Arc<dyn IssueStore>,
}

impl Dispatcher {
    /// Creates a dispatcher using `classifier` to decide and `issues` to
    /// publish.
    pub fn new(classifier: Arc<dyn Classifier>, issues: Arc<dyn IssueStore>) -> Self {
        Self { classifier, issues }
    }

    /// Triages one issue and publishes the result.
    ///
    /// # Errors
    ///
    /// - [`TriageError::Configuration`] if `issue_text` is blank.
    /// - [`TriageError::ClassificationService`] if the classifier's external
    ///   call fails.
    /// - [`TriageError::Publish`] if the issue lookup or the comment fails.
    ///
    /// A label failure is not an error; see [`DispatchOutcome::label_error`].
    #[tracing::instrument(skip_all, fields(repository = %repository, issue = %issue))]
    pub async fn process_issue(
        &self,
        issue_text: &str,
        repository: &RepositoryId,
        issue: IssueNumber,
    ) -> Result<DispatchOutcome, TriageError> {
        if issue_text.trim().is_empty() {
            return Err(TriageError::configuration("issue content is required"));
        }
        tracing::info!("Processing issue");

        let classification = self.classifier.classify(issue_text).await.inspect_err(|e| {
            tracing::error!(step = "classify", error = %e, "Classification failed");
        })?;
        if let Some(diagnostic) = &classification.diagnostic {
            tracing::warn!(
                step = "classify",
                diagnostic = %diagnostic,
                "Classification degraded to Uncertain"
            );
        }
        let record = classification.record;
        tracing::info!(
            issue_type = %record.issue_type,
            priority = ?record.priority,
            topics = ?record.topics,
            "Issue classified"
        );

        let comment = render_comment(&record);
        tracing::debug!(comment_len = comment.len(), "Rendered comment");

        let publish_error = |step: PublishStep| {
            move |source: PublishError| {
                let err = TriageError::Publish {
                    step,
                    repository: repository.clone(),
                    issue,
                    source,
                };
                tracing::error!(step = %step, error = %err, "Publishing failed");
                err
            }
        };

        let handle = self
            .issues
            .get_issue(repository, issue)
            .await
            .map_err(publish_error(PublishStep::FetchIssue))?;

        handle
            .add_comment(&comment)
            .await
            .map_err(publish_error(PublishStep::Comment))?;
        tracing::info!("Comment posted");

        let label = record.issue_type.label();
        let label_error = match handle.add_label(label).await {
            Ok(()) => {
                tracing::info!(label, "Label applied");
                None
            }
            Err(source) => Some(publish_error(PublishStep::Label)(source)),
        };

        Ok(DispatchOutcome {
            record,
            comment,
            label_error,
        })
    }
}
