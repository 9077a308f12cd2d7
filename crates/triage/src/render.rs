//! Renders a [`ClassificationRecord`] into the Markdown comment posted on the
//! issue.
//!
//! Rendering is pure: the same record always produces byte-identical output,
//! whichever classifier produced it.

use std::fmt::Write as _;

use crate::{ClassificationRecord, IssueType, Topic};

const GREETING: &str = "Thank you for this issue!";

const BUG_STEPS: &str = "This appears to be a bug report. The development team will:
1. Review the issue details
2. Reproduce the issue if possible
3. Investigate the root cause
4. Provide a fix or workaround
";

const FEATURE_STEPS: &str = "This appears to be a feature request. The team will:
1. Evaluate the request against project goals
2. Assess implementation complexity
3. Consider adding it to the roadmap
4. Provide feedback on feasibility
";

const CLARIFICATION_STEPS: &str =
    "This appears to be a question or general issue. The team will:
1. Review the details provided
2. Provide clarification or guidance
3. Update documentation if needed
";

const TPM_HINTS: &str = "Since this relates to TPM functionality, please ensure you have:
- TPM hardware or software available
- Proper permissions for TPM operations
- The latest release installed
";

const DOCKER_HINTS: &str = "For Docker-related issues, please provide:
- Docker version information
- Container logs if applicable
- Environment details
";

/// Returns the comment body for `record`.
pub fn render_comment(record: &ClassificationRecord) -> String {
    let mut comment = String::new();

    let _ = write!(comment, "{GREETING}\n\n## Analysis Results\n\n");
    let _ = writeln!(comment, "- Type: {}", record.issue_type);
    if let Some(priority) = record.priority {
        let _ = writeln!(comment, "- Priority: {priority}");
    }
    if !record.topics.is_empty() {
        let topics: Vec<&str> = record.topics.iter().map(|t| t.as_str()).collect();
        let _ = writeln!(comment, "- Topics: {}", topics.join(", "));
    }
    if let Some(explanation) = &record.explanation {
        let _ = writeln!(comment, "- Explanation: {explanation}");
    }

    comment.push_str("\n## Next Steps\n\n");
    comment.push_str(next_steps(record.issue_type));

    if let Some(resolution) = &record.resolution {
        let _ = write!(comment, "\n## Suggested Resolution\n\n{resolution}\n");
    }
    if let Some(questions) = &record.questions {
        let _ = write!(comment, "\n## Questions\n\n{questions}\n");
    }

    let hints: Vec<&str> = [(Topic::Tpm, TPM_HINTS), (Topic::Docker, DOCKER_HINTS)]
        .into_iter()
        .filter(|(topic, _)| record.topics.contains(topic))
        .map(|(_, hint)| hint)
        .collect();
    if !hints.is_empty() {
        comment.push_str("\n## Additional Information\n\n");
        comment.push_str(&hints.join("\n"));
    }

    comment
}

fn next_steps(issue_type: IssueType) -> &'static str {
    match issue_type {
        IssueType::Bug => BUG_STEPS,
        IssueType::Feature => FEATURE_STEPS,
        IssueType::Story | IssueType::Question | IssueType::Uncertain => CLARIFICATION_STEPS,
    }
}
