//! Classification record and its value types.
//!
//! [`ClassificationRecord`] is the single structured output of every
//! classifier. The renderer and dispatcher only ever see this type, never the
//! classifier that produced it.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Issue type
// ---------------------------------------------------------------------------

/// What kind of report an issue is.
///
/// Parsing is case-insensitive so that `"bug"`, `"Bug"` and `" BUG "` all
/// produce [`IssueType::Bug`]. Anything unrecognised is [`IssueType::Uncertain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueType {
    /// A defect in existing behaviour.
    Bug,
    /// A request for new behaviour.
    Feature,
    /// A user story.
    Story,
    /// A general question or discussion.
    Question,
    /// The classifier could not decide, or its output could not be read.
    Uncertain,
}

impl IssueType {
    /// Parses a free-form classification string, falling back to
    /// [`IssueType::Uncertain`] for anything unrecognised.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "bug" => Self::Bug,
            "feature" => Self::Feature,
            "story" => Self::Story,
            "question" => Self::Question,
            _ => Self::Uncertain,
        }
    }

    /// Returns the capitalised display name (e.g. `"Bug"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "Bug",
            Self::Feature => "Feature",
            Self::Story => "Story",
            Self::Question => "Question",
            Self::Uncertain => "Uncertain",
        }
    }

    /// Returns the issue label name applied for this type (e.g. `"bug"`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Feature => "feature",
            Self::Story => "story",
            Self::Question => "question",
            Self::Uncertain => "uncertain",
        }
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Triage priority of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Needs attention first.
    High,
    /// Default priority.
    Medium,
    /// Can wait.
    Low,
}

impl Priority {
    /// Parses a priority case-insensitively. Returns `None` if unrecognised.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Returns the capitalised display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// A domain tag detected in the issue text.
///
/// The variant order is the fixed vocabulary order; records always list
/// topics in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// Trusted Platform Module.
    #[serde(rename = "TPM")]
    Tpm,
    Security,
    Authentication,
    Encryption,
    Docker,
    Container,
}

impl Topic {
    /// Every topic paired with the lower-case keyword that detects it, in
    /// vocabulary order.
    pub const VOCABULARY: [(&'static str, Topic); 6] = [
        ("tpm", Topic::Tpm),
        ("security", Topic::Security),
        ("authentication", Topic::Authentication),
        ("encryption", Topic::Encryption),
        ("docker", Topic::Docker),
        ("container", Topic::Container),
    ];

    /// Returns the tag as shown to users (e.g. `"TPM"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tpm => "TPM",
            Self::Security => "Security",
            Self::Authentication => "Authentication",
            Self::Encryption => "Encryption",
            Self::Docker => "Docker",
            Self::Container => "Container",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Classification record
// ---------------------------------------------------------------------------

/// Structured result of triaging one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    /// The decided issue type. Always present.
    pub issue_type: IssueType,

    /// Priority, if the classifier produced one.
    pub priority: Option<Priority>,

    /// Detected topics in vocabulary order. May be empty.
    pub topics: Vec<Topic>,

    /// Human-readable rationale for the classification.
    pub explanation: Option<String>,

    /// Suggested fix steps. Only meaningful for bugs.
    pub resolution: Option<String>,

    /// Clarifying questions, used when no resolution could be given.
    pub questions: Option<String>,
}

impl ClassificationRecord {
    /// Creates a record of the given type with every optional field empty.
    pub fn new(issue_type: IssueType) -> Self {
        Self {
            issue_type,
            priority: None,
            topics: Vec::new(),
            explanation: None,
            resolution: None,
            questions: None,
        }
    }

    /// Creates an [`IssueType::Uncertain`] record carrying a diagnostic
    /// explanation.
    pub fn uncertain(explanation: impl Into<String>) -> Self {
        Self {
            explanation: Some(explanation.into()),
            ..Self::new(IssueType::Uncertain)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_type_parsing_ignores_case_and_whitespace() {
        assert_eq!(IssueType::parse_lenient("bug"), IssueType::Bug);
        assert_eq!(IssueType::parse_lenient(" BUG "), IssueType::Bug);
        assert_eq!(IssueType::parse_lenient("Feature"), IssueType::Feature);
        assert_eq!(IssueType::parse_lenient("story"), IssueType::Story);
        assert_eq!(IssueType::parse_lenient("QUESTION"), IssueType::Question);
    }

    #[test]
    fn unknown_issue_type_is_uncertain() {
        assert_eq!(IssueType::parse_lenient("enhancement"), IssueType::Uncertain);
        assert_eq!(IssueType::parse_lenient(""), IssueType::Uncertain);
    }

    #[test]
    fn issue_type_label_is_lower_case() {
        assert_eq!(IssueType::Bug.label(), "bug");
        assert_eq!(IssueType::Uncertain.to_string(), "Uncertain");
    }

    #[test]
    fn priority_parse() {
        assert_eq!(Priority::parse("high"), Some(Priority::High));
        assert_eq!(Priority::parse("Medium"), Some(Priority::Medium));
        assert_eq!(Priority::parse(" LOW"), Some(Priority::Low));
        assert_eq!(Priority::parse("P1"), None);
    }

    #[test]
    fn topics_sort_in_vocabulary_order() {
        let mut topics = vec![Topic::Container, Topic::Tpm, Topic::Docker];
        topics.sort();
        assert_eq!(topics, vec![Topic::Tpm, Topic::Docker, Topic::Container]);
    }

    #[test]
    fn record_serialises_topics_by_display_name() {
        let mut record = ClassificationRecord::new(IssueType::Bug);
        record.topics = vec![Topic::Tpm];
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["topics"][0], "TPM");
        assert_eq!(json["issue_type"], "Bug");
    }

    #[test]
    fn uncertain_record_keeps_explanation() {
        let record = ClassificationRecord::uncertain("no JSON");
        assert_eq!(record.issue_type, IssueType::Uncertain);
        assert_eq!(record.explanation.as_deref(), Some("no JSON"));
        assert!(record.priority.is_none());
    }
}
