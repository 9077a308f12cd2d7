//! Deterministic keyword classifier.
//!
//! The text is lower-cased once and then tested for substring containment
//! against three independent keyword sets: type, priority and topics. Every
//! input, including the empty string, yields a record.

use async_trait::async_trait;

use crate::{
    Classification, ClassificationRecord, Classifier, IssueType, Priority, Topic, TriageError,
};

const BUG_KEYWORDS: [&str; 3] = ["bug", "error", "issue"];
const FEATURE_KEYWORDS: [&str; 3] = ["feature", "enhancement", "request"];
const HIGH_PRIORITY_KEYWORDS: [&str; 3] = ["urgent", "critical", "high"];
const LOW_PRIORITY_KEYWORDS: [&str; 2] = ["low", "minor"];

/// Keyword-matching classifier with no external dependency.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedClassifier;

impl RuleBasedClassifier {
    /// Creates the classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classifies `issue_text`. Never fails.
    pub fn analyze(&self, issue_text: &str) -> ClassificationRecord {
        let content = issue_text.to_lowercase();
        let contains_any = |keywords: &[&str]| keywords.iter().any(|k| content.contains(k));

        // Checked in order; the first matching rule wins.
        let issue_type = if contains_any(&BUG_KEYWORDS) {
            IssueType::Bug
        } else if contains_any(&FEATURE_KEYWORDS) {
            IssueType::Feature
        } else {
            IssueType::Question
        };

        let priority = if contains_any(&HIGH_PRIORITY_KEYWORDS) {
            Priority::High
        } else if contains_any(&LOW_PRIORITY_KEYWORDS) {
            Priority::Low
        } else {
            Priority::Medium
        };

        let topics = Topic::VOCABULARY
            .iter()
            .filter(|(keyword, _)| content.contains(keyword))
            .map(|(_, topic)| *topic)
            .collect();

        ClassificationRecord {
            priority: Some(priority),
            topics,
            ..ClassificationRecord::new(issue_type)
        }
    }
}

#[async_trait]
impl Classifier for RuleBasedClassifier {
    async fn classify(&self, issue_text: &str) -> Result<Classification, TriageError> {
        let record = self.analyze(issue_text);
        tracing::debug!(
            issue_type = %record.issue_type,
            priority = ?record.priority,
            topics = ?record.topics,
            "Rule-based classification complete"
        );
        Ok(Classification::from_record(record))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn analyze(text: &str) -> ClassificationRecord {
        RuleBasedClassifier::new().analyze(text)
    }

    #[test]
    fn critical_docker_bug() {
        let record = analyze("Critical bug: app crashes on docker startup");
        assert_eq!(record.issue_type, IssueType::Bug);
        assert_eq!(record.priority, Some(Priority::High));
        assert_eq!(record.topics, vec![Topic::Docker]);
        assert!(record.explanation.is_none());
    }

    #[test]
    fn empty_text_uses_defaults() {
        let record = analyze("");
        assert_eq!(record.issue_type, IssueType::Question);
        assert_eq!(record.priority, Some(Priority::Medium));
        assert!(record.topics.is_empty());
    }

    #[test]
    fn each_bug_keyword_yields_bug() {
        for text in ["Found a BUG", "Error when saving", "Weird issue with login"] {
            assert_eq!(analyze(text).issue_type, IssueType::Bug, "{text}");
        }
    }

    #[test]
    fn bug_keywords_win_over_feature_keywords() {
        assert_eq!(
            analyze("Feature request: better error messages").issue_type,
            IssueType::Bug
        );
    }

    #[test]
    fn feature_keywords_yield_feature() {
        for text in ["New feature: dark mode", "Enhancement to the CLI", "Pull request template"] {
            assert_eq!(analyze(text).issue_type, IssueType::Feature, "{text}");
        }
    }

    #[test]
    fn high_priority_wins_over_low() {
        assert_eq!(
            analyze("urgent but minor typo").priority,
            Some(Priority::High)
        );
    }

    #[test]
    fn low_priority_keywords() {
        assert_eq!(analyze("minor typo in docs").priority, Some(Priority::Low));
        assert_eq!(analyze("Low on disk space?").priority, Some(Priority::Low));
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(analyze("How do I configure this?").priority, Some(Priority::Medium));
    }

    #[test]
    fn keyword_match_is_substring_based() {
        // "highlight" contains "high"; "tissue" contains "issue".
        let record = analyze("Please highlight the tissue sample");
        assert_eq!(record.issue_type, IssueType::Bug);
        assert_eq!(record.priority, Some(Priority::High));
    }

    #[test]
    fn topics_follow_vocabulary_order() {
        let record = analyze("Docker container fails TPM attestation; security and encryption at risk");
        assert_eq!(
            record.topics,
            vec![
                Topic::Tpm,
                Topic::Security,
                Topic::Encryption,
                Topic::Docker,
                Topic::Container,
            ]
        );
    }

    #[tokio::test]
    async fn trait_classification_has_no_reply_or_diagnostic() {
        let classification = RuleBasedClassifier::new()
            .classify("authentication request")
            .await
            .unwrap();
        assert_eq!(classification.record.issue_type, IssueType::Feature);
        assert_eq!(classification.record.topics, vec![Topic::Authentication]);
        assert!(classification.raw_reply.is_none());
        assert!(classification.diagnostic.is_none());
    }

    // Letters that cannot spell any type, priority or topic keyword.
    const NEUTRAL_TEXT: &str = "[0-9 ,.!?_/()-]{0,60}";

    fn cased(keyword: &str, upper: bool) -> String {
        if upper {
            keyword.to_uppercase()
        } else {
            keyword.to_string()
        }
    }

    proptest! {
        #[test]
        fn any_bug_keyword_yields_bug(
            prefix in "[a-zA-Z .,!?]{0,40}",
            keyword in prop::sample::select(BUG_KEYWORDS.to_vec()),
            upper in any::<bool>(),
            suffix in "[a-zA-Z .,!?]{0,40}"
        ) {
            let text = format!("{prefix}{}{suffix}", cased(keyword, upper));
            prop_assert_eq!(analyze(&text).issue_type, IssueType::Bug);
        }

        #[test]
        fn priority_follows_keyword_precedence(text in "\\PC{0,80}") {
            let lower = text.to_lowercase();
            let expected = if HIGH_PRIORITY_KEYWORDS.iter().any(|k| lower.contains(k)) {
                Priority::High
            } else if LOW_PRIORITY_KEYWORDS.iter().any(|k| lower.contains(k)) {
                Priority::Low
            } else {
                Priority::Medium
            };
            prop_assert_eq!(analyze(&text).priority, Some(expected));
        }

        #[test]
        fn high_keyword_wins_whatever_else_is_present(
            high in prop::sample::select(HIGH_PRIORITY_KEYWORDS.to_vec()),
            low in prop::sample::select(LOW_PRIORITY_KEYWORDS.to_vec()),
            high_first in any::<bool>(),
            filler in NEUTRAL_TEXT
        ) {
            let text = if high_first {
                format!("{high}{filler}{low}")
            } else {
                format!("{low}{filler}{high}")
            };
            prop_assert_eq!(analyze(&text).priority, Some(Priority::High));
        }

        #[test]
        fn text_without_keywords_gets_defaults(text in NEUTRAL_TEXT) {
            let record = analyze(&text);
            prop_assert_eq!(record.issue_type, IssueType::Question);
            prop_assert_eq!(record.priority, Some(Priority::Medium));
            prop_assert!(record.topics.is_empty());
        }
    }
}
