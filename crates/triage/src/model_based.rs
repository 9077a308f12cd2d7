//! Classifier that delegates to an external language model.
//!
//! Getting a reply ([`ClassificationService::complete`]) and reading it
//! ([`parse_reply`]) are separate steps so the reply format can be tested with
//! fixture strings alone.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde_json::{Map, Value};

use crate::{
    Classification, ClassificationRecord, ClassificationService, Classifier, IssueType, Priority,
    TriageError,
};

/// Instruction sent as the system message on every call.
pub const SYSTEM_INSTRUCTION: &str = r#"You are a helpful software engineering assistant that triages work items.

You will be given the text of a work item. Decide whether it is a bug, a story or a feature:
- Respond with "Bug" if it describes a defect in existing code that needs to be fixed. Bugs usually
  include details such as error messages, unexpected behaviour or steps to reproduce.
- Respond with "Story" if it is a user story.
- Respond with "Feature" if it requests new functionality.
- Respond with "Uncertain" if you cannot decide, and explain why.

If the work item is a bug, identify the likely root cause and suggest resolution steps. If you cannot
suggest a resolution, list the questions you would need answered first.
If the work item states a priority, include it as "High", "Medium" or "Low".

Reply with a single JSON object in a ```json fenced code block, using exactly these keys:
```json
{
  "classification": "Bug | Story | Feature | Uncertain",
  "explanation": "Brief explanation of the classification decision.",
  "priority": "Optional: High | Medium | Low",
  "resolution": "Optional: resolution steps or suggestions.",
  "questions": "Optional: questions for the reporter when no resolution can be given."
}
```"#;

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?i:json)\s*(\{.*?\})\s*```").expect("fenced JSON pattern is valid")
});

/// Builds the user instruction for `issue_text`.
pub fn user_instruction(issue_text: &str) -> String {
    format!("Classify the following work item:\n{issue_text}")
}

/// Returns the JSON payload of a model reply.
///
/// Prefers the first ```` ```json ```` fenced block containing an object, with
/// the tag matched case-insensitively. Otherwise returns the whole reply,
/// trimmed.
pub fn extract_json_payload(reply: &str) -> &str {
    FENCED_JSON
        .captures(reply)
        .and_then(|c| c.get(1))
        .map_or_else(|| reply.trim(), |m| m.as_str())
}

/// Parses a model reply into a [`ClassificationRecord`].
///
/// `classification` is matched case-insensitively; unrecognised values give
/// [`IssueType::Uncertain`]. The other fields are copied as text: arrays are
/// joined one item per line and other non-string values are written as JSON.
/// Blank fields are treated as absent, and a priority that is not one of
/// `High`, `Medium` or `Low` is dropped.
///
/// # Errors
///
/// Returns [`TriageError::MalformedClassificationReply`] carrying the raw
/// reply if the payload is not a JSON object or has no string
/// `classification`.
pub fn parse_reply(reply: &str) -> Result<ClassificationRecord, TriageError> {
    let malformed = |reason: String| TriageError::MalformedClassificationReply {
        reason,
        raw_reply: reply.to_string(),
    };

    let payload: Value = serde_json::from_str(extract_json_payload(reply))
        .map_err(|e| malformed(format!("reply is not valid JSON: {e}")))?;
    let Value::Object(fields) = payload else {
        return Err(malformed("reply is not a JSON object".to_string()));
    };

    let classification = fields
        .get("classification")
        .and_then(Value::as_str)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| malformed("reply has no `classification` value".to_string()))?;

    let priority = match fields.get("priority") {
        None | Some(Value::Null) => None,
        Some(Value::String(p)) if p.trim().is_empty() => None,
        Some(value) => {
            let parsed = value.as_str().and_then(Priority::parse);
            if parsed.is_none() {
                tracing::warn!(priority = %value, "Ignoring unrecognised priority in model reply");
            }
            parsed
        }
    };

    Ok(ClassificationRecord {
        priority,
        explanation: text_field(&fields, "explanation"),
        resolution: text_field(&fields, "resolution"),
        questions: text_field(&fields, "questions"),
        ..ClassificationRecord::new(IssueType::parse_lenient(classification))
    })
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    let text = match fields.get(key)? {
        Value::Null => return None,
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .filter(|item| !item.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        value => value_text(value),
    };
    Some(text).filter(|t| !t.trim().is_empty())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Classifier backed by a [`ClassificationService`].
#[derive(Clone)]
pub struct ModelBasedClassifier {
    service: Arc<dyn ClassificationService>,
}

impl ModelBasedClassifier {
    /// Creates a classifier that sends every request to `service`.
    pub fn new(service: Arc<dyn ClassificationService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Classifier for ModelBasedClassifier {
    #[tracing::instrument(skip_all, fields(issue_len = issue_text.len()))]
    async fn classify(&self, issue_text: &str) -> Result<Classification, TriageError> {
        let reply = self
            .service
            .complete(SYSTEM_INSTRUCTION, &user_instruction(issue_text))
            .await?;
        tracing::info!(reply = %reply, "Received classification reply");

        match parse_reply(&reply) {
            Ok(record) => Ok(Classification {
                record,
                raw_reply: Some(reply),
                diagnostic: None,
            }),
            Err(err) => {
                tracing::warn!(error = %err, "Model reply unreadable; classifying as Uncertain");
                let record = ClassificationRecord::uncertain(format!(
                    "The classification reply could not be read ({err}). Raw reply: {reply}"
                ));
                Ok(Classification {
                    record,
                    raw_reply: Some(reply),
                    diagnostic: Some(err),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{ClassificationServiceError, RetryPolicy};

    struct FixedReply {
        reply: Result<String, ClassificationServiceError>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl FixedReply {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ClassificationService for FixedReply {
        async fn complete(
            &self,
            system_instruction: &str,
            user_instruction: &str,
        ) -> Result<String, ClassificationServiceError> {
            self.prompts
                .lock()
                .unwrap()
                .push((system_instruction.to_string(), user_instruction.to_string()));
            self.reply.clone()
        }
    }

    #[test]
    fn extracts_fenced_json_block() {
        let reply = "Here you go:\n```json\n{\"classification\": \"Bug\"}\n```\nThanks!";
        assert_eq!(extract_json_payload(reply), "{\"classification\": \"Bug\"}");
    }

    #[test]
    fn falls_back_to_whole_reply() {
        assert_eq!(
            extract_json_payload("  {\"classification\": \"Feature\"}\n"),
            "{\"classification\": \"Feature\"}"
        );
    }

    #[test]
    fn fenced_block_with_nested_braces() {
        let reply = "```json\n{\"classification\": \"Bug\", \"explanation\": \"map {a} fails\"}\n```";
        let record = parse_reply(reply).unwrap();
        assert_eq!(record.explanation.as_deref(), Some("map {a} fails"));
    }

    #[test]
    fn parses_bug_reply() {
        let reply = "```json\n{\"classification\":\"Bug\",\"explanation\":\"NPE on login\"}\n```";
        let record = parse_reply(reply).unwrap();
        assert_eq!(record.issue_type, IssueType::Bug);
        assert_eq!(record.explanation.as_deref(), Some("NPE on login"));
        assert!(record.priority.is_none());
        assert!(record.topics.is_empty());
    }

    #[test]
    fn parses_all_optional_fields() {
        let reply = r#"{
            "classification": "bug",
            "explanation": "Crash in parser",
            "priority": "high",
            "resolution": "Guard against empty input.",
            "questions": "Which version?"
        }"#;
        let record = parse_reply(reply).unwrap();
        assert_eq!(record.issue_type, IssueType::Bug);
        assert_eq!(record.priority, Some(Priority::High));
        assert_eq!(record.resolution.as_deref(), Some("Guard against empty input."));
        assert_eq!(record.questions.as_deref(), Some("Which version?"));
    }

    #[test]
    fn unknown_classification_is_uncertain() {
        let record = parse_reply(r#"{"classification": "Epic", "explanation": "Too broad"}"#).unwrap();
        assert_eq!(record.issue_type, IssueType::Uncertain);
        assert_eq!(record.explanation.as_deref(), Some("Too broad"));
    }

    #[test]
    fn unknown_priority_and_blank_fields_are_dropped() {
        let record =
            parse_reply(r#"{"classification": "Feature", "priority": "P1", "explanation": "  "}"#)
                .unwrap();
        assert_eq!(record.issue_type, IssueType::Feature);
        assert!(record.priority.is_none());
        assert!(record.explanation.is_none());
    }

    #[test]
    fn prose_reply_is_malformed_and_keeps_raw_text() {
        let reply = "I think this is probably a bug.";
        match parse_reply(reply) {
            Err(TriageError::MalformedClassificationReply { raw_reply, .. }) => {
                assert_eq!(raw_reply, reply);
            }
            other => panic!("expected malformed reply, got {other:?}"),
        }
    }

    #[test]
    fn upper_case_fence_tag_is_recognised() {
        let reply = "Result:\n```JSON\n{\"classification\": \"Feature\"}\n```";
        assert_eq!(extract_json_payload(reply), "{\"classification\": \"Feature\"}");
        assert_eq!(parse_reply(reply).unwrap().issue_type, IssueType::Feature);
    }

    #[test]
    fn question_list_is_kept_one_per_line() {
        let reply = "```json\n{\"classification\":\"Bug\",\"explanation\":\"NPE\",\"questions\":[\"Which version?\",\"Which OS?\"]}\n```";
        let record = parse_reply(reply).unwrap();
        assert_eq!(record.issue_type, IssueType::Bug);
        assert_eq!(record.explanation.as_deref(), Some("NPE"));
        assert_eq!(record.questions.as_deref(), Some("Which version?\nWhich OS?"));
    }

    #[test]
    fn non_string_fields_do_not_reject_the_reply() {
        let record = parse_reply(
            r#"{"classification": "Feature", "priority": 1, "resolution": {"step": "upgrade"}, "explanation": null}"#,
        )
        .unwrap();
        assert_eq!(record.issue_type, IssueType::Feature);
        assert!(record.priority.is_none());
        assert_eq!(record.resolution.as_deref(), Some(r#"{"step":"upgrade"}"#));
        assert!(record.explanation.is_none());
    }

    #[test]
    fn non_object_or_non_string_classification_is_malformed() {
        for reply in [r#"["Bug"]"#, r#"{"classification": 3}"#] {
            let err = parse_reply(reply).unwrap_err();
            assert!(
                matches!(err, TriageError::MalformedClassificationReply { .. }),
                "{reply}"
            );
        }
    }

    #[test]
    fn missing_classification_is_malformed() {
        let err = parse_reply(r#"{"explanation": "no decision"}"#).unwrap_err();
        assert!(matches!(err, TriageError::MalformedClassificationReply { .. }));
    }

    #[tokio::test]
    async fn classify_sends_fixed_prompts() {
        let service = FixedReply::ok("{\"classification\": \"Story\"}");
        let classifier = ModelBasedClassifier::new(service.clone());

        let classification = classifier.classify("As a user I want exports").await.unwrap();

        assert_eq!(classification.record.issue_type, IssueType::Story);
        let prompts = service.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].0, SYSTEM_INSTRUCTION);
        assert_eq!(
            prompts[0].1,
            "Classify the following work item:\nAs a user I want exports"
        );
    }

    #[tokio::test]
    async fn classify_degrades_prose_to_uncertain() {
        let reply = "Sorry, I cannot help with that.";
        let classifier = ModelBasedClassifier::new(FixedReply::ok(reply));

        let classification = classifier.classify("anything").await.unwrap();

        assert_eq!(classification.record.issue_type, IssueType::Uncertain);
        assert!(classification.record.explanation.unwrap().contains(reply));
        assert_eq!(classification.raw_reply.as_deref(), Some(reply));
        match classification.diagnostic {
            Some(TriageError::MalformedClassificationReply { raw_reply, .. }) => {
                assert_eq!(raw_reply, reply)
            }
            other => panic!("expected diagnostic, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn classify_propagates_service_failure() {
        let service = Arc::new(FixedReply {
            reply: Err(ClassificationServiceError::new(
                "connection refused",
                RetryPolicy::Retryable { after: None },
            )),
            prompts: Mutex::new(Vec::new()),
        });
        let classifier = ModelBasedClassifier::new(service);

        let err = classifier.classify("anything").await.unwrap_err();

        assert!(matches!(err, TriageError::ClassificationService(_)));
    }
}
