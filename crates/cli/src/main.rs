//! Issue triage CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: read flags / GitHub Action inputs into
//!    [`config::Config`] and validate them before any network call.
//! 2. **Wire observability**: install the `tracing-subscriber` stack (and the
//!    OTLP exporter when configured). See [`telemetry`].
//! 3. **Construct infrastructure**: build the `GitHubClient` and, for the
//!    model strategy, the `ChatCompletionsClient`, and inject them into the
//!    [`dispatch::Dispatcher`].
//! 4. **Report**: exit `0` on success, `1` on failure, `2` when the comment
//!    was posted but labelling failed, and write `result`/`status` step
//!    outputs when running under GitHub Actions.

mod config;
mod outputs;
mod telemetry;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use dispatch::{DispatchOutcome, Dispatcher};
use github::GitHubClient;
use llm::ChatCompletionsClient;
use tracing::Instrument;
use triage::{Classifier, ModelBasedClassifier, RuleBasedClassifier, TriageError, TriageRunId};

use crate::config::{ClassifierSettings, Config};
use crate::outputs::{ActionOutputs, RunStatus};
use crate::telemetry::Telemetry;

const EXIT_PARTIAL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    let telemetry = match Telemetry::init(config.log_format) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    let run_id = TriageRunId::new_random();
    let code = run(config)
        .instrument(tracing::info_span!("triage_run", run_id = %run_id))
        .await;

    telemetry.shutdown();
    code
}

async fn run(config: Config) -> ExitCode {
    let outputs = ActionOutputs::from_env();

    let (result, status, code) = match triage_issue(config).await {
        Ok(outcome) => {
            let issue_type = outcome.issue_type();
            match &outcome.label_error {
                None => {
                    tracing::info!(issue_type = %issue_type, "Issue processing completed");
                    (issue_type.to_string(), RunStatus::Success, ExitCode::SUCCESS)
                }
                Some(label_error) => {
                    tracing::error!(
                        issue_type = %issue_type,
                        error = %label_error,
                        retryable = label_error.retry_policy().is_retryable(),
                        "Comment posted but labelling failed"
                    );
                    (
                        issue_type.to_string(),
                        RunStatus::Partial,
                        ExitCode::from(EXIT_PARTIAL),
                    )
                }
            }
        }
        Err(err) => {
            let retryable = err
                .downcast_ref::<TriageError>()
                .map(|e| e.retry_policy().is_retryable())
                .unwrap_or(false);
            tracing::error!(error = %format!("{err:#}"), retryable, "Issue processing failed");
            (format!("Error: {err}"), RunStatus::Error, ExitCode::FAILURE)
        }
    };

    if let Err(e) = outputs.write(&result, status) {
        tracing::warn!(error = %e, "Failed to write step outputs");
    }
    code
}

async fn triage_issue(config: Config) -> Result<DispatchOutcome> {
    let settings = config.validate()?;

    let classifier: Arc<dyn Classifier> = match settings.classifier {
        ClassifierSettings::Rules => Arc::new(RuleBasedClassifier::new()),
        ClassifierSettings::Model(llm_config) => {
            let service = ChatCompletionsClient::new(llm_config)?;
            Arc::new(ModelBasedClassifier::new(Arc::new(service)))
        }
    };
    let issues = Arc::new(GitHubClient::new(settings.github)?);
    let dispatcher = Dispatcher::new(classifier, issues);

    let outcome = dispatcher
        .process_issue(&settings.issue_content, &settings.repository, settings.issue)
        .await?;
    tracing::debug!(
        record = %serde_json::to_string(&outcome.record).unwrap_or_default(),
        "Published classification"
    );
    Ok(outcome)
}
