//! Process configuration.
//!
//! Every value can come from a command-line flag or from the environment
//! variable GitHub Actions sets for the matching action input. [`Config`] is
//! parsed once in `main` and validated into [`Settings`]; nothing else in
//! the workspace reads the environment.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use github::{GitHubConfig, DEFAULT_API_URL};
use llm::{
    ApiFlavor, ChatCompletionsConfig, DEFAULT_AZURE_API_VERSION, DEFAULT_OPENAI_ENDPOINT,
    DEFAULT_TIMEOUT,
};
use triage::{IssueNumber, RepositoryId, TriageError};

/// Which classification strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClassifierKind {
    /// Deterministic keyword matching. Needs no credentials.
    Rules,
    /// External language model via the chat-completions API.
    Model,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Raw command-line and environment input.
#[derive(Debug, Parser)]
#[command(
    name = "issue-triage",
    version,
    about = "Classify a GitHub issue, comment with the analysis, and label it."
)]
pub struct Config {
    /// Issue title and body to classify.
    #[arg(long, env = "INPUT_ISSUE_CONTENT", hide_env_values = true)]
    pub issue_content: Option<String>,

    /// GitHub token with permission to comment on and label issues.
    #[arg(long, env = "INPUT_GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Repository in `owner/repo` form.
    #[arg(long, env = "INPUT_REPOSITORY")]
    pub repository: Option<String>,

    /// Issue number.
    #[arg(long, env = "INPUT_ISSUE_NUMBER")]
    pub issue_number: Option<String>,

    /// Classification strategy.
    #[arg(long, env = "INPUT_CLASSIFIER", value_enum, default_value_t = ClassifierKind::Rules)]
    pub classifier: ClassifierKind,

    /// GitHub REST API base URL.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub github_api_url: String,

    /// Chat-completions API flavour: `azure` or `openai`.
    #[arg(long, env = "INPUT_AZURE_OPENAI_API_TYPE", default_value = "azure")]
    pub openai_api_type: String,

    /// Chat-completions endpoint. Defaults to the public OpenAI API for
    /// `openai`; required for `azure`.
    #[arg(long, env = "INPUT_AZURE_OPENAI_ENDPOINT")]
    pub openai_endpoint: Option<String>,

    /// Chat-completions API key.
    #[arg(long, env = "INPUT_AZURE_OPENAI_KEY", hide_env_values = true)]
    pub openai_key: Option<String>,

    /// Azure OpenAI REST API version.
    #[arg(long, env = "INPUT_AZURE_OPENAI_API_VERSION", default_value = DEFAULT_AZURE_API_VERSION)]
    pub openai_api_version: String,

    /// Azure deployment name, or model name for `openai`.
    #[arg(long, env = "INPUT_AZURE_OPENAI_DEPLOYMENT")]
    pub openai_deployment: Option<String>,

    /// Timeout for each HTTP request, in seconds.
    #[arg(long, env = "INPUT_HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub http_timeout_secs: u64,

    /// Log output format.
    #[arg(long, env = "TRIAGE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,
}

/// Classifier choice with the settings it needs.
#[derive(Debug, Clone)]
pub enum ClassifierSettings {
    Rules,
    Model(ChatCompletionsConfig),
}

/// Validated configuration for one triage run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub issue_content: String,
    pub repository: RepositoryId,
    pub issue: IssueNumber,
    pub github: GitHubConfig,
    pub classifier: ClassifierSettings,
}

impl Config {
    /// Checks required inputs and builds [`Settings`].
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Configuration`] naming the first missing or
    /// invalid value.
    pub fn validate(self) -> Result<Settings, TriageError> {
        let issue_content = required(self.issue_content, "issue content")?;
        let github_token = required(self.github_token, "GitHub token")?;

        let repository = required(self.repository, "repository")?;
        let repository = RepositoryId::new(repository.trim()).ok_or_else(|| {
            TriageError::configuration(format!(
                "repository must be in format owner/repo, got '{repository}'"
            ))
        })?;

        let issue_number = required(self.issue_number, "issue number")?;
        let issue = issue_number
            .trim()
            .parse::<u64>()
            .ok()
            .and_then(IssueNumber::new)
            .ok_or_else(|| {
                TriageError::configuration(format!(
                    "issue number must be a positive integer, got '{issue_number}'"
                ))
            })?;

        let timeout = Duration::from_secs(self.http_timeout_secs);

        let classifier = match self.classifier {
            ClassifierKind::Rules => ClassifierSettings::Rules,
            ClassifierKind::Model => {
                let flavor: ApiFlavor = self
                    .openai_api_type
                    .parse()
                    .map_err(|e: llm::LlmError| TriageError::configuration(e.to_string()))?;
                let endpoint = match (flavor, self.openai_endpoint) {
                    (_, Some(endpoint)) if !endpoint.trim().is_empty() => endpoint,
                    (ApiFlavor::OpenAi, _) => DEFAULT_OPENAI_ENDPOINT.to_string(),
                    (ApiFlavor::Azure, _) => String::new(),
                };
                let config = ChatCompletionsConfig {
                    flavor,
                    endpoint,
                    api_key: self.openai_key.unwrap_or_default(),
                    api_version: self.openai_api_version,
                    deployment: self.openai_deployment.unwrap_or_default(),
                    timeout,
                };
                config
                    .validate()
                    .map_err(|e| TriageError::configuration(e.to_string()))?;
                ClassifierSettings::Model(config)
            }
        };

        Ok(Settings {
            issue_content,
            repository,
            issue,
            github: GitHubConfig {
                api_url: self.github_api_url,
                timeout,
                ..GitHubConfig::new(github_token)
            },
            classifier,
        })
    }
}

fn required(value: Option<String>, name: &str) -> Result<String, TriageError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| TriageError::configuration(format!("{name} is required")))
}
