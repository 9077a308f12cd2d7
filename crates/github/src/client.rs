//! GitHub REST client implementing the issue ports.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use triage::{IssueHandle, IssueNumber, IssueStore, PublishError, RepositoryId};

use crate::{GitHubConfig, GitHubError};

const API_VERSION: &str = "2022-11-28";
const CLIENT_NAME: &str = concat!("issue-triage/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct IssueResponse {
    title: String,
    state: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

#[derive(Serialize)]
struct CommentRequest<'a> {
    body: &'a str,
}

#[derive(Serialize)]
struct LabelsRequest<'a> {
    labels: [&'a str; 1],
}

/// GitHub REST API client.
///
/// Cheap to clone; every [`GitHubIssue`] handle shares the same connection
/// pool and credentials.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_url: String,
}

impl GitHubClient {
    /// Creates a client authenticated with the configured token.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Config`] if the token is empty or not a valid
    /// header value, or [`GitHubError::Request`] if the HTTP client cannot be
    /// built.
    pub fn new(config: GitHubConfig) -> Result<Self, GitHubError> {
        if config.token.trim().is_empty() {
            return Err(GitHubError::Config("token is required".to_string()));
        }
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token.trim()))
            .map_err(|_| GitHubError::Config("token contains invalid characters".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_NAME));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches an issue and returns a handle for writing to it.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError`] if the issue cannot be read.
    #[tracing::instrument(skip_all, fields(repository = %repository, issue = %issue))]
    pub async fn issue(
        &self,
        repository: &RepositoryId,
        issue: IssueNumber,
    ) -> Result<GitHubIssue, GitHubError> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}",
            self.api_url,
            repository.owner(),
            repository.name(),
            issue
        );
        let found: IssueResponse = send(self.http.get(&url)).await?.json().await?;
        tracing::debug!(title = %found.title, state = %found.state, "Fetched issue");

        Ok(GitHubIssue {
            http: self.http.clone(),
            url,
        })
    }
}

/// Write access to one GitHub issue.
#[derive(Debug)]
pub struct GitHubIssue {
    http: Client,
    url: String,
}

impl GitHubIssue {
    /// Posts a comment.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError`] if GitHub rejects the comment.
    #[tracing::instrument(skip_all, fields(issue_url = %self.url))]
    pub async fn create_comment(&self, body: &str) -> Result<(), GitHubError> {
        send(
            self.http
                .post(format!("{}/comments", self.url))
                .json(&CommentRequest { body }),
        )
        .await?;
        tracing::info!("Comment posted successfully");
        Ok(())
    }

    /// Adds a label. GitHub creates the label on the repository if it does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError`] if GitHub rejects the label.
    #[tracing::instrument(skip(self), fields(issue_url = %self.url))]
    pub async fn add_to_labels(&self, label: &str) -> Result<(), GitHubError> {
        send(
            self.http
                .post(format!("{}/labels", self.url))
                .json(&LabelsRequest { labels: [label] }),
        )
        .await?;
        tracing::info!("Label added successfully");
        Ok(())
    }
}

async fn send(request: RequestBuilder) -> Result<Response, GitHubError> {
    let response = request.send().await?;
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(status_error(response).await)
    }
}

async fn status_error(response: Response) -> GitHubError {
    let status = response.status();
    let headers = response.headers();
    let rate_limited = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");
    let retry_after = headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs);

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|e| e.message)
        .unwrap_or(text);

    tracing::warn!(status = %status, rate_limited, "GitHub request rejected");
    GitHubError::Status {
        status,
        message,
        rate_limited,
        retry_after,
    }
}

#[async_trait]
impl IssueStore for GitHubClient {
    async fn get_issue(
        &self,
        repository: &RepositoryId,
        issue: IssueNumber,
    ) -> Result<Box<dyn IssueHandle>, PublishError> {
        let handle = self.issue(repository, issue).await?;
        Ok(Box::new(handle))
    }
}

#[async_trait]
impl IssueHandle for GitHubIssue {
    async fn add_comment(&self, body: &str) -> Result<(), PublishError> {
        Ok(self.create_comment(body).await?)
    }

    async fn add_label(&self, name: &str) -> Result<(), PublishError> {
        Ok(self.add_to_labels(name).await?)
    }
}
