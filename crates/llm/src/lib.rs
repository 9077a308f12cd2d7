//! Issue triage LLM provider adapter.
//!
//! Implements the [`triage::ClassificationService`] trait over the
//! chat-completions API, either on Azure OpenAI (the default) or on an
//! OpenAI-compatible endpoint.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, request formatting, response parsing
//! and status-to-retry mapping live here. The [`triage`] crate sees only
//! [`triage::ClassificationService`]. No retries are performed; each call is
//! one request.

mod client;
mod config;
mod error;

pub use client::ChatCompletionsClient;
pub use config::{
    ApiFlavor, ChatCompletionsConfig, DEFAULT_AZURE_API_VERSION, DEFAULT_OPENAI_ENDPOINT,
    DEFAULT_TIMEOUT,
};
pub use error::LlmError;
