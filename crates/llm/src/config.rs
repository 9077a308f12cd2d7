//! Connection settings for the chat-completions endpoint.

use std::time::Duration;

use crate::LlmError;

/// Default Azure OpenAI REST API version.
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-02-01";

/// Default base URL for the public OpenAI API.
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Which flavour of the chat-completions API to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiFlavor {
    /// Azure OpenAI: deployment in the URL path, `api-key` header,
    /// `api-version` query parameter.
    #[default]
    Azure,
    /// OpenAI-compatible: model in the request body, bearer token.
    OpenAi,
}

impl std::str::FromStr for ApiFlavor {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "azure" => Ok(Self::Azure),
            "openai" | "open_ai" => Ok(Self::OpenAi),
            other => Err(LlmError::Config(format!(
                "unknown API type '{other}' (expected 'azure' or 'openai')"
            ))),
        }
    }
}

/// Everything needed to reach one model deployment.
#[derive(Clone)]
pub struct ChatCompletionsConfig {
    /// API flavour.
    pub flavor: ApiFlavor,
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,
    /// API key.
    pub api_key: String,
    /// Azure REST API version. Ignored for [`ApiFlavor::OpenAi`].
    pub api_version: String,
    /// Azure deployment name, or the model name for [`ApiFlavor::OpenAi`].
    pub deployment: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for ChatCompletionsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsConfig")
            .field("flavor", &self.flavor)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("deployment", &self.deployment)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ChatCompletionsConfig {
    /// Checks that every required value is present.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] naming the first missing value.
    pub fn validate(&self) -> Result<(), LlmError> {
        let required = [
            ("endpoint", &self.endpoint),
            ("API key", &self.api_key),
            ("deployment", &self.deployment),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(LlmError::Config(format!("{name} is required")));
            }
        }
        if self.flavor == ApiFlavor::Azure && self.api_version.trim().is_empty() {
            return Err(LlmError::Config("API version is required for Azure".to_string()));
        }
        Ok(())
    }

    /// Returns the full chat-completions URL.
    pub fn completions_url(&self) -> String {
        let endpoint = self.endpoint.trim_end_matches('/');
        match self.flavor {
            ApiFlavor::Azure => format!(
                "{endpoint}/openai/deployments/{}/chat/completions?api-version={}",
                self.deployment, self.api_version
            ),
            ApiFlavor::OpenAi => format!("{endpoint}/chat/completions"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn azure() -> ChatCompletionsConfig {
        ChatCompletionsConfig {
            flavor: ApiFlavor::Azure,
            endpoint: "https://res.openai.azure.com/".to_string(),
            api_key: "key".to_string(),
            api_version: DEFAULT_AZURE_API_VERSION.to_string(),
            deployment: "gpt-4o".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[test]
    fn azure_url_carries_deployment_and_version() {
        assert_eq!(
            azure().completions_url(),
            "https://res.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-02-01"
        );
    }

    #[test]
    fn openai_url() {
        let config = ChatCompletionsConfig {
            flavor: ApiFlavor::OpenAi,
            endpoint: DEFAULT_OPENAI_ENDPOINT.to_string(),
            ..azure()
        };
        assert_eq!(config.completions_url(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn validate_reports_missing_key() {
        let config = ChatCompletionsConfig {
            api_key: String::new(),
            ..azure()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid LLM configuration: API key is required");
    }

    #[test]
    fn api_version_only_required_for_azure() {
        let mut config = ChatCompletionsConfig {
            api_version: String::new(),
            ..azure()
        };
        assert!(config.validate().is_err());
        config.flavor = ApiFlavor::OpenAi;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn flavor_parsing() {
        assert_eq!("Azure".parse::<ApiFlavor>().unwrap(), ApiFlavor::Azure);
        assert_eq!("openai".parse::<ApiFlavor>().unwrap(), ApiFlavor::OpenAi);
        assert!("bedrock".parse::<ApiFlavor>().is_err());
    }
}
