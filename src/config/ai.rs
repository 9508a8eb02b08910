//! AI provider configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
///
/// Both keys are optional; with neither set the service runs on the mock
/// provider.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Preferred AI provider
    #[serde(default = "default_provider")]
    pub primary_provider: AiProvider,

    /// Model override for the selected provider
    pub model: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    OpenAI,
    Anthropic,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key.as_ref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Provider to use: the primary if it has a key, else the other one.
    pub fn selected_provider(&self) -> Option<AiProvider> {
        let configured = |p: AiProvider| match p {
            AiProvider::OpenAI => self.has_openai(),
            AiProvider::Anthropic => self.has_anthropic(),
        };
        let other = match self.primary_provider {
            AiProvider::OpenAI => AiProvider::Anthropic,
            AiProvider::Anthropic => AiProvider::OpenAI,
        };
        [self.primary_provider, other].into_iter().find(|p| configured(*p))
    }

    pub fn openai_key(&self) -> Option<Secret<String>> {
        self.openai_api_key
            .as_ref()
            .filter(|_| self.has_openai())
            .map(|k| Secret::new(k.trim().to_string()))
    }

    pub fn anthropic_key(&self) -> Option<Secret<String>> {
        self.anthropic_api_key
            .as_ref()
            .filter(|_| self.has_anthropic())
            .map(|k| Secret::new(k.trim().to_string()))
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidProviderTimeout("AI"));
        }
        if self.model.as_ref().is_some_and(|m| m.trim().is_empty()) {
            return Err(ValidationError::BlankModel);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            primary_provider: default_provider(),
            model: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_provider() -> AiProvider {
    AiProvider::OpenAI
}

fn default_timeout() -> u64 {
    20
}

fn default_retries() -> u32 {
    2
}
