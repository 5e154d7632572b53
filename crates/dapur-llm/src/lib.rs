//! Recipe generation gateway.
//!
//! Builds the recipe prompt, sends it to a completion provider with a bounded
//! deadline, and pulls the recipe name out of the reply.

mod extract;
mod fake;
mod generator;
mod openrouter;
pub mod prompt;

pub use extract::extract_recipe_name;
pub use fake::FakeProvider;
pub use generator::{Generation, RecipeGenerator};
pub use openrouter::OpenRouterProvider;
pub use prompt::{GenerationParams, Language, build_prompt};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Returned in place of a recipe when the provider answers with no text.
pub const NO_RECIPE_PLACEHOLDER: &str = "No recipe generated";

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct:free";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Completion timed out after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// A chat-completion backend. Implementations are stateless and shared
/// across requests.
#[async_trait]
pub trait CompletionProvider: Send + Sync + fmt::Debug {
    /// Send a single user prompt and return the model's text.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Provider name, e.g. "openrouter" or "fake".
    fn provider_name(&self) -> &'static str;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenRouter,
    Fake,
}

impl std::str::FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openrouter" => Ok(Self::OpenRouter),
            "fake" => Ok(Self::Fake),
            other => Err(LlmError::NotConfigured(format!("Unknown provider: {}", other))),
        }
    }
}

/// Provider settings, read once at startup.
#[derive(Clone)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Build the configured provider. OpenRouter without an API key is a
/// configuration error, not a runtime one.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn CompletionProvider>, LlmError> {
    match config.provider {
        ProviderKind::Fake => Ok(Arc::new(FakeProvider::default())),
        ProviderKind::OpenRouter => {
            let api_key = config
                .api_key
                .clone()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| LlmError::NotConfigured("OPENROUTER_API_KEY not set".to_string()))?;
            Ok(Arc::new(OpenRouterProvider::new(
                api_key,
                config.base_url.clone(),
                config.model.clone(),
            )?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: ProviderKind, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider,
            api_key: api_key.map(str::to_string),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("openrouter".parse::<ProviderKind>().unwrap(), ProviderKind::OpenRouter);
        assert_eq!("fake".parse::<ProviderKind>().unwrap(), ProviderKind::Fake);
        assert!("openai".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_openrouter_requires_key() {
        let err = create_provider(&config(ProviderKind::OpenRouter, None)).unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured(_)));

        let err = create_provider(&config(ProviderKind::OpenRouter, Some(""))).unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured(_)));

        let provider = create_provider(&config(ProviderKind::OpenRouter, Some("sk-test"))).unwrap();
        assert_eq!(provider.provider_name(), "openrouter");
        assert_eq!(provider.model_name(), DEFAULT_MODEL);
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", config(ProviderKind::OpenRouter, Some("sk-secret")));
        assert!(!debug.contains("sk-secret"));
    }
}
