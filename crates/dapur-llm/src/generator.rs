use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::{CompletionProvider, GenerationParams, LlmError, build_prompt, extract_recipe_name};

/// Structured generation result. The name is read from the text once, here,
/// instead of by every consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub name: Option<String>,
    pub recipe: String,
}

/// Prompt in, recipe out, within a fixed deadline. No retries.
#[derive(Debug, Clone)]
pub struct RecipeGenerator {
    provider: Arc<dyn CompletionProvider>,
    timeout: Duration,
}

impl RecipeGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub async fn generate(&self, params: &GenerationParams) -> Result<Generation, LlmError> {
        let prompt = build_prompt(params);

        let recipe = match tokio::time::timeout(self.timeout, self.provider.complete(&prompt)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    "{} completion exceeded {:?}, abandoning",
                    self.provider.provider_name(),
                    self.timeout
                );
                return Err(LlmError::Timeout(self.timeout));
            }
        };

        let name = extract_recipe_name(&recipe);
        info!(
            "Generated {} recipe via {}/{} ({} chars, name: {:?})",
            params.language.as_str(),
            self.provider.provider_name(),
            self.provider.model_name(),
            recipe.len(),
            name
        );

        Ok(Generation { name, recipe })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FakeProvider, Language};

    fn params() -> GenerationParams {
        GenerationParams {
            ingredients: "egg,rice".into(),
            mood: "happy".into(),
            meal_type: "dinner".into(),
            cooking_time: 15,
            language: Language::Bahasa,
        }
    }

    #[tokio::test]
    async fn test_generate_extracts_name() {
        let fake = Arc::new(FakeProvider::new("**Nama Resep: Nasi Goreng**\nLangkah..."));
        let generator = RecipeGenerator::new(fake.clone(), Duration::from_secs(5));

        let generation = generator.generate(&params()).await.unwrap();
        assert_eq!(generation.name.as_deref(), Some("Nasi Goreng"));
        assert_eq!(generation.recipe, "**Nama Resep: Nasi Goreng**\nLangkah...");

        let prompts = fake.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Ingredients available: egg,rice"));
        assert!(prompts[0].contains("**Nama Resep: [Name]**"));
    }

    #[tokio::test]
    async fn test_generate_without_heading() {
        let generator = RecipeGenerator::new(
            Arc::new(FakeProvider::new("Boil the eggs.")),
            Duration::from_secs(5),
        );

        let generation = generator.generate(&params()).await.unwrap();
        assert_eq!(generation.name, None);
        assert_eq!(generation.recipe, "Boil the eggs.");
    }

    #[tokio::test]
    async fn test_generate_times_out() {
        let slow = FakeProvider::default().with_delay(Duration::from_millis(500));
        let generator = RecipeGenerator::new(Arc::new(slow), Duration::from_millis(20));

        let err = generator.generate(&params()).await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_generate_propagates_provider_error() {
        let generator = RecipeGenerator::new(
            Arc::new(FakeProvider::default().failing()),
            Duration::from_secs(5),
        );

        let err = generator.generate(&params()).await.unwrap_err();
        assert!(matches!(err, LlmError::ApiError { status: 503, .. }));
    }
}
