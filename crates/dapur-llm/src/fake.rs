//! Canned provider for tests and offline development.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{CompletionProvider, LlmError};

const DEFAULT_RESPONSE: &str = "**Recipe Name: Fake Fried Rice**

1. Preparation Time: 5 minutes
2. Cooking Time: 10 minutes
3. Servings: 1

**Nutritional Notes:** Mostly carbohydrates.";

#[derive(Debug)]
pub struct FakeProvider {
    response: String,
    delay: Option<Duration>,
    fail: bool,
    prompts: Mutex<Vec<String>>,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self::new(DEFAULT_RESPONSE)
    }
}

impl FakeProvider {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            delay: None,
            fail: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before answering, to exercise deadlines.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answer every call with an upstream error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for FakeProvider {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail {
            return Err(LlmError::ApiError {
                status: 503,
                message: "fake provider failure".to_string(),
            });
        }

        Ok(self.response.clone())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
