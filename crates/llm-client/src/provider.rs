use async_trait::async_trait;

use crate::error::LlmResult;
use crate::GeminiClient;

/// Backend-agnostic interface for text completion.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a single prompt and return the model's raw text.
    async fn generate(&self, prompt: &str) -> LlmResult<String>;

    fn model_name(&self) -> &str;
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> LlmResult<String> {
        self.generate_content(prompt).await
    }

    fn model_name(&self) -> &str {
        self.model()
    }
}
