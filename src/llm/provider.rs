use async_trait::async_trait;

use super::types::GenerateRequest;
use crate::core::errors::ApiError;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// return the provider name (e.g. "gemini")
    fn name(&self) -> &str;

    /// single-prompt text completion, returning the generated text
    async fn generate(&self, request: GenerateRequest) -> Result<String, ApiError>;
}
