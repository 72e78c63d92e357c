use crate::{
    ImageGenerationInput, ImageResponse, LanguageModelInput, LanguageModelResult, ModelInfo,
    ModelResponse,
};

/// A remote generation service bound to one credential.
///
/// Each method performs exactly one request against the provider and never
/// retries.
#[async_trait::async_trait]
pub trait ModelProvider: Send + Sync {
    fn provider(&self) -> &'static str;
    /// List the models available to the credential. Cheap enough to be used
    /// as a liveness check.
    async fn list_models(&self) -> LanguageModelResult<Vec<ModelInfo>>;
    async fn generate(&self, input: LanguageModelInput) -> LanguageModelResult<ModelResponse>;
    async fn generate_image(&self, input: ImageGenerationInput)
        -> LanguageModelResult<ImageResponse>;
}
