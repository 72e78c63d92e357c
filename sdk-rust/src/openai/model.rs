use super::api::{
    ChatCompletionMessage, ChatCompletionRole, CompletionUsage, CreateChatCompletionRequest,
    CreateChatCompletionResponse, CreateImageRequest, ImagesResponse, ListModelsResponse,
};
use crate::{
    client_utils, opentelemetry, GeneratedImage, ImageGenerationInput, ImageResponse,
    LanguageModelError, LanguageModelInput, LanguageModelResult, Message, ModelInfo,
    ModelProvider, ModelResponse, ModelUsage, Role,
};
use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::HashMap;

const PROVIDER: &str = "openai";
pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// An `OpenAI`-compatible provider: chat completions, image generation and
/// model listing against one base URL with one API key.
pub struct OpenAIProvider {
    api_key: String,
    base_url: String,
    client: Client,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct OpenAIProviderOptions {
    pub base_url: Option<String>,
    pub api_key: String,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

impl OpenAIProvider {
    #[must_use]
    pub fn new(options: OpenAIProviderOptions) -> Self {
        let OpenAIProviderOptions {
            base_url,
            api_key,
            headers,
            client,
        } = options;

        let base_url = base_url
            .unwrap_or_else(|| OPENAI_DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let client = client.unwrap_or_else(Client::new);
        let headers = headers.unwrap_or_default();

        Self {
            api_key,
            base_url,
            client,
            headers,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_headers(&self) -> LanguageModelResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        let auth_header =
            HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(|error| {
                LanguageModelError::InvalidInput(format!(
                    "Invalid OpenAI API key header value: {error}"
                ))
            })?;
        headers.insert(header::AUTHORIZATION, auth_header);

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                LanguageModelError::InvalidInput(format!(
                    "Invalid OpenAI header name '{key}': {error}"
                ))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                LanguageModelError::InvalidInput(format!(
                    "Invalid OpenAI header value for '{key}': {error}"
                ))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl ModelProvider for OpenAIProvider {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn list_models(&self) -> LanguageModelResult<Vec<ModelInfo>> {
        opentelemetry::trace_list_models(PROVIDER, async {
            let headers = self.request_headers()?;
            let response: ListModelsResponse = client_utils::get_json(
                &self.client,
                &format!("{}/models", self.base_url),
                headers,
            )
            .await?;

            Ok(response
                .data
                .into_iter()
                .map(|model| ModelInfo {
                    id: model.id,
                    owned_by: model.owned_by,
                })
                .collect())
        })
        .await
    }

    async fn generate(&self, input: LanguageModelInput) -> LanguageModelResult<ModelResponse> {
        opentelemetry::trace_generate(PROVIDER, input, |input| async move {
            let request = convert_to_openai_create_params(input);
            let headers = self.request_headers()?;

            let response: CreateChatCompletionResponse = client_utils::send_json(
                &self.client,
                &format!("{}/chat/completions", self.base_url),
                &request,
                headers,
            )
            .await?;

            let choice = response.choices.into_iter().next().ok_or_else(|| {
                LanguageModelError::Invariant(PROVIDER, "No choices in response".to_string())
            })?;

            let message = choice.message;

            if let Some(refusal) = message.refusal {
                if !refusal.is_empty() {
                    return Err(LanguageModelError::Refusal(refusal));
                }
            }

            let text = message.content.ok_or_else(|| {
                LanguageModelError::Invariant(
                    PROVIDER,
                    "Choice message has no content".to_string(),
                )
            })?;

            Ok(ModelResponse {
                text,
                usage: response.usage.map(map_openai_usage),
            })
        })
        .await
    }

    async fn generate_image(
        &self,
        input: ImageGenerationInput,
    ) -> LanguageModelResult<ImageResponse> {
        opentelemetry::trace_generate_image(PROVIDER, input, |input| async move {
            if input.n == 0 {
                return Err(LanguageModelError::InvalidInput(
                    "Image count must be at least 1".to_string(),
                ));
            }

            let request = CreateImageRequest {
                prompt: input.prompt,
                model: input.model,
                n: input.n,
                size: input.size.as_str().to_string(),
                response_format: "url",
            };
            let headers = self.request_headers()?;

            let response: ImagesResponse = client_utils::send_json(
                &self.client,
                &format!("{}/images/generations", self.base_url),
                &request,
                headers,
            )
            .await?;

            let images = response
                .data
                .into_iter()
                .map(|image| {
                    let url = image.url.ok_or_else(|| {
                        LanguageModelError::Invariant(
                            PROVIDER,
                            "Image data has no url".to_string(),
                        )
                    })?;
                    Ok(GeneratedImage {
                        url,
                        revised_prompt: image.revised_prompt,
                    })
                })
                .collect::<LanguageModelResult<Vec<_>>>()?;

            Ok(ImageResponse { images })
        })
        .await
    }
}

fn convert_to_openai_create_params(input: LanguageModelInput) -> CreateChatCompletionRequest {
    CreateChatCompletionRequest {
        model: input.model,
        messages: convert_to_openai_messages(input.messages, input.system_prompt),
        max_completion_tokens: input.max_tokens,
        temperature: input.temperature,
        top_p: input.top_p,
    }
}

fn convert_to_openai_messages(
    messages: Vec<Message>,
    system_prompt: Option<String>,
) -> Vec<ChatCompletionMessage> {
    let mut openai_messages = Vec::with_capacity(messages.len() + 1);

    if let Some(system_prompt) = system_prompt {
        openai_messages.push(ChatCompletionMessage {
            role: ChatCompletionRole::System,
            content: system_prompt,
        });
    }

    openai_messages.extend(messages.into_iter().map(|message| ChatCompletionMessage {
        role: match message.role {
            Role::System => ChatCompletionRole::System,
            Role::User => ChatCompletionRole::User,
            Role::Assistant => ChatCompletionRole::Assistant,
        },
        content: message.content,
    }));

    openai_messages
}

fn map_openai_usage(usage: CompletionUsage) -> ModelUsage {
    ModelUsage {
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
    }
}
