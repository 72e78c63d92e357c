use crate::{
    conversation::Conversation,
    credential::Credential,
    prompts::{answer_instruction, summary_instruction},
    request::{GenerationOutput, GenerationRequest, GenerationResult, GenerationSettings, Task},
    resolver::Connector,
    GenerationError, TaskKind,
};
use relay_sdk::{ImageGenerationInput, ImageSize, LanguageModelInput, Message, ModelProvider};
use std::sync::Arc;

/// Sends one generation request per call to the provider and maps the
/// outcome for the caller.
///
/// Every call is a single upstream request. Failures are returned once, with
/// the upstream message, and never retried.
pub struct Dispatcher {
    provider: Arc<dyn ModelProvider>,
}

impl Dispatcher {
    /// Connect with a format-checked credential. No liveness check runs
    /// here; `CredentialResolver::dispatcher` gives a live-checked one.
    #[must_use]
    pub fn connect(credential: &Credential, connector: &dyn Connector) -> Self {
        Self {
            provider: connector.connect(credential),
        }
    }

    /// Reuse a provider that was already connected with a resolved
    /// credential.
    pub(crate) fn from_provider(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider }
    }

    pub async fn dispatch(
        &self,
        request: GenerationRequest,
        conversation: &mut Conversation,
    ) -> GenerationResult {
        let GenerationRequest { task, settings } = request;
        let kind = task.kind();
        tracing::debug!(task = %kind, model = %settings.model, "dispatching");

        let result = match task {
            Task::Chat => self.chat(conversation, &settings).await,
            Task::Summarize { text } => {
                self.single_shot(kind, Some(summary_instruction().to_string()), text, &settings)
                    .await
            }
            Task::Analyze { text, kind: analysis } => {
                self.single_shot(kind, Some(analysis.instruction()), text, &settings)
                    .await
            }
            Task::Complete { prompt } => self.single_shot(kind, None, prompt, &settings).await,
            Task::Answer { question } => {
                self.single_shot(kind, Some(answer_instruction().to_string()), question, &settings)
                    .await
            }
            Task::GenerateImage { prompt, size } => {
                self.generate_image(prompt, size, &settings).await
            }
        };

        if let Err(error) = &result {
            tracing::warn!(task = %kind, %error, "dispatch failed");
        }
        result
    }

    /// Answer the pending user turn. The assistant turn is appended only on
    /// success; on failure the user turn stays in the log.
    async fn chat(
        &self,
        conversation: &mut Conversation,
        settings: &GenerationSettings,
    ) -> GenerationResult {
        let pending = conversation
            .pending_user_turn()
            .is_some_and(|turn| !turn.content.trim().is_empty());
        if !pending {
            return Err(GenerationError::EmptyInput(TaskKind::Chat));
        }
        settings.validate()?;

        let response = self
            .provider
            .generate(LanguageModelInput {
                model: settings.model.clone(),
                messages: conversation.to_messages(),
                max_tokens: Some(settings.max_output_tokens),
                temperature: Some(settings.temperature),
                ..Default::default()
            })
            .await?;

        let text = response.text.trim().to_string();
        conversation.push_assistant(text.clone());
        Ok(GenerationOutput::Text(text))
    }

    async fn single_shot(
        &self,
        kind: TaskKind,
        instruction: Option<String>,
        text: String,
        settings: &GenerationSettings,
    ) -> GenerationResult {
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyInput(kind));
        }
        settings.validate()?;

        let response = self
            .provider
            .generate(LanguageModelInput {
                model: settings.model.clone(),
                system_prompt: instruction,
                messages: vec![Message::user(text)],
                max_tokens: Some(settings.max_output_tokens),
                temperature: Some(settings.temperature),
                ..Default::default()
            })
            .await?;

        Ok(GenerationOutput::Text(response.text.trim().to_string()))
    }

    async fn generate_image(
        &self,
        prompt: String,
        size: ImageSize,
        settings: &GenerationSettings,
    ) -> GenerationResult {
        if prompt.trim().is_empty() {
            return Err(GenerationError::EmptyInput(TaskKind::GenerateImage));
        }
        if settings.model.trim().is_empty() {
            return Err(GenerationError::InvalidParameter(
                "model must not be empty".to_string(),
            ));
        }

        let response = self
            .provider
            .generate_image(ImageGenerationInput::new(prompt, size).with_model(&settings.model))
            .await?;

        let image = response.images.into_iter().next().ok_or_else(|| {
            GenerationError::UpstreamFailure("The provider returned no image.".to_string())
        })?;

        Ok(GenerationOutput::Image {
            url: image.url,
            revised_prompt: image.revised_prompt,
        })
    }
}
